//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::stores::sqlite::{SQLiteExpenseStore, SQLiteUserStore};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState<U, E> {
    /// The store for managing [users](crate::User).
    pub user_store: U,
    /// The store for managing [expenses](crate::Expense).
    pub expense_store: E,
    /// The database connection shared by the stores, used for health checks.
    pub db_connection: Arc<Mutex<Connection>>,
}

/// The app state backed by SQLite stores.
pub type SQLiteAppState = AppState<SQLiteUserStore, SQLiteExpenseStore>;

impl SQLiteAppState {
    /// Create a new [AppState] where all stores share `db_connection`.
    ///
    /// The database is expected to have been initialized with
    /// [initialize_db](crate::initialize_db).
    pub fn new(db_connection: Arc<Mutex<Connection>>) -> Self {
        Self {
            user_store: SQLiteUserStore::new(db_connection.clone()),
            expense_store: SQLiteExpenseStore::new(db_connection.clone()),
            db_connection,
        }
    }
}

/// The state needed to manage users.
#[derive(Debug, Clone)]
pub struct UserState<U> {
    /// The store for managing users.
    pub user_store: U,
}

impl<U, E> FromRef<AppState<U, E>> for UserState<U>
where
    U: Clone,
{
    fn from_ref(state: &AppState<U, E>) -> Self {
        Self {
            user_store: state.user_store.clone(),
        }
    }
}

/// The state needed to manage expenses.
#[derive(Debug, Clone)]
pub struct ExpenseState<E> {
    /// The store for managing expenses.
    pub expense_store: E,
}

impl<U, E> FromRef<AppState<U, E>> for ExpenseState<E>
where
    E: Clone,
{
    fn from_ref(state: &AppState<U, E>) -> Self {
        Self {
            expense_store: state.expense_store.clone(),
        }
    }
}

/// The state needed to build and delete monthly reports.
#[derive(Debug, Clone)]
pub struct ReportState<U, E> {
    /// The store for looking up the user a report is for.
    pub user_store: U,
    /// The store for fetching and deleting the expenses in a report.
    pub expense_store: E,
}

impl<U, E> FromRef<AppState<U, E>> for ReportState<U, E>
where
    U: Clone,
    E: Clone,
{
    fn from_ref(state: &AppState<U, E>) -> Self {
        Self {
            user_store: state.user_store.clone(),
            expense_store: state.expense_store.clone(),
        }
    }
}

/// The state needed for the health check.
#[derive(Debug, Clone)]
pub struct HealthState {
    /// The database connection to check.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl<U, E> FromRef<AppState<U, E>> for HealthState {
    fn from_ref(state: &AppState<U, E>) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
