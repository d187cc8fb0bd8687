//! SQLite implementations of the store traits.
//!
//! All stores share one connection behind a mutex. Each operation holds the
//! lock for its whole duration.

mod expense;
mod user;

pub use expense::SQLiteExpenseStore;
pub use user::SQLiteUserStore;

pub(crate) use expense::insert_expense;
pub(crate) use user::{insert_user, select_user};

use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use crate::Error;

/// Acquire the database lock.
///
/// # Errors
/// Returns [Error::DatabaseLockError] if the lock is poisoned.
pub(crate) fn lock(connection: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>, Error> {
    connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })
}
