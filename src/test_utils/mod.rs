#![allow(missing_docs)]

use std::sync::{Arc, Mutex};

use axum_test::TestServer;
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::OffsetDateTime;

use crate::{
    SQLiteAppState, build_router,
    db::initialize,
    expense::NewExpense,
    stores::UserStore,
    user::{User, UserForm, UserId, default_monthly_quota},
};

pub(crate) fn get_test_connection() -> Connection {
    let connection = Connection::open_in_memory().unwrap();
    initialize(&connection).unwrap();

    connection
}

pub(crate) fn get_test_state() -> SQLiteAppState {
    SQLiteAppState::new(Arc::new(Mutex::new(get_test_connection())))
}

pub(crate) fn get_test_server(state: SQLiteAppState) -> TestServer {
    TestServer::try_new(build_router(state)).expect("Could not create test server.")
}

pub(crate) fn user_form(first_name: &str, last_name: &str) -> UserForm {
    UserForm {
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        is_active: true,
        monthly_expense_quota: default_monthly_quota(),
    }
}

pub(crate) fn create_user_with_quota(state: &SQLiteAppState, quota: Decimal) -> User {
    state
        .user_store
        .create(UserForm {
            monthly_expense_quota: quota,
            ..user_form("Ada", "Lovelace")
        })
        .unwrap()
}

pub(crate) fn new_expense(user_id: UserId, amount: Decimal, date: OffsetDateTime) -> NewExpense {
    NewExpense {
        description: "Office supplies".to_owned(),
        amount,
        date,
        category: None,
        user_id,
        billing_company: None,
        billing_street: None,
        billing_postal_code: None,
        billing_city: None,
    }
}
