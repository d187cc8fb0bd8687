//! An expense tracker where users log expenses against a monthly quota.
//!
//! This library provides a REST API that serves JSON. Users and expenses are
//! kept in a SQLite database. Creating an expense is rejected when it would
//! push the owning user's total for that calendar month (in UTC) over their
//! monthly quota. Monthly reports aggregate a user's expenses for one month
//! and can be deleted as a whole.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod amount;
mod app_state;
mod database_id;
mod db;
mod endpoints;
mod error;
mod expense;
mod extract;
mod health;
mod logging;
mod period;
mod routing;
mod seed;
mod stores;
mod timestamp;
mod user;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, SQLiteAppState};
pub use db::{initialize as initialize_db, open_connection};
pub use error::{Error, ErrorKind};
pub use expense::{Expense, ExpenseId, ExpenseReport, MAX_DESCRIPTION_LENGTH, NewExpense};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use period::{MAX_REPORT_YEAR, MIN_REPORT_YEAR, MonthPeriod};
pub use routing::build_router;
pub use seed::seed_demo_data;
pub use stores::{
    ExpenseStore, UserStore,
    sqlite::{SQLiteExpenseStore, SQLiteUserStore},
};
pub use user::{User, UserDetails, UserForm, UserId, UserSummary};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
