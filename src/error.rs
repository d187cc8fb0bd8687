//! The errors that may occur in the application and how they are sent to clients.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde_json::json;

use crate::{
    expense::{ExpenseId, MAX_DESCRIPTION_LENGTH},
    period::{MAX_REPORT_YEAR, MIN_REPORT_YEAR},
    user::UserId,
};

/// The broad class of an [Error], which decides the HTTP status code of the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A user, expense or report period does not exist.
    NotFound,
    /// The request was malformed or a field is out of range.
    Validation,
    /// The request was well formed but breaks a business rule.
    BusinessRuleViolation,
    /// Something went wrong on the server.
    Internal,
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// There is no user with the given ID.
    #[error("user {0} not found")]
    UserNotFound(UserId),

    /// There is no expense with the given ID.
    #[error("expense {0} not found")]
    ExpenseNotFound(ExpenseId),

    /// A user has no expenses in the requested report period.
    #[error("no expenses found for user {user_id} in {year}-{month:02}")]
    EmptyReport {
        /// The user the report was requested for.
        user_id: UserId,
        /// The year of the report period.
        year: i32,
        /// The month of the report period, starting from 1.
        month: u8,
    },

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The expense description is longer than [MAX_DESCRIPTION_LENGTH] characters.
    #[error("description cannot exceed {max} characters, got {0}", max = MAX_DESCRIPTION_LENGTH)]
    DescriptionTooLong(usize),

    /// The report year is outside of the supported range.
    #[error(
        "year must be between {min} and {max}, got {0}",
        min = MIN_REPORT_YEAR,
        max = MAX_REPORT_YEAR
    )]
    InvalidYear(i32),

    /// The report month is not between 1 and 12.
    #[error("month must be between 1 and 12, got {0}")]
    InvalidMonth(i32),

    /// A date could not be represented, e.g. the month after it is out of range.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// The request body, path or query string could not be parsed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Expenses cannot be added for users that have been deactivated.
    #[error("cannot add an expense for inactive user {0}")]
    InactiveUser(UserId),

    /// Adding the expense would push the user's monthly total over their quota.
    #[error(
        "the monthly quota of {quota:.2} would be exceeded: current total {current_total:.2}, \
        attempted to add {attempted:.2}"
    )]
    QuotaExceeded {
        /// The user's monthly expense quota.
        quota: Decimal,
        /// The sum of the user's expenses in the month before the new expense.
        current_total: Decimal,
        /// The amount of the rejected expense.
        attempted: Decimal,
    },

    /// The amounts of a user's expenses in one month add up to more than a
    /// decimal can hold.
    #[error("the total of the expense amounts is too large to compute")]
    AmountOverflow,

    /// Users cannot be deleted while expenses still refer to them.
    #[error("cannot delete user {0} with associated expenses")]
    UserHasExpenses(UserId),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl Error {
    /// The class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UserNotFound(_)
            | Error::ExpenseNotFound(_)
            | Error::EmptyReport { .. }
            | Error::NotFound => ErrorKind::NotFound,
            Error::DescriptionTooLong(_)
            | Error::InvalidYear(_)
            | Error::InvalidMonth(_)
            | Error::InvalidDate(_)
            | Error::InvalidRequest(_)
            | Error::AmountOverflow => ErrorKind::Validation,
            Error::InactiveUser(_) | Error::QuotaExceeded { .. } | Error::UserHasExpenses(_) => {
                ErrorKind::BusinessRuleViolation
            }
            Error::SqlError(_) | Error::DatabaseLockError => ErrorKind::Internal,
        }
    }

    /// The HTTP status code used when this error is sent to a client.
    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Validation | ErrorKind::BusinessRuleViolation => StatusCode::BAD_REQUEST,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match self.kind() {
            // Internal errors are not intended to be shown to the client.
            ErrorKind::Internal => {
                tracing::error!("An unexpected error occurred: {}", self);
                "An unexpected error occurred, check the server logs for more details.".to_owned()
            }
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
