//! Monthly expense reports.
//!
//! A report covers one user's expenses for one calendar month in UTC. The
//! same month can be deleted as a whole.

use axum::{extract::State, http::StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    app_state::ReportState,
    expense::Expense,
    extract::{Json, Path, Query},
    period::MonthPeriod,
    stores::{ExpenseStore, UserStore},
    user::{User, UserId},
};

/// The expenses of a user in one month, with their total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseReport {
    /// The user the report is for.
    pub user_id: UserId,
    /// The full name of the user.
    pub user_name: String,
    /// The calendar year of the report.
    pub year: i32,
    /// The month of the report, starting from 1 for January.
    pub month: u8,
    /// The first instant of the month.
    #[serde(with = "crate::timestamp")]
    pub period_start: OffsetDateTime,
    /// The last whole second of the month.
    #[serde(with = "crate::timestamp")]
    pub period_end: OffsetDateTime,
    /// The sum of the amounts of `expenses`.
    #[serde(with = "crate::amount")]
    pub total_amount: Decimal,
    /// The number of `expenses`.
    pub expense_count: usize,
    /// The expenses dated within the month, oldest first.
    pub expenses: Vec<Expense>,
}

impl ExpenseReport {
    /// Summarize `expenses`, which must all belong to `user` and fall within `period`.
    ///
    /// # Errors
    /// Returns [Error::AmountOverflow] if a running total of the amounts, added
    /// in the order given, does not fit in a [Decimal].
    pub fn new(user: &User, period: MonthPeriod, expenses: Vec<Expense>) -> Result<Self, Error> {
        let total_amount = expenses
            .iter()
            .try_fold(Decimal::ZERO, |total, expense| total.checked_add(expense.amount))
            .ok_or(Error::AmountOverflow)?;

        Ok(Self {
            user_id: user.id,
            user_name: user.name(),
            year: period.year(),
            month: period.month(),
            period_start: period.start(),
            period_end: period.last_second(),
            total_amount,
            expense_count: expenses.len(),
            expenses,
        })
    }
}

/// The query string selecting the month of a report.
///
/// Missing fields default to the current year and month in UTC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct ReportQuery {
    /// The calendar year, between 2000 and 2100.
    pub year: Option<i32>,
    /// The month, between 1 and 12.
    pub month: Option<i32>,
}

impl ReportQuery {
    /// The month this query selects, filling in missing fields from `now`.
    ///
    /// # Errors
    /// Returns [Error::InvalidYear] or [Error::InvalidMonth] if a field is out of range.
    pub fn period(&self, now: OffsetDateTime) -> Result<MonthPeriod, Error> {
        let current = MonthPeriod::containing(now)?;
        let year = self.year.unwrap_or(current.year());
        let month = self.month.unwrap_or(i32::from(current.month()));

        MonthPeriod::for_report(year, month)
    }
}

/// Get the report of the user `user_id` for the month selected by `query`.
///
/// A month without expenses gives a report with a total of zero.
pub async fn get_report_endpoint<U, E>(
    State(state): State<ReportState<U, E>>,
    Path(user_id): Path<UserId>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ExpenseReport>, Error>
where
    U: UserStore,
    E: ExpenseStore,
{
    let period = query.period(OffsetDateTime::now_utc())?;
    let user = state.user_store.get(user_id)?;
    let expenses = state.expense_store.get_in_period(user_id, period)?;

    Ok(Json(ExpenseReport::new(&user, period, expenses)?))
}

/// Delete every expense of the user `user_id` in the month selected by `query`.
///
/// Responds with [Error::EmptyReport] if there was nothing to delete.
pub async fn delete_report_endpoint<U, E>(
    State(state): State<ReportState<U, E>>,
    Path(user_id): Path<UserId>,
    Query(query): Query<ReportQuery>,
) -> Result<StatusCode, Error>
where
    U: UserStore,
    E: ExpenseStore,
{
    let period = query.period(OffsetDateTime::now_utc())?;
    state.user_store.get(user_id)?;

    let deleted = state.expense_store.delete_in_period(user_id, period)?;

    if deleted == 0 {
        return Err(Error::EmptyReport {
            user_id,
            year: period.year(),
            month: period.month(),
        });
    }

    tracing::info!(
        "Deleted {deleted} expenses of user {user_id} for {}-{:02}",
        period.year(),
        period.month()
    );

    Ok(StatusCode::NO_CONTENT)
}
