//! Endpoint for creating expenses.

use axum::{
    extract::State,
    http::{StatusCode, header::LOCATION},
    response::IntoResponse,
};

use crate::{
    Error,
    app_state::ExpenseState,
    endpoints::{self, format_endpoint},
    expense::{Expense, NewExpense},
    extract::Json,
    stores::ExpenseStore,
};

/// Create an expense if the owning user is active and the expense fits in
/// their monthly quota.
pub async fn create_expense_endpoint<E>(
    State(state): State<ExpenseState<E>>,
    Json(new_expense): Json<NewExpense>,
) -> Result<impl IntoResponse, Error>
where
    E: ExpenseStore,
{
    let expense: Expense = state.expense_store.create(new_expense).inspect_err(|error| {
        tracing::info!("Rejected new expense: {error}");
    })?;
    tracing::info!("Created expense {} for user {}", expense.id, expense.user_id);

    let location = format_endpoint(endpoints::EXPENSE, expense.id);

    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(expense)))
}
