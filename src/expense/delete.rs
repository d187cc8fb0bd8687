//! Endpoint for deleting expenses.

use axum::{extract::State, http::StatusCode};

use crate::{
    Error,
    app_state::ExpenseState,
    expense::ExpenseId,
    extract::Path,
    stores::ExpenseStore,
};

/// Delete the expense `expense_id`.
pub async fn delete_expense_endpoint<E>(
    State(state): State<ExpenseState<E>>,
    Path(expense_id): Path<ExpenseId>,
) -> Result<StatusCode, Error>
where
    E: ExpenseStore,
{
    state.expense_store.delete(expense_id)?;
    tracing::info!("Deleted expense {expense_id}");

    Ok(StatusCode::NO_CONTENT)
}
