//! Endpoints for listing expenses and getting a single expense.

use axum::extract::State;

use crate::{
    Error,
    app_state::ExpenseState,
    expense::{Expense, ExpenseId},
    extract::{Json, Path},
    stores::ExpenseStore,
    user::UserId,
};

/// List all expenses, oldest first.
pub async fn get_expenses_endpoint<E>(
    State(state): State<ExpenseState<E>>,
) -> Result<Json<Vec<Expense>>, Error>
where
    E: ExpenseStore,
{
    state.expense_store.get_all().map(Json)
}

/// Get the expense `expense_id`.
pub async fn get_expense_endpoint<E>(
    State(state): State<ExpenseState<E>>,
    Path(expense_id): Path<ExpenseId>,
) -> Result<Json<Expense>, Error>
where
    E: ExpenseStore,
{
    state.expense_store.get(expense_id).map(Json)
}

/// List the expenses of the user `user_id`, oldest first.
///
/// Responds with an empty list if the user has no expenses or does not exist.
pub async fn get_expenses_by_user_endpoint<E>(
    State(state): State<ExpenseState<E>>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<Expense>>, Error>
where
    E: ExpenseStore,
{
    state.expense_store.get_by_user(user_id).map(Json)
}
