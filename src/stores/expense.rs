//! Defines the expense store trait.

use crate::{
    Error,
    expense::{Expense, ExpenseId, NewExpense},
    period::MonthPeriod,
    user::UserId,
};

/// Creates, retrieves and deletes expenses.
///
/// Lists of expenses are ordered by date, oldest first, with ties broken by ID.
pub trait ExpenseStore {
    /// Add a new expense to the store after checking it against the business rules.
    ///
    /// The checks run in this order:
    /// 1. the user exists, else [Error::UserNotFound],
    /// 2. the user is active, else [Error::InactiveUser],
    /// 3. the description is short enough, else [Error::DescriptionTooLong],
    /// 4. the user's total for the UTC month containing the expense date stays
    ///    within their quota, else [Error::QuotaExceeded].
    fn create(&self, new_expense: NewExpense) -> Result<Expense, Error>;

    /// Get an expense by its ID.
    ///
    /// Returns [Error::ExpenseNotFound] if no expense with `id` exists.
    fn get(&self, id: ExpenseId) -> Result<Expense, Error>;

    /// Get all expenses.
    fn get_all(&self) -> Result<Vec<Expense>, Error>;

    /// Get the expenses of the user `user_id`.
    fn get_by_user(&self, user_id: UserId) -> Result<Vec<Expense>, Error>;

    /// Get the expenses of the user `user_id` dated within `period`.
    fn get_in_period(&self, user_id: UserId, period: MonthPeriod) -> Result<Vec<Expense>, Error>;

    /// Delete the expense `id`.
    ///
    /// Returns [Error::ExpenseNotFound] if no expense with `id` exists.
    fn delete(&self, id: ExpenseId) -> Result<(), Error>;

    /// Delete the expenses of the user `user_id` dated within `period`,
    /// returning how many were deleted.
    fn delete_in_period(&self, user_id: UserId, period: MonthPeriod) -> Result<usize, Error>;
}
