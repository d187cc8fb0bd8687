//! Expense management: the expense model, the monthly quota rule, monthly
//! reports and the REST endpoints for all of them.

mod create;
mod delete;
mod domain;
mod get;
mod quota;
mod report;

pub use create::create_expense_endpoint;
pub use delete::delete_expense_endpoint;
pub use domain::{Expense, ExpenseId, MAX_DESCRIPTION_LENGTH, NewExpense, validate_description};
pub use get::{get_expense_endpoint, get_expenses_by_user_endpoint, get_expenses_endpoint};
pub use quota::check_quota;
pub use report::{ExpenseReport, delete_report_endpoint, get_report_endpoint};
