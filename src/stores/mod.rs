//! Defines the store traits for the domain models and their SQLite implementations.

mod expense;
pub mod sqlite;
mod user;

pub use expense::ExpenseStore;
pub use user::UserStore;
