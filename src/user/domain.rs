//! Defines the user model and the JSON shapes it is sent and received as.

use rusqlite::Row;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{database_id::uuid_id, db::SqlDecimal};

uuid_id!(
    /// The ID of a [User].
    UserId
);

/// The monthly expense quota given to users when none is specified: 1000.00.
pub fn default_monthly_quota() -> Decimal {
    Decimal::new(1000_00, 2)
}

fn default_is_active() -> bool {
    true
}

/// A person that can incur expenses.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserId,
    /// The user's first name.
    pub first_name: String,
    /// The user's last name.
    pub last_name: String,
    /// Inactive users cannot incur new expenses.
    pub is_active: bool,
    /// The maximum sum of expenses the user may log within one calendar month.
    pub monthly_expense_quota: Decimal,
}

impl User {
    /// The full name of the user, e.g. "Ada Lovelace".
    pub fn name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// The fields of a user that clients may set when creating or updating a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserForm {
    /// The user's first name.
    pub first_name: String,
    /// The user's last name.
    pub last_name: String,
    /// Whether the user may incur new expenses, defaults to `true`.
    #[serde(default = "default_is_active")]
    pub is_active: bool,
    /// The user's monthly expense quota, defaults to [default_monthly_quota].
    #[serde(
        with = "crate::amount",
        default = "default_monthly_quota"
    )]
    pub monthly_expense_quota: Decimal,
}

impl UserForm {
    pub(crate) fn into_user(self, id: UserId) -> User {
        User {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            is_active: self.is_active,
            monthly_expense_quota: self.monthly_expense_quota,
        }
    }
}

/// The short form of a user shown in lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    /// The user's ID.
    pub id: UserId,
    /// The user's full name.
    pub name: String,
    /// Whether the user may incur new expenses.
    pub is_active: bool,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name(),
            is_active: user.is_active,
        }
    }
}

/// All the details of a single user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    /// The user's ID.
    pub id: UserId,
    /// The user's first name.
    pub first_name: String,
    /// The user's last name.
    pub last_name: String,
    /// The user's full name.
    pub name: String,
    /// Whether the user may incur new expenses.
    pub is_active: bool,
    /// The maximum sum of expenses the user may log within one calendar month.
    #[serde(with = "crate::amount")]
    pub monthly_expense_quota: Decimal,
}

impl From<&User> for UserDetails {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            name: user.name(),
            is_active: user.is_active,
            monthly_expense_quota: user.monthly_expense_quota,
        }
    }
}

/// Map a row with the columns `id, first_name, last_name, is_active,
/// monthly_expense_quota` to a [User].
pub(crate) fn map_row_to_user(row: &Row) -> Result<User, rusqlite::Error> {
    let id = row.get(0)?;
    let first_name = row.get(1)?;
    let last_name = row.get(2)?;
    let is_active = row.get(3)?;
    let SqlDecimal(monthly_expense_quota) = row.get(4)?;

    Ok(User {
        id,
        first_name,
        last_name,
        is_active,
        monthly_expense_quota,
    })
}
