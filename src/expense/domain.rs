//! Defines the expense model and the JSON shapes it is sent and received as.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, database_id::uuid_id, user::UserId};

uuid_id!(
    /// The ID of an [Expense].
    ExpenseId
);

/// The maximum number of characters in an expense description.
pub const MAX_DESCRIPTION_LENGTH: usize = 50;

/// Check that `description` has at most [MAX_DESCRIPTION_LENGTH] characters.
///
/// # Errors
/// Returns [Error::DescriptionTooLong] with the length of `description` otherwise.
pub fn validate_description(description: &str) -> Result<(), Error> {
    let length = description.chars().count();

    if length > MAX_DESCRIPTION_LENGTH {
        return Err(Error::DescriptionTooLong(length));
    }

    Ok(())
}

/// An amount of money a user spent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// The expense's ID in the application database.
    pub id: ExpenseId,
    /// What the money was spent on.
    pub description: String,
    /// The amount spent.
    #[serde(with = "crate::amount")]
    pub amount: Decimal,
    /// When the money was spent, in UTC.
    #[serde(with = "crate::timestamp")]
    pub date: OffsetDateTime,
    /// An optional label for grouping expenses.
    pub category: Option<String>,
    /// The user that incurred the expense.
    pub user_id: UserId,
    /// The full name of the user that incurred the expense.
    pub user_name: String,
    /// The company that billed the expense.
    pub billing_company: Option<String>,
    /// The street of the billing address.
    pub billing_street: Option<String>,
    /// The postal code of the billing address.
    pub billing_postal_code: Option<String>,
    /// The city of the billing address.
    pub billing_city: Option<String>,
}

/// The data for creating an [Expense].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    /// What the money was spent on.
    pub description: String,
    /// The amount spent.
    #[serde(with = "crate::amount")]
    pub amount: Decimal,
    /// When the money was spent. Converted to UTC before it is stored.
    #[serde(with = "crate::timestamp")]
    pub date: OffsetDateTime,
    /// An optional label for grouping expenses.
    #[serde(default)]
    pub category: Option<String>,
    /// The user that incurred the expense.
    pub user_id: UserId,
    /// The company that billed the expense.
    #[serde(default)]
    pub billing_company: Option<String>,
    /// The street of the billing address.
    #[serde(default)]
    pub billing_street: Option<String>,
    /// The postal code of the billing address.
    #[serde(default)]
    pub billing_postal_code: Option<String>,
    /// The city of the billing address.
    #[serde(default)]
    pub billing_city: Option<String>,
}
