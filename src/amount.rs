//! Reading and writing money amounts as exact JSON numbers.
//!
//! JSON numbers are read from their literal digits instead of through `f64`,
//! so `50.000000000000001` stays distinct from `50`. Amounts are written with
//! trailing zeros removed, e.g. `12.50` becomes `12.5`.

use rust_decimal::Decimal;
use serde::{Deserializer, Serializer};

/// Serialize an amount as a JSON number with no trailing zeros.
///
/// For use with `#[serde(with = "crate::amount")]`.
pub fn serialize<S>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    rust_decimal::serde::arbitrary_precision::serialize(&amount.normalize(), serializer)
}

/// Deserialize an amount from a JSON number without rounding through `f64`.
///
/// For use with `#[serde(with = "crate::amount")]`.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    rust_decimal::serde::arbitrary_precision::deserialize(deserializer)
}
