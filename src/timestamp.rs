//! Parsing, serializing and storing expense timestamps.
//!
//! Timestamps are always normalized to UTC. JSON uses RFC 3339. The database
//! uses a fixed-width text format so that comparing the stored strings gives
//! the same order as comparing the instants they represent.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Deserializer, Serializer};
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, UtcOffset,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use crate::Error;

const STORAGE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:9]Z"
);

const NAIVE_DATE_TIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]");

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// The range of UTC years that can be stored and serialized.
const SUPPORTED_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

/// Parse a client supplied timestamp and convert it to UTC.
///
/// Accepts, in order of preference:
/// - RFC 3339 date-times with an offset, e.g. `2024-02-10T12:00:00+02:00`,
/// - date-times without an offset, which are taken to be UTC, e.g. `2024-02-10T12:00:00`,
/// - calendar dates, which become midnight UTC, e.g. `2024-02-10`.
///
/// # Errors
/// Returns [Error::InvalidDate] if none of the formats match or the timestamp
/// falls outside of the years 0000 to 9999 in UTC.
pub fn parse(text: &str) -> Result<OffsetDateTime, Error> {
    let date_time = if let Ok(date_time) = OffsetDateTime::parse(text, &Rfc3339) {
        date_time
    } else if let Ok(date_time) = PrimitiveDateTime::parse(text, NAIVE_DATE_TIME_FORMAT) {
        date_time.assume_utc()
    } else {
        Date::parse(text, DATE_FORMAT)
            .map(|date| date.midnight().assume_utc())
            .map_err(|error| Error::InvalidDate(format!("{text:?}: {error}")))?
    };

    to_utc(date_time)
}

/// Convert `date_time` to UTC.
///
/// # Errors
/// Returns [Error::InvalidDate] if the result is outside of the years 0000 to 9999.
pub fn to_utc(date_time: OffsetDateTime) -> Result<OffsetDateTime, Error> {
    date_time
        .checked_to_offset(UtcOffset::UTC)
        .filter(|date_time| SUPPORTED_YEARS.contains(&date_time.year()))
        .ok_or_else(|| {
            Error::InvalidDate(format!(
                "{date_time} is outside of the years 0000 to 9999 in UTC"
            ))
        })
}

/// Serialize a timestamp as an RFC 3339 string in UTC.
///
/// For use with `#[serde(with = "crate::timestamp")]`.
pub fn serialize<S>(date_time: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let text = to_utc(*date_time)
        .map_err(serde::ser::Error::custom)?
        .format(&Rfc3339)
        .map_err(serde::ser::Error::custom)?;

    serializer.serialize_str(&text)
}

/// Deserialize a timestamp with [parse].
///
/// For use with `#[serde(with = "crate::timestamp")]`.
pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;

    parse(&text).map_err(serde::de::Error::custom)
}

/// Adapter for binding and reading timestamps in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SqlTimestamp(pub OffsetDateTime);

impl ToSql for SqlTimestamp {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        to_utc(self.0)
            .map_err(|error| rusqlite::Error::ToSqlConversionFailure(Box::new(error)))?
            .format(STORAGE_FORMAT)
            .map(ToSqlOutput::from)
            .map_err(|error| rusqlite::Error::ToSqlConversionFailure(Box::new(error)))
    }
}

impl FromSql for SqlTimestamp {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;

        PrimitiveDateTime::parse(text, STORAGE_FORMAT)
            .map(|date_time| SqlTimestamp(date_time.assume_utc()))
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}
