//! Opening the application database and migrating its schema.

use std::{path::Path, str::FromStr};

use rusqlite::{
    Connection, Transaction, TransactionBehavior,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use rust_decimal::Decimal;

use crate::Error;

/// The schema version after all [MIGRATIONS] have been applied.
pub(crate) const CURRENT_SCHEMA_VERSION: i64 = 2;

/// Schema changes in the order they must be applied, keyed by the version they produce.
const MIGRATIONS: &[(i64, &str)] = &[
    (
        1,
        "CREATE TABLE IF NOT EXISTS user (
            id TEXT PRIMARY KEY,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS expense (
            id TEXT PRIMARY KEY,
            description TEXT NOT NULL CHECK (length(description) <= 50),
            amount TEXT NOT NULL,
            date TEXT NOT NULL,
            category TEXT,
            user_id TEXT NOT NULL,
            billing_company TEXT,
            billing_street TEXT,
            billing_postal_code TEXT,
            billing_city TEXT,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE RESTRICT
        );

        CREATE INDEX IF NOT EXISTS idx_expense_user_id ON expense(user_id);
        CREATE INDEX IF NOT EXISTS idx_expense_date ON expense(date);",
    ),
    (
        2,
        "ALTER TABLE user ADD COLUMN monthly_expense_quota TEXT NOT NULL DEFAULT '1000.00';",
    ),
];

/// Open the SQLite database at `path`, creating the file if it does not exist.
///
/// Foreign key enforcement is switched on for the returned connection.
///
/// # Errors
/// Returns [Error::SqlError] if the file cannot be opened.
pub fn open_connection(path: &Path) -> Result<Connection, Error> {
    let connection = Connection::open(path)?;
    connection.execute_batch("PRAGMA foreign_keys = ON;")?;

    Ok(connection)
}

/// Create the tables for the domain models and bring the schema up to date.
///
/// Migrations newer than the version recorded in the `schema_version` table
/// are applied inside a single transaction, so a failed migration leaves the
/// schema untouched.
///
/// # Errors
/// Returns [Error::SqlError] if a migration fails.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.execute_batch("PRAGMA foreign_keys = ON;")?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    transaction.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)",
        (),
    )?;

    let current_version: i64 = transaction.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;

    for (version, sql) in MIGRATIONS {
        if *version > current_version {
            tracing::info!("Applying schema migration {version}");
            transaction.execute_batch(sql)?;
        }
    }

    if current_version < CURRENT_SCHEMA_VERSION {
        transaction.execute("DELETE FROM schema_version", ())?;
        transaction.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [CURRENT_SCHEMA_VERSION],
        )?;
    }

    transaction.commit()?;

    Ok(())
}

/// Adapter for storing currency amounts as decimal text.
///
/// SQLite has no decimal type and `REAL` would introduce rounding errors, so
/// amounts are kept as text and summed in Rust.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SqlDecimal(pub Decimal);

impl ToSql for SqlDecimal {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.to_string()))
    }
}

impl FromSql for SqlDecimal {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Integer(integer) => Ok(SqlDecimal(Decimal::from(integer))),
            value => Decimal::from_str(value.as_str()?)
                .map(SqlDecimal)
                .map_err(|error| FromSqlError::Other(Box::new(error))),
        }
    }
}
