//! Implements a SQLite backed user store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, OptionalExtension, ffi};

use crate::{
    Error,
    db::SqlDecimal,
    stores::UserStore,
    user::{User, UserForm, UserId, map_row_to_user},
};

use super::lock;

/// Creates, retrieves, updates and deletes users in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteUserStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteUserStore {
    /// Create a new user store.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl UserStore for SQLiteUserStore {
    /// Create and insert a new user with a random ID into the database.
    ///
    /// # Errors
    ///
    /// Returns a [Error::SqlError] if an SQL related error occurred.
    fn create(&self, form: UserForm) -> Result<User, Error> {
        let user = form.into_user(UserId::generate());

        let connection = lock(&self.connection)?;
        insert_user(&user, &connection)?;

        Ok(user)
    }

    fn get(&self, id: UserId) -> Result<User, Error> {
        let connection = lock(&self.connection)?;

        select_user(id, &connection)
    }

    fn get_all(&self) -> Result<Vec<User>, Error> {
        let connection = lock(&self.connection)?;

        connection
            .prepare(
                "SELECT id, first_name, last_name, is_active, monthly_expense_quota
                FROM user
                ORDER BY last_name ASC, first_name ASC, id ASC",
            )?
            .query_map([], map_row_to_user)?
            .map(|maybe_user| maybe_user.map_err(Error::from))
            .collect()
    }

    /// Overwrite every field of the user `id` with the values in `form`.
    ///
    /// # Errors
    ///
    /// Returns a [Error::UserNotFound] if there is no user with `id` or
    /// [Error::SqlError] if there are SQL related errors.
    fn update(&self, id: UserId, form: UserForm) -> Result<User, Error> {
        let user = form.into_user(id);

        let connection = lock(&self.connection)?;
        let rows_affected = connection.execute(
            "UPDATE user
            SET first_name = ?1, last_name = ?2, is_active = ?3, monthly_expense_quota = ?4
            WHERE id = ?5",
            (
                &user.first_name,
                &user.last_name,
                user.is_active,
                SqlDecimal(user.monthly_expense_quota),
                id,
            ),
        )?;

        if rows_affected == 0 {
            return Err(Error::UserNotFound(id));
        }

        Ok(user)
    }

    /// Delete the user `id` if no expense refers to them.
    ///
    /// # Errors
    ///
    /// Returns a [Error::UserNotFound] if there is no user with `id`,
    /// [Error::UserHasExpenses] if the user still has expenses or
    /// [Error::SqlError] if there are SQL related errors.
    fn delete(&self, id: UserId) -> Result<(), Error> {
        let connection = lock(&self.connection)?;

        select_user(id, &connection)?;

        let expense_count: i64 = connection.query_row(
            "SELECT COUNT(id) FROM expense WHERE user_id = ?1",
            [id],
            |row| row.get(0),
        )?;

        if expense_count > 0 {
            return Err(Error::UserHasExpenses(id));
        }

        match connection.execute("DELETE FROM user WHERE id = ?1", [id]) {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(sql_error, _))
                if sql_error.extended_code == ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
            {
                Err(Error::UserHasExpenses(id))
            }
            Err(error) => Err(error.into()),
        }
    }
}

/// Get the user `id` using an already locked `connection`.
///
/// # Errors
///
/// Returns a [Error::UserNotFound] if there is no user with `id` or
/// [Error::SqlError] if there are SQL related errors.
pub(crate) fn select_user(id: UserId, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(
            "SELECT id, first_name, last_name, is_active, monthly_expense_quota
            FROM user WHERE id = ?1",
        )?
        .query_row([id], map_row_to_user)
        .optional()?
        .ok_or(Error::UserNotFound(id))
}

/// Insert `user` as is, using an already locked `connection`.
pub(crate) fn insert_user(user: &User, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO user (id, first_name, last_name, is_active, monthly_expense_quota)
        VALUES (?1, ?2, ?3, ?4, ?5)",
        (
            user.id,
            &user.first_name,
            &user.last_name,
            user.is_active,
            SqlDecimal(user.monthly_expense_quota),
        ),
    )?;

    Ok(())
}

#[cfg(test)]
mod user_tests {
    use rust_decimal_macros::dec;
    use time::macros::datetime;

    use crate::{
        Error,
        stores::{ExpenseStore, UserStore},
        test_utils::{get_test_state, new_expense, user_form},
        user::{UserForm, UserId},
    };

    #[test]
    fn create_user_succeeds() {
        let state = get_test_state();
        let form = user_form("Ada", "Lovelace");

        let user = state.user_store.create(form.clone()).unwrap();

        assert_eq!(user.first_name, form.first_name);
        assert_eq!(user.last_name, form.last_name);
        assert!(user.is_active);
        assert_eq!(user.monthly_expense_quota, dec!(1000.00));
    }

    #[test]
    fn get_user_succeeds_with_existing_id() {
        let state = get_test_state();
        let user = state.user_store.create(user_form("Ada", "Lovelace")).unwrap();

        let retrieved_user = state.user_store.get(user.id).unwrap();

        assert_eq!(retrieved_user, user);
    }

    #[test]
    fn get_user_fails_with_non_existent_id() {
        let state = get_test_state();
        let id = UserId::generate();

        assert_eq!(state.user_store.get(id), Err(Error::UserNotFound(id)));
    }

    #[test]
    fn get_all_users_is_sorted_by_name() {
        let state = get_test_state();
        let grace = state.user_store.create(user_form("Grace", "Hopper")).unwrap();
        let ada = state.user_store.create(user_form("Ada", "Lovelace")).unwrap();
        let alan = state.user_store.create(user_form("Alan", "Hopper")).unwrap();

        let users = state.user_store.get_all().unwrap();

        assert_eq!(users, vec![alan, grace, ada]);
    }

    #[test]
    fn update_user_replaces_all_fields() {
        let state = get_test_state();
        let user = state.user_store.create(user_form("Ada", "Lovelace")).unwrap();
        let form = UserForm {
            first_name: "Augusta".to_owned(),
            last_name: "King".to_owned(),
            is_active: false,
            monthly_expense_quota: dec!(12.34),
        };

        let updated_user = state.user_store.update(user.id, form).unwrap();

        assert_eq!(state.user_store.get(user.id).unwrap(), updated_user);
        assert_eq!(updated_user.first_name, "Augusta");
        assert!(!updated_user.is_active);
        assert_eq!(updated_user.monthly_expense_quota, dec!(12.34));
    }

    #[test]
    fn update_user_fails_with_non_existent_id() {
        let state = get_test_state();
        let id = UserId::generate();

        assert_eq!(
            state.user_store.update(id, user_form("Ada", "Lovelace")),
            Err(Error::UserNotFound(id))
        );
    }

    #[test]
    fn delete_user_succeeds() {
        let state = get_test_state();
        let user = state.user_store.create(user_form("Ada", "Lovelace")).unwrap();

        assert_eq!(state.user_store.delete(user.id), Ok(()));
        assert_eq!(
            state.user_store.get(user.id),
            Err(Error::UserNotFound(user.id))
        );
    }

    #[test]
    fn delete_user_fails_with_non_existent_id() {
        let state = get_test_state();
        let id = UserId::generate();

        assert_eq!(state.user_store.delete(id), Err(Error::UserNotFound(id)));
    }

    #[test]
    fn delete_user_with_expenses_fails() {
        let state = get_test_state();
        let user = state.user_store.create(user_form("Ada", "Lovelace")).unwrap();
        state
            .expense_store
            .create(new_expense(user.id, dec!(10), datetime!(2024-02-10 12:00 UTC)))
            .unwrap();

        assert_eq!(
            state.user_store.delete(user.id),
            Err(Error::UserHasExpenses(user.id))
        );
        assert!(state.user_store.get(user.id).is_ok());
    }

    #[test]
    fn storage_restricts_deleting_user_with_expenses() {
        let state = get_test_state();
        let user = state.user_store.create(user_form("Ada", "Lovelace")).unwrap();
        state
            .expense_store
            .create(new_expense(user.id, dec!(10), datetime!(2024-02-10 12:00 UTC)))
            .unwrap();

        let result = state
            .db_connection
            .lock()
            .unwrap()
            .execute("DELETE FROM user WHERE id = ?1", [user.id]);

        assert!(result.is_err());
    }
}
