//! Implements a SQLite backed expense store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, OptionalExtension, Row, Transaction, TransactionBehavior, params};
use rust_decimal::Decimal;

use crate::{
    Error,
    db::SqlDecimal,
    expense::{Expense, ExpenseId, NewExpense, check_quota, validate_description},
    period::MonthPeriod,
    stores::ExpenseStore,
    timestamp::{self, SqlTimestamp},
    user::UserId,
};

use super::{lock, select_user};

/// Selects the columns read by [map_row_to_expense], joined with the owning user.
const SELECT_EXPENSE: &str = "SELECT
        e.id,
        e.description,
        e.amount,
        e.date,
        e.category,
        e.user_id,
        u.first_name || ' ' || u.last_name,
        e.billing_company,
        e.billing_street,
        e.billing_postal_code,
        e.billing_city
    FROM expense e
    INNER JOIN user u ON u.id = e.user_id";

const ORDER_BY_DATE: &str = "ORDER BY e.date ASC, e.id ASC";

/// Creates, retrieves and deletes expenses in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteExpenseStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteExpenseStore {
    /// Create a new expense store.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn query_expenses(
        &self,
        filter: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Expense>, Error> {
        let connection = lock(&self.connection)?;

        connection
            .prepare(&format!("{SELECT_EXPENSE} {filter} {ORDER_BY_DATE}"))?
            .query_map(params, map_row_to_expense)?
            .map(|maybe_expense| maybe_expense.map_err(Error::from))
            .collect()
    }
}

impl ExpenseStore for SQLiteExpenseStore {
    /// Check `new_expense` against the business rules and insert it with a random ID.
    ///
    /// The checks and the insert run in one immediate transaction while the
    /// database lock is held, so concurrent requests for the same user see
    /// each other's expenses when summing the monthly total.
    ///
    /// # Errors
    ///
    /// Returns [Error::UserNotFound], [Error::InactiveUser],
    /// [Error::DescriptionTooLong] or [Error::QuotaExceeded] if a check fails,
    /// [Error::AmountOverflow] if the monthly total cannot be computed,
    /// or [Error::SqlError] if there are SQL related errors.
    fn create(&self, new_expense: NewExpense) -> Result<Expense, Error> {
        let connection = lock(&self.connection)?;
        let transaction = Transaction::new_unchecked(&connection, TransactionBehavior::Immediate)?;

        let user = select_user(new_expense.user_id, &transaction)?;

        if !user.is_active {
            return Err(Error::InactiveUser(user.id));
        }

        validate_description(&new_expense.description)?;

        let date = timestamp::to_utc(new_expense.date)?;
        let period = MonthPeriod::containing(date)?;
        let current_total = sum_in_period(user.id, period, &transaction)?;

        check_quota(user.monthly_expense_quota, current_total, new_expense.amount)?;

        let expense = Expense {
            id: ExpenseId::generate(),
            description: new_expense.description,
            amount: new_expense.amount,
            date,
            category: new_expense.category,
            user_id: user.id,
            user_name: user.name(),
            billing_company: new_expense.billing_company,
            billing_street: new_expense.billing_street,
            billing_postal_code: new_expense.billing_postal_code,
            billing_city: new_expense.billing_city,
        };

        insert_expense(&expense, &transaction)?;
        transaction.commit()?;

        tracing::debug!(
            "Created expense {} of {} for user {}, monthly total is now {}",
            expense.id,
            expense.amount,
            user.id,
            current_total + expense.amount
        );

        Ok(expense)
    }

    fn get(&self, id: ExpenseId) -> Result<Expense, Error> {
        let connection = lock(&self.connection)?;

        connection
            .prepare(&format!("{SELECT_EXPENSE} WHERE e.id = ?1"))?
            .query_row([id], map_row_to_expense)
            .optional()?
            .ok_or(Error::ExpenseNotFound(id))
    }

    fn get_all(&self) -> Result<Vec<Expense>, Error> {
        self.query_expenses("", [])
    }

    fn get_by_user(&self, user_id: UserId) -> Result<Vec<Expense>, Error> {
        self.query_expenses("WHERE e.user_id = ?1", [user_id])
    }

    fn get_in_period(&self, user_id: UserId, period: MonthPeriod) -> Result<Vec<Expense>, Error> {
        self.query_expenses(
            "WHERE e.user_id = ?1 AND e.date >= ?2 AND e.date < ?3",
            params![
                user_id,
                SqlTimestamp(period.start()),
                SqlTimestamp(period.end())
            ],
        )
    }

    fn delete(&self, id: ExpenseId) -> Result<(), Error> {
        let connection = lock(&self.connection)?;
        let rows_affected = connection.execute("DELETE FROM expense WHERE id = ?1", [id])?;

        if rows_affected == 0 {
            return Err(Error::ExpenseNotFound(id));
        }

        Ok(())
    }

    fn delete_in_period(&self, user_id: UserId, period: MonthPeriod) -> Result<usize, Error> {
        let connection = lock(&self.connection)?;
        let rows_affected = connection.execute(
            "DELETE FROM expense WHERE user_id = ?1 AND date >= ?2 AND date < ?3",
            params![
                user_id,
                SqlTimestamp(period.start()),
                SqlTimestamp(period.end())
            ],
        )?;

        Ok(rows_affected)
    }
}

/// The sum of the amounts of the expenses of `user_id` dated within `period`.
///
/// Amounts are added in date order, the same order as in reports.
///
/// # Errors
/// Returns [Error::AmountOverflow] if a running total does not fit in a [Decimal].
fn sum_in_period(
    user_id: UserId,
    period: MonthPeriod,
    connection: &Connection,
) -> Result<Decimal, Error> {
    let mut statement = connection.prepare(
        "SELECT amount FROM expense WHERE user_id = ?1 AND date >= ?2 AND date < ?3 \
        ORDER BY date ASC, id ASC",
    )?;
    let amounts = statement.query_map(
        params![
            user_id,
            SqlTimestamp(period.start()),
            SqlTimestamp(period.end())
        ],
        |row| row.get::<_, SqlDecimal>(0),
    )?;

    let mut total = Decimal::ZERO;

    for amount in amounts {
        let SqlDecimal(amount) = amount?;
        total = total.checked_add(amount).ok_or(Error::AmountOverflow)?;
    }

    Ok(total)
}

/// Insert `expense` as is, without any checks, using an already locked `connection`.
pub(crate) fn insert_expense(expense: &Expense, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO expense (
            id, description, amount, date, category, user_id,
            billing_company, billing_street, billing_postal_code, billing_city
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            expense.id,
            expense.description,
            SqlDecimal(expense.amount),
            SqlTimestamp(expense.date),
            expense.category,
            expense.user_id,
            expense.billing_company,
            expense.billing_street,
            expense.billing_postal_code,
            expense.billing_city,
        ],
    )?;

    Ok(())
}

fn map_row_to_expense(row: &Row) -> Result<Expense, rusqlite::Error> {
    let SqlDecimal(amount) = row.get(2)?;
    let SqlTimestamp(date) = row.get(3)?;

    Ok(Expense {
        id: row.get(0)?,
        description: row.get(1)?,
        amount,
        date,
        category: row.get(4)?,
        user_id: row.get(5)?,
        user_name: row.get(6)?,
        billing_company: row.get(7)?,
        billing_street: row.get(8)?,
        billing_postal_code: row.get(9)?,
        billing_city: row.get(10)?,
    })
}

#[cfg(test)]
mod expense_tests {
    use std::{sync::Barrier, thread};

    use rust_decimal_macros::dec;
    use time::macros::{datetime, offset};

    use crate::{
        Error,
        expense::ExpenseId,
        period::MonthPeriod,
        stores::{ExpenseStore, UserStore},
        test_utils::{create_user_with_quota, get_test_state, new_expense, user_form},
        user::UserForm,
    };

    #[test]
    fn create_expense_succeeds() {
        let state = get_test_state();
        let user = state.user_store.create(user_form("Ada", "Lovelace")).unwrap();
        let mut new = new_expense(user.id, dec!(12.34), datetime!(2024-02-10 12:00 UTC));
        new.category = Some("Food".to_owned());
        new.billing_city = Some("London".to_owned());

        let expense = state.expense_store.create(new.clone()).unwrap();

        assert_eq!(expense.description, new.description);
        assert_eq!(expense.amount, dec!(12.34));
        assert_eq!(expense.date, new.date);
        assert_eq!(expense.category, new.category);
        assert_eq!(expense.billing_city, new.billing_city);
        assert_eq!(expense.user_id, user.id);
        assert_eq!(expense.user_name, "Ada Lovelace");
        assert_eq!(state.expense_store.get(expense.id), Ok(expense));
    }

    #[test]
    fn create_expense_fails_for_non_existent_user() {
        let state = get_test_state();
        let user_id = crate::user::UserId::generate();

        let result = state
            .expense_store
            .create(new_expense(user_id, dec!(1), datetime!(2024-02-10 12:00 UTC)));

        assert_eq!(result, Err(Error::UserNotFound(user_id)));
    }

    #[test]
    fn create_expense_fails_for_inactive_user() {
        let state = get_test_state();
        let user = state
            .user_store
            .create(UserForm {
                is_active: false,
                ..user_form("Ada", "Lovelace")
            })
            .unwrap();

        let result = state
            .expense_store
            .create(new_expense(user.id, dec!(1), datetime!(2024-02-10 12:00 UTC)));

        assert_eq!(result, Err(Error::InactiveUser(user.id)));
    }

    #[test]
    fn inactive_user_is_rejected_before_description_is_checked() {
        let state = get_test_state();
        let user = state
            .user_store
            .create(UserForm {
                is_active: false,
                ..user_form("Ada", "Lovelace")
            })
            .unwrap();
        let mut new = new_expense(user.id, dec!(1), datetime!(2024-02-10 12:00 UTC));
        new.description = "a".repeat(51);

        let result = state.expense_store.create(new);

        assert_eq!(result, Err(Error::InactiveUser(user.id)));
    }

    #[test]
    fn create_expense_fails_with_long_description() {
        let state = get_test_state();
        let user = state.user_store.create(user_form("Ada", "Lovelace")).unwrap();
        let mut new = new_expense(user.id, dec!(1), datetime!(2024-02-10 12:00 UTC));
        new.description = "a".repeat(51);

        let result = state.expense_store.create(new);

        assert_eq!(result, Err(Error::DescriptionTooLong(51)));
        assert_eq!(state.expense_store.get_all(), Ok(vec![]));
    }

    #[test]
    fn expense_reaching_quota_exactly_succeeds() {
        let state = get_test_state();
        let user = create_user_with_quota(&state, dec!(1000.00));
        let date = datetime!(2024-02-10 12:00 UTC);
        state
            .expense_store
            .create(new_expense(user.id, dec!(950.00), date))
            .unwrap();

        let result = state
            .expense_store
            .create(new_expense(user.id, dec!(50.00), date));

        assert!(result.is_ok());
    }

    #[test]
    fn expense_over_quota_fails() {
        let state = get_test_state();
        let user = create_user_with_quota(&state, dec!(1000.00));
        let date = datetime!(2024-02-10 12:00 UTC);
        state
            .expense_store
            .create(new_expense(user.id, dec!(950.00), date))
            .unwrap();

        let result = state
            .expense_store
            .create(new_expense(user.id, dec!(50.01), date));

        assert_eq!(
            result,
            Err(Error::QuotaExceeded {
                quota: dec!(1000.00),
                current_total: dec!(950.00),
                attempted: dec!(50.01),
            })
        );
    }

    #[test]
    fn quota_only_counts_expenses_in_the_same_month() {
        let state = get_test_state();
        let user = create_user_with_quota(&state, dec!(100));
        state
            .expense_store
            .create(new_expense(user.id, dec!(100), datetime!(2024-01-31 23:59:59 UTC)))
            .unwrap();

        let result = state
            .expense_store
            .create(new_expense(user.id, dec!(100), datetime!(2024-02-01 00:00 UTC)));

        assert!(result.is_ok());
    }

    #[test]
    fn quota_only_counts_expenses_of_the_same_user() {
        let state = get_test_state();
        let ada = create_user_with_quota(&state, dec!(100));
        let grace = create_user_with_quota(&state, dec!(100));
        let date = datetime!(2024-02-10 12:00 UTC);
        state
            .expense_store
            .create(new_expense(grace.id, dec!(100), date))
            .unwrap();

        let result = state.expense_store.create(new_expense(ada.id, dec!(100), date));

        assert!(result.is_ok());
    }

    #[test]
    fn date_is_stored_in_utc_and_counted_in_utc_month() {
        let state = get_test_state();
        let user = create_user_with_quota(&state, dec!(100));
        // 00:30 on the 1st of March in UTC+2 is the 29th of February in UTC.
        let date = datetime!(2024-03-01 00:30).assume_offset(offset!(+2));

        let expense = state
            .expense_store
            .create(new_expense(user.id, dec!(100), date))
            .unwrap();

        assert_eq!(expense.date, datetime!(2024-02-29 22:30 UTC));
        assert_eq!(expense.date.offset(), time::UtcOffset::UTC);
        let february = MonthPeriod::for_report(2024, 2).unwrap();
        assert_eq!(
            state.expense_store.get_in_period(user.id, february),
            Ok(vec![expense])
        );
        let result = state.expense_store.create(new_expense(
            user.id,
            dec!(0.01),
            datetime!(2024-02-15 12:00 UTC),
        ));
        assert!(matches!(result, Err(Error::QuotaExceeded { .. })));
    }

    #[test]
    fn concurrent_creates_cannot_both_exceed_quota() {
        let state = get_test_state();
        let user = create_user_with_quota(&state, dec!(1000));
        let barrier = Barrier::new(2);
        let date = datetime!(2024-02-10 12:00 UTC);

        let results: Vec<_> = thread::scope(|scope| {
            let handles: Vec<_> = (0..2)
                .map(|_| {
                    let store = state.expense_store.clone();
                    let barrier = &barrier;

                    scope.spawn(move || {
                        barrier.wait();
                        store.create(new_expense(user.id, dec!(600), date))
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .collect()
        });

        assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
        assert!(results.iter().any(|result| matches!(
            result,
            Err(Error::QuotaExceeded { current_total, .. }) if *current_total == dec!(600)
        )));
        assert_eq!(state.expense_store.get_by_user(user.id).unwrap().len(), 1);
    }

    #[test]
    fn get_expense_fails_with_non_existent_id() {
        let state = get_test_state();
        let id = ExpenseId::generate();

        assert_eq!(state.expense_store.get(id), Err(Error::ExpenseNotFound(id)));
    }

    #[test]
    fn get_all_is_sorted_by_date() {
        let state = get_test_state();
        let user = state.user_store.create(user_form("Ada", "Lovelace")).unwrap();
        let later = state
            .expense_store
            .create(new_expense(user.id, dec!(1), datetime!(2024-03-01 00:00 UTC)))
            .unwrap();
        let earlier = state
            .expense_store
            .create(new_expense(user.id, dec!(1), datetime!(2024-02-01 00:00 UTC)))
            .unwrap();

        assert_eq!(state.expense_store.get_all(), Ok(vec![earlier, later]));
    }

    #[test]
    fn get_by_user_only_returns_that_users_expenses() {
        let state = get_test_state();
        let ada = state.user_store.create(user_form("Ada", "Lovelace")).unwrap();
        let grace = state.user_store.create(user_form("Grace", "Hopper")).unwrap();
        let date = datetime!(2024-02-10 12:00 UTC);
        let expense = state
            .expense_store
            .create(new_expense(ada.id, dec!(1), date))
            .unwrap();
        state
            .expense_store
            .create(new_expense(grace.id, dec!(1), date))
            .unwrap();

        assert_eq!(state.expense_store.get_by_user(ada.id), Ok(vec![expense]));
    }

    #[test]
    fn get_by_user_is_empty_for_unknown_user() {
        let state = get_test_state();

        assert_eq!(
            state
                .expense_store
                .get_by_user(crate::user::UserId::generate()),
            Ok(vec![])
        );
    }

    #[test]
    fn get_in_period_uses_half_open_month() {
        let state = get_test_state();
        let user = state.user_store.create(user_form("Ada", "Lovelace")).unwrap();
        let dates = [
            datetime!(2024-01-31 23:59:59.999 UTC),
            datetime!(2024-02-01 00:00 UTC),
            datetime!(2024-02-29 23:59:59.999 UTC),
            datetime!(2024-03-01 00:00 UTC),
        ];
        let expenses: Vec<_> = dates
            .into_iter()
            .map(|date| {
                state
                    .expense_store
                    .create(new_expense(user.id, dec!(1), date))
                    .unwrap()
            })
            .collect();
        let february = MonthPeriod::for_report(2024, 2).unwrap();

        let got = state.expense_store.get_in_period(user.id, february).unwrap();

        assert_eq!(got, expenses[1..3].to_vec());
    }

    #[test]
    fn delete_expense_succeeds() {
        let state = get_test_state();
        let user = state.user_store.create(user_form("Ada", "Lovelace")).unwrap();
        let expense = state
            .expense_store
            .create(new_expense(user.id, dec!(1), datetime!(2024-02-10 12:00 UTC)))
            .unwrap();

        assert_eq!(state.expense_store.delete(expense.id), Ok(()));
        assert_eq!(
            state.expense_store.get(expense.id),
            Err(Error::ExpenseNotFound(expense.id))
        );
    }

    #[test]
    fn delete_expense_fails_with_non_existent_id() {
        let state = get_test_state();
        let id = ExpenseId::generate();

        assert_eq!(
            state.expense_store.delete(id),
            Err(Error::ExpenseNotFound(id))
        );
    }

    #[test]
    fn delete_in_period_only_removes_expenses_in_period() {
        let state = get_test_state();
        let user = state.user_store.create(user_form("Ada", "Lovelace")).unwrap();
        let january = state
            .expense_store
            .create(new_expense(user.id, dec!(1), datetime!(2024-01-31 23:00 UTC)))
            .unwrap();
        for day in [1, 15, 29] {
            let date = datetime!(2024-02-01 12:00 UTC).replace_day(day).unwrap();
            state
                .expense_store
                .create(new_expense(user.id, dec!(1), date))
                .unwrap();
        }
        let february = MonthPeriod::for_report(2024, 2).unwrap();

        assert_eq!(state.expense_store.delete_in_period(user.id, february), Ok(3));
        assert_eq!(state.expense_store.get_by_user(user.id), Ok(vec![january]));
        assert_eq!(state.expense_store.delete_in_period(user.id, february), Ok(0));
    }
}
