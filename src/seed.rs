//! Demo data for trying out the API.

use rusqlite::{Connection, Transaction, TransactionBehavior};
use rust_decimal::Decimal;
use time::{Duration, OffsetDateTime};

use crate::{
    Error,
    expense::{Expense, ExpenseId},
    stores::sqlite::{insert_expense, insert_user},
    user::{User, UserId, default_monthly_quota, map_row_to_user},
};

const DEMO_USERS: [(&str, &str, bool); 10] = [
    ("Juste", "Leblanc", true),
    ("Marc", "Assin", false),
    ("Sophie", "Martin", true),
    ("Pierre", "Dubois", true),
    ("Marie", "Bernard", false),
    ("Jean", "Lefebvre", true),
    ("Claire", "Moreau", true),
    ("Thomas", "Laurent", true),
    ("Julie", "Simon", false),
    ("Antoine", "Michel", true),
];

struct DemoExpense {
    user_index: usize,
    days_ago: i64,
    description: &'static str,
    /// Amount in cents.
    amount: i64,
    category: &'static str,
    company: &'static str,
    street: &'static str,
    postal_code: &'static str,
    city: &'static str,
}

const DEMO_EXPENSES: [DemoExpense; 5] = [
    DemoExpense {
        user_index: 0,
        days_ago: 10,
        description: "Repas d'affaires",
        amount: 45_50,
        category: "Restaurant",
        company: "Restaurant Le Gourmet",
        street: "15 Rue de la Paix",
        postal_code: "75001",
        city: "Paris",
    },
    DemoExpense {
        user_index: 0,
        days_ago: 8,
        description: "Transport en taxi",
        amount: 28_00,
        category: "Transport",
        company: "Taxi Parisien",
        street: "10 Avenue des Champs",
        postal_code: "75008",
        city: "Paris",
    },
    DemoExpense {
        user_index: 2,
        days_ago: 5,
        description: "Hôtel pour déplacement",
        amount: 120_00,
        category: "Hébergement",
        company: "Hôtel Central",
        street: "25 Boulevard Saint-Michel",
        postal_code: "75005",
        city: "Paris",
    },
    DemoExpense {
        user_index: 3,
        days_ago: 3,
        description: "Fournitures de bureau",
        amount: 35_75,
        category: "Fournitures",
        company: "Papeterie Moderne",
        street: "8 Rue du Commerce",
        postal_code: "69001",
        city: "Lyon",
    },
    DemoExpense {
        user_index: 4,
        days_ago: 1,
        description: "Carburant",
        amount: 65_20,
        category: "Transport",
        company: "Station Total",
        street: "42 Route Nationale",
        postal_code: "13001",
        city: "Marseille",
    },
];

/// Fill empty tables with demo users and expenses.
///
/// Users are only added if there are no users, and expenses only if there
/// are no expenses and enough users to own them.
/// The demo rows are inserted directly, so the expense rules are not applied.
///
/// # Errors
/// Returns [Error::SqlError] if the database could not be read or written.
pub fn seed_demo_data(connection: &Connection) -> Result<(), Error> {
    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    if count_rows("user", &transaction)? == 0 {
        for (first_name, last_name, is_active) in DEMO_USERS {
            let user = User {
                id: UserId::generate(),
                first_name: first_name.to_owned(),
                last_name: last_name.to_owned(),
                is_active,
                monthly_expense_quota: default_monthly_quota(),
            };

            insert_user(&user, &transaction)?;
        }

        tracing::info!("Seeded {} demo users", DEMO_USERS.len());
    }

    if count_rows("expense", &transaction)? == 0 {
        let users = transaction
            .prepare(
                "SELECT id, first_name, last_name, is_active, monthly_expense_quota
                FROM user ORDER BY rowid",
            )?
            .query_map([], map_row_to_user)?
            .collect::<Result<Vec<User>, rusqlite::Error>>()?;

        let users_needed = DEMO_EXPENSES
            .iter()
            .map(|demo| demo.user_index + 1)
            .max()
            .unwrap_or(0);

        if users.len() < users_needed {
            tracing::warn!(
                "Not seeding demo expenses, they need {users_needed} users but there are {}",
                users.len()
            );
            return Ok(transaction.commit()?);
        }

        let now = OffsetDateTime::now_utc();

        for demo in &DEMO_EXPENSES {
            let user = &users[demo.user_index];

            let expense = Expense {
                id: ExpenseId::generate(),
                description: demo.description.to_owned(),
                amount: Decimal::new(demo.amount, 2),
                date: now - Duration::days(demo.days_ago),
                category: Some(demo.category.to_owned()),
                user_id: user.id,
                user_name: user.name(),
                billing_company: Some(demo.company.to_owned()),
                billing_street: Some(demo.street.to_owned()),
                billing_postal_code: Some(demo.postal_code.to_owned()),
                billing_city: Some(demo.city.to_owned()),
            };

            insert_expense(&expense, &transaction)?;
        }

        tracing::info!("Seeded {} demo expenses", DEMO_EXPENSES.len());
    }

    transaction.commit()?;

    Ok(())
}

fn count_rows(table: &str, connection: &Connection) -> Result<i64, Error> {
    let count = connection.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })?;

    Ok(count)
}
