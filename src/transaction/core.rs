//! Defines the core data model and database queries for transactions.

use rusqlite::{Connection, OptionalExtension, Row};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use time::{Date, Month};

use crate::{Error, database_id::TransactionId};

// ============================================================================
// MODELS
// ============================================================================

/// An expense, i.e. an event where money was spent.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A short label for what the money was spent on.
    pub title: String,
    /// The amount of money spent, in dollars with two decimal places.
    pub amount: Decimal,
    /// A free-text label used to group transactions, e.g. "Food".
    pub category: String,
    /// When the transaction happened.
    pub date: Date,
    /// The path of the receipt image relative to the upload directory, if any.
    pub image: Option<String>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(title: &str, amount: Decimal, category: &str, date: Date) -> TransactionBuilder {
        TransactionBuilder {
            title: title.to_owned(),
            amount,
            category: category.to_owned(),
            date,
            image: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// Pass the builder to [create_transaction] to store the transaction and get
/// back a [Transaction] with its ID.
///
/// # Examples
///
/// ```ignore
/// use rust_decimal::Decimal;
/// use time::macros::date;
///
/// let coffee = create_transaction(
///     Transaction::build("Coffee", Decimal::new(350, 2), "Food", date!(2024 - 01 - 05))
///         .image(Some("transaction_images/receipt.png".to_owned())),
///     &connection,
/// )?;
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// A short label for what the money was spent on.
    pub title: String,
    /// The amount of money spent.
    ///
    /// Amounts are stored with two decimal places, extra places are rounded.
    pub amount: Decimal,
    /// A free-text label used to group transactions.
    pub category: String,
    /// The date when the transaction occurred.
    pub date: Date,
    /// The path of the receipt image relative to the upload directory.
    pub image: Option<String>,
}

impl TransactionBuilder {
    /// Set the receipt image for the transaction.
    pub fn image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }
}

/// Convert `amount` to a whole number of cents, rounding to two decimal places.
fn to_cents(amount: Decimal) -> Option<i64> {
    amount
        .round_dp(2)
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|cents| cents.to_i64())
}

fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// The first day of `month` in `year` and the first day of the following month.
///
/// Returns `None` if `year` is outside the range of supported dates.
fn month_bounds(month: Month, year: i32) -> Option<(Date, Date)> {
    let start = Date::from_calendar_date(year, month, 1).ok()?;
    let end = match month {
        Month::December => Date::from_calendar_date(year.checked_add(1)?, Month::January, 1),
        month => Date::from_calendar_date(year, month.next(), 1),
    }
    .ok()?;

    Some((start, end))
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::AmountOutOfRange] if the amount cannot be stored as cents,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let amount_cents = to_cents(builder.amount).ok_or(Error::AmountOutOfRange(builder.amount))?;

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (title, amount_cents, category, date, image)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, title, amount_cents, category, date, image",
        )?
        .query_row(
            (
                builder.title,
                amount_cents,
                builder.category,
                builder.date,
                builder.image,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, title, amount_cents, category, date, image FROM \"transaction\" WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve every transaction, newest first.
///
/// Transactions on the same date are ordered by most recently created first.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, title, amount_cents, category, date, image FROM \"transaction\"
             ORDER BY date DESC, id DESC",
        )?
        .query_map([], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the transactions dated within `month` of `year`, newest first.
///
/// Years outside of the supported date range have no transactions.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_transactions_in_month(
    month: Month,
    year: i32,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let Some((start, end)) = month_bounds(month, year) else {
        tracing::debug!("Year {year} is out of range, returning no transactions");
        return Ok(Vec::new());
    };

    connection
        .prepare(
            "SELECT id, title, amount_cents, category, date, image FROM \"transaction\"
             WHERE date >= :start AND date < :end
             ORDER BY date DESC, id DESC",
        )?
        .query_map(&[(":start", &start), (":end", &end)], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Delete the transaction with `id`, returning the deleted transaction.
///
/// Deleting a transaction that does not exist is not an error, `None` is
/// returned instead.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn delete_transaction(
    id: TransactionId,
    connection: &Connection,
) -> Result<Option<Transaction>, Error> {
    connection
        .prepare(
            "DELETE FROM \"transaction\" WHERE id = :id
             RETURNING id, title, amount_cents, category, date, image",
        )?
        .query_row(&[(":id", &id)], map_transaction_row)
        .optional()
        .map_err(|error| error.into())
}

/// Get the sum of the amounts of every transaction, or zero if there are none.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_total_expense(connection: &Connection) -> Result<Decimal, Error> {
    let cents: i64 = connection.query_row(
        "SELECT COALESCE(SUM(amount_cents), 0) FROM \"transaction\"",
        [],
        |row| row.get(0),
    )?;

    Ok(from_cents(cents))
}

/// Get the date of the oldest transaction, or `None` if there are no transactions.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_earliest_transaction_date(connection: &Connection) -> Result<Option<Date>, Error> {
    connection
        .query_row("SELECT MIN(date) FROM \"transaction\"", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            amount_cents INTEGER NOT NULL,
            category TEXT NOT NULL,
            date TEXT NOT NULL,
            image TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
    )
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let title = row.get(1)?;
    let amount = from_cents(row.get(2)?);
    let category = row.get(3)?;
    let date = row.get(4)?;
    let image = row.get(5)?;

    Ok(Transaction {
        id,
        title,
        amount,
        category,
        date,
        image,
    })
}

// ============================================================================
// TESTS
// ============================================================================
