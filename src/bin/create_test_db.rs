use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::{Duration, OffsetDateTime};

use expense_tracker::{Transaction, create_transaction, initialize_db};

/// A utility for creating a test database for the expense tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Title, amount in cents, category and age in days of the sample transactions.
const SAMPLE_TRANSACTIONS: [(&str, i64, &str, i64); 8] = [
    ("Coffee", 350, "Food", 0),
    ("Groceries", 8_742, "Food", 3),
    ("Bus fare", 420, "Transport", 5),
    ("Electricity", 12_380, "Utilities", 18),
    ("Movie tickets", 3_600, "Entertainment", 34),
    ("Rent", 55_000, "Housing", 40),
    ("Lunch", 1_850, "Food", 71),
    ("Winter jacket", 14_999, "Clothing", 380),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating sample transactions...");

    let today = OffsetDateTime::now_utc().date();

    for (title, cents, category, age_in_days) in SAMPLE_TRANSACTIONS {
        create_transaction(
            Transaction::build(
                title,
                Decimal::new(cents, 2),
                category,
                today - Duration::days(age_in_days),
            ),
            &conn,
        )?;
    }

    println!("Success!");

    Ok(())
}
