//! Dashboard module
//!
//! Shows the total expense, the form for adding transactions, and every
//! transaction with a month filter and links to the PDF reports.

mod filter;
mod handlers;
mod summary;

pub use handlers::{create_transaction_from_dashboard, get_dashboard_page};
