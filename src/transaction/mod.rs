//! Transaction management for the expense tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, querying, and deleting transactions
//! - The form for entering transactions and the validation of submitted forms
//! - View handlers for transaction-related web pages

mod core;
mod create_page;
mod delete_endpoint;
mod form;
mod submission;
mod table;
mod transactions_page;

pub use core::{
    Transaction, TransactionBuilder, create_transaction, create_transaction_table,
    delete_transaction, get_all_transactions, get_earliest_transaction_date, get_total_expense,
    get_transactions_in_month,
};
pub use create_page::{create_transaction_endpoint, get_add_transaction_page};
pub use delete_endpoint::delete_transaction_endpoint;
pub use form::{FormErrors, TransactionFormValues, transaction_form};
pub use submission::{SaveOutcome, TransactionSubmission, save_submission};
pub use table::transactions_table;
pub use transactions_page::get_transactions_page;

#[cfg(test)]
pub use core::{count_transactions, get_transaction};
