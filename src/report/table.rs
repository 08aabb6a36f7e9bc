//! The tables that make up the PDF reports.

use time::Month;

use crate::{
    report::style::{TableStyle, all_transactions_style, monthly_style},
    transaction::Transaction,
};

/// The column headings shared by both reports.
pub const HEADER: [&str; 5] = ["ID", "Title", "Amount", "Category", "Date"];

/// The column widths of the monthly report in points.
pub const MONTHLY_COLUMN_WIDTHS: [f32; 5] = [70.0, 120.0, 80.0, 120.0, 100.0];

/// How wide each column of a report table is.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnWidths {
    /// Wide enough for the widest cell in each column.
    Auto,
    /// Fixed widths in points, one per column.
    Fixed(Vec<f32>),
}

/// A table of text cells ready to be rendered to a PDF.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    /// The title stored in the document's metadata.
    pub document_title: String,
    pub rows: Vec<Vec<String>>,
    pub column_widths: ColumnWidths,
    pub style: TableStyle,
}

impl ReportTable {
    /// The number of columns of the widest row.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or_default()
    }
}

fn header_row() -> Vec<String> {
    HEADER.iter().map(|&heading| heading.to_owned()).collect()
}

fn transaction_row(transaction: &Transaction) -> Vec<String> {
    vec![
        transaction.id.to_string(),
        transaction.title.clone(),
        transaction.amount.to_string(),
        transaction.category.clone(),
        transaction.date.to_string(),
    ]
}

/// A table with a header row and one row per transaction in the given order.
pub fn all_transactions_table(transactions: &[Transaction]) -> ReportTable {
    let rows = std::iter::once(header_row())
        .chain(transactions.iter().map(transaction_row))
        .collect();

    ReportTable {
        document_title: "Transactions".to_owned(),
        rows,
        column_widths: ColumnWidths::Auto,
        style: all_transactions_style(),
    }
}

/// The title of the monthly report, e.g. "January 2024 - Monthly Expenses".
pub fn monthly_title(month: Month, year: i32) -> String {
    format!("{month} {year} - Monthly Expenses")
}

/// A table with a title row, a header row and one row per transaction.
///
/// The title and header rows are present even when there are no transactions.
pub fn monthly_table(month: Month, year: i32, transactions: &[Transaction]) -> ReportTable {
    let title = monthly_title(month, year);
    let mut title_row = vec![String::new(); HEADER.len()];
    title_row[0] = title.clone();

    let rows = [title_row, header_row()]
        .into_iter()
        .chain(transactions.iter().map(transaction_row))
        .collect();

    ReportTable {
        document_title: title,
        rows,
        column_widths: ColumnWidths::Fixed(MONTHLY_COLUMN_WIDTHS.to_vec()),
        style: monthly_style(),
    }
}
