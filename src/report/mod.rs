//! PDF reports of transactions.
//!
//! A report is a [table::ReportTable] of text cells styled by a list of
//! [style::StyleCommand]s, rendered with the standard Helvetica fonts.

mod export;
mod fonts;
mod pdf;
mod style;
mod table;

pub use export::{export_monthly_pdf, export_transactions_pdf};
