//! The endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/delete/{transaction_id}/', use [format_endpoint].

/// The dashboard, which lists transactions and accepts new ones.
pub const ROOT: &str = "/";
/// The page for creating a new transaction.
pub const ADD_TRANSACTION_VIEW: &str = "/add/";
/// The page listing every transaction.
pub const TRANSACTIONS_VIEW: &str = "/transactions/";
/// The route for deleting a transaction.
pub const DELETE_TRANSACTION: &str = "/delete/{transaction_id}/";
/// The route for downloading every transaction as a PDF.
pub const EXPORT_TRANSACTIONS_PDF: &str = "/export-transactions-pdf/";
/// The route for downloading the transactions of one month as a PDF.
pub const EXPORT_MONTHLY_PDF: &str = "/export-monthly-pdf/{month}/{year}/";
/// The route for static files.
pub const STATIC: &str = "/static";
/// The route for uploaded files.
pub const MEDIA: &str = "/media";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/delete/{transaction_id}/', '{transaction_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

/// The URL for downloading the monthly report for `month` (1 to 12) of `year`.
pub fn format_monthly_pdf_endpoint(month: u8, year: i32) -> String {
    EXPORT_MONTHLY_PDF
        .replace("{month}", &month.to_string())
        .replace("{year}", &year.to_string())
}

/// The URL an upload stored at `relative_path` is served from.
pub fn format_media_url(relative_path: &str) -> String {
    format!("{MEDIA}/{relative_path}")
}
