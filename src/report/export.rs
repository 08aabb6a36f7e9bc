//! Route handlers that download transactions as PDF reports.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::response::Attachment;
use rusqlite::Connection;
use time::Month;

use crate::{
    AppState, Error,
    report::{
        pdf::render_table_pdf,
        table::{ReportTable, all_transactions_table, monthly_table},
    },
    transaction::{get_all_transactions, get_transactions_in_month},
};

const PDF_CONTENT_TYPE: &str = "application/pdf";

/// The state needed to export transactions.
#[derive(Debug, Clone)]
pub struct ExportState {
    /// The database connection for reading transactions.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn pdf_attachment(table: &ReportTable, file_name: String) -> Response {
    Attachment::new(render_table_pdf(table))
        .filename(file_name)
        .content_type(PDF_CONTENT_TYPE)
        .into_response()
}

/// A route handler that downloads every transaction, newest first, as "transactions.pdf".
pub async fn export_transactions_pdf(State(state): State<ExportState>) -> Result<Response, Error> {
    let transactions = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_all_transactions(&connection)
            .inspect_err(|error| tracing::error!("Could not get transactions: {error}"))?
    };

    tracing::info!("Exporting {} transactions", transactions.len());

    Ok(pdf_attachment(
        &all_transactions_table(&transactions),
        "transactions.pdf".to_owned(),
    ))
}

/// A route handler that downloads the transactions dated within `month` of `year`.
///
/// # Errors
/// Returns [Error::InvalidMonth] if `month` is not from 1 to 12.
pub async fn export_monthly_pdf(
    State(state): State<ExportState>,
    Path((month_number, year)): Path<(u8, i32)>,
) -> Result<Response, Error> {
    let month = Month::try_from(month_number).map_err(|_| Error::InvalidMonth(month_number))?;

    let transactions = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_transactions_in_month(month, year, &connection).inspect_err(|error| {
            tracing::error!("Could not get transactions for {month} {year}: {error}")
        })?
    };

    tracing::info!(
        "Exporting {} transactions for {month} {year}",
        transactions.len()
    );

    Ok(pdf_attachment(
        &monthly_table(month, year, &transactions),
        format!("monthly_expenses_{month_number}_{year}.pdf"),
    ))
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, routing::get};
    use axum_test::TestServer;
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        AppState,
        endpoints::{self, format_monthly_pdf_endpoint},
        test_utils::{get_test_app_state, temp_dir},
        transaction::{Transaction, create_transaction},
    };

    use super::{export_monthly_pdf, export_transactions_pdf};

    fn get_test_server(state: AppState) -> TestServer {
        let app = Router::new()
            .route(endpoints::EXPORT_TRANSACTIONS_PDF, get(export_transactions_pdf))
            .route(endpoints::EXPORT_MONTHLY_PDF, get(export_monthly_pdf))
            .with_state(state);

        TestServer::new(app).expect("Could not create test server.")
    }

    fn add_coffee(state: &AppState) {
        create_transaction(
            Transaction::build("Coffee", Decimal::new(350, 2), "Food", date!(2024 - 01 - 05)),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack
            .windows(needle.len())
            .any(|window| window == needle)
    }

    #[tokio::test]
    async fn exports_all_transactions_as_attachment() {
        let dir = temp_dir("export_all");
        let state = get_test_app_state(&dir);
        add_coffee(&state);
        let server = get_test_server(state);

        let response = server.get(endpoints::EXPORT_TRANSACTIONS_PDF).await;

        response.assert_status_ok();
        assert_eq!(response.header("content-type"), "application/pdf");
        assert_eq!(
            response.header("content-disposition"),
            "attachment; filename=\"transactions.pdf\""
        );
        let body = response.as_bytes();
        assert!(body.starts_with(b"%PDF-"));
        assert!(contains(body, b"(Coffee)"));
    }

    #[tokio::test]
    async fn exports_header_only_when_empty() {
        let dir = temp_dir("export_empty");
        let server = get_test_server(get_test_app_state(&dir));

        let response = server.get(endpoints::EXPORT_TRANSACTIONS_PDF).await;

        response.assert_status_ok();
        assert!(contains(response.as_bytes(), b"(Title)"));
    }

    #[tokio::test]
    async fn monthly_export_only_includes_that_month() {
        let dir = temp_dir("export_monthly");
        let state = get_test_app_state(&dir);
        add_coffee(&state);
        let server = get_test_server(state);

        let january = server.get(&format_monthly_pdf_endpoint(1, 2024)).await;
        let february = server.get(&format_monthly_pdf_endpoint(2, 2024)).await;

        january.assert_status_ok();
        assert_eq!(
            january.header("content-disposition"),
            "attachment; filename=\"monthly_expenses_1_2024.pdf\""
        );
        assert!(contains(january.as_bytes(), b"(Coffee)"));
        assert!(contains(
            january.as_bytes(),
            b"(January 2024 - Monthly Expenses)"
        ));

        february.assert_status_ok();
        assert!(!contains(february.as_bytes(), b"(Coffee)"));
        assert!(contains(
            february.as_bytes(),
            b"(February 2024 - Monthly Expenses)"
        ));
    }

    #[tokio::test]
    async fn invalid_month_is_a_bad_request() {
        let dir = temp_dir("export_bad_month");
        let server = get_test_server(get_test_app_state(&dir));

        let response = server.get(&format_monthly_pdf_endpoint(13, 2024)).await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
