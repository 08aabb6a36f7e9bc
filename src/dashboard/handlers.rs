//! Dashboard HTTP handlers and view rendering.
//!
//! The dashboard lists every transaction with the total expense, a form for
//! adding a transaction and a month filter with export links.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    dashboard::{
        filter::{MONTH_FILTER_SCRIPT, month_filter},
        summary::{ExpenseSummary, summary_cards},
    },
    endpoints,
    html::{HeadElement, PAGE_CONTAINER_STYLE, base, dollar_input_styles, link},
    navigation::NavBar,
    timezone::local_today,
    transaction::{
        FormErrors, SaveOutcome, Transaction, TransactionFormValues, TransactionSubmission,
        get_all_transactions, get_earliest_transaction_date, get_total_expense, save_submission,
        transaction_form, transactions_table,
    },
    upload::UploadStore,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Where receipt images are written to.
    pub upload_store: UploadStore,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            upload_store: state.upload_store.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Holds all the data needed to render the dashboard.
struct DashboardData {
    summary: ExpenseSummary,
    transactions: Vec<Transaction>,
    earliest_date: Option<Date>,
}

fn load_dashboard_data(connection: &Connection) -> Result<DashboardData, Error> {
    let transactions = get_all_transactions(connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;
    let total_expense = get_total_expense(connection)
        .inspect_err(|error| tracing::error!("could not get total expense: {error}"))?;
    let earliest_date = get_earliest_transaction_date(connection)?;

    Ok(DashboardData {
        summary: ExpenseSummary::from_total_expense(total_expense),
        transactions,
        earliest_date,
    })
}

/// Display a page with every transaction, the total expense and a form for
/// adding transactions.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let data = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        load_dashboard_data(&connection)?
    };

    let values = TransactionFormValues::new(today);

    Ok(dashboard_view(&data, today, &values, &FormErrors::default()).into_response())
}

/// Create a transaction from the form on the dashboard.
///
/// Redirects back to the dashboard on success, otherwise the dashboard is
/// shown again with the submitted values and the validation errors.
pub async fn create_transaction_from_dashboard(
    State(state): State<DashboardState>,
    multipart: Multipart,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;
    let submission = TransactionSubmission::from_multipart(multipart).await?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    match save_submission(submission, &connection, &state.upload_store)? {
        SaveOutcome::Saved(transaction) => {
            tracing::info!("Created transaction {}", transaction.id);
            Ok(Redirect::to(endpoints::ROOT).into_response())
        }
        SaveOutcome::Invalid { values, errors } => {
            let data = load_dashboard_data(&connection)?;

            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                dashboard_view(&data, today, &values, &errors),
            )
                .into_response())
        }
    }
}

fn dashboard_view(
    data: &DashboardData,
    today: Date,
    values: &TransactionFormValues,
    errors: &FormErrors,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::ROOT).into_html();
    let form = transaction_form(endpoints::ROOT, values, errors);

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            (summary_cards(&data.summary))

            div class="flex flex-col lg:flex-row gap-8 w-full"
            {
                section class="w-full lg:max-w-sm"
                {
                    h2 class="text-xl font-bold mb-4" { "Add Transaction" }

                    (form)
                }

                section class="w-full"
                {
                    div class="flex justify-between flex-wrap items-end mb-4"
                    {
                        h2 class="text-xl font-bold" { "Transactions" }

                        p { (link(endpoints::EXPORT_TRANSACTIONS_PDF, "Export all (PDF)")) }
                    }

                    (month_filter(today, data.earliest_date))

                    (transactions_table(&data.transactions))
                }
            }
        }
    };

    base(
        "Dashboard",
        &[
            dollar_input_styles(),
            HeadElement::ScriptLink(MONTH_FILTER_SCRIPT.to_owned()),
        ],
        &content,
    )
}
