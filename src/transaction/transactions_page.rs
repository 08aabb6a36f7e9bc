//! Defines the route handler for the page that lists every transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error, endpoints,
    html::{PAGE_CONTAINER_STYLE, base, link},
    month_options::{MonthOption, MonthOptionPolicy, month_options},
    navigation::NavBar,
    timezone::local_today,
    transaction::{Transaction, get_all_transactions, table::transactions_table},
};

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsViewState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page listing every transaction, newest first.
pub async fn get_transactions_page(
    State(state): State<TransactionsViewState>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let transactions = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_all_transactions(&connection)
            .inspect_err(|error| tracing::error!("Could not get transactions: {error}"))?
    };

    Ok(transactions_view(&transactions, today).into_response())
}

fn report_links(today: Date) -> Markup {
    let options = month_options(today, MonthOptionPolicy::YearBounded);

    html! {
        section class="w-full mt-8"
        {
            h3 class="text-lg font-semibold mb-2" { "Monthly Reports" }

            ul id="monthly-reports" class="grid grid-cols-2 md:grid-cols-4 gap-2"
            {
                @for option in &options {
                    (report_link(option))
                }
            }
        }
    }
}

fn report_link(option: &MonthOption) -> Markup {
    html! {
        li { (link(&option.export_url(), &option.label())) }
    }
}

fn transactions_view(transactions: &[Transaction], today: Date) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="flex justify-between flex-wrap items-end w-full mb-4"
            {
                h2 class="text-xl font-bold" { "Transactions" }

                p class="space-x-4"
                {
                    (link(endpoints::ADD_TRANSACTION_VIEW, "Add Transaction"))
                    (link(endpoints::EXPORT_TRANSACTIONS_PDF, "Export all (PDF)"))
                }
            }

            (transactions_table(transactions))

            (report_links(today))
        }
    };

    base("Transactions", &[], &content)
}
