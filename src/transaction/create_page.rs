//! Defines the route handlers for the page for creating a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{FORM_CONTAINER_STYLE, base, dollar_input_styles},
    navigation::NavBar,
    timezone::local_today,
    transaction::{
        form::{FormErrors, TransactionFormValues, transaction_form},
        submission::{SaveOutcome, TransactionSubmission, save_submission},
    },
    upload::UploadStore,
};

fn create_transaction_view(values: &TransactionFormValues, errors: &FormErrors) -> Markup {
    let nav_bar = NavBar::new(endpoints::ADD_TRANSACTION_VIEW).into_html();
    let form = transaction_form(endpoints::ADD_TRANSACTION_VIEW, values, errors);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold mb-4" { "Add Transaction" }

            (form)
        }
    };

    base("Add Transaction", &[dollar_input_styles()], &content)
}

/// The state needed to show the page for creating a transaction and to store
/// the submitted transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// Where receipt images are written to.
    pub upload_store: UploadStore,
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            upload_store: state.upload_store.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for creating a transaction with the date set to today.
pub async fn get_add_transaction_page(
    State(state): State<CreateTransactionState>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    Ok(
        create_transaction_view(&TransactionFormValues::new(today), &FormErrors::default())
            .into_response(),
    )
}

/// A route handler for creating a new transaction from a multipart form.
///
/// Redirects to the dashboard on success. Invalid forms are shown again with
/// the submitted values and an error message under each invalid field.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    multipart: Multipart,
) -> Result<Response, Error> {
    let submission = TransactionSubmission::from_multipart(multipart).await?;

    let outcome = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        save_submission(submission, &connection, &state.upload_store)?
    };

    match outcome {
        SaveOutcome::Saved(transaction) => {
            tracing::info!("Created transaction {}", transaction.id);
            Ok(Redirect::to(endpoints::ROOT).into_response())
        }
        SaveOutcome::Invalid { values, errors } => {
            tracing::debug!("Rejected invalid transaction form: {errors:?}");
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                create_transaction_view(&values, &errors),
            )
                .into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        extract::{FromRef, State},
        http::StatusCode,
        routing::get,
    };
    use axum_test::{
        TestServer,
        multipart::{MultipartForm, Part},
    };
    use rust_decimal::Decimal;
    use scraper::Html;

    use crate::{
        AppState, endpoints,
        test_utils::{
            PNG_BYTES, assert_content_type, assert_form_field_error, assert_form_input_with_value,
            assert_form_target, assert_status_ok, assert_valid_html, get_test_app_state,
            must_get_form, parse_html_document, temp_dir,
        },
        transaction::get_all_transactions,
        upload::IMAGE_DIRECTORY,
    };

    use super::{CreateTransactionState, create_transaction_endpoint, get_add_transaction_page};

    fn get_test_server(state: AppState) -> TestServer {
        let app = Router::new()
            .route(
                endpoints::ADD_TRANSACTION_VIEW,
                get(get_add_transaction_page).post(create_transaction_endpoint),
            )
            .with_state(state);

        TestServer::new(app).expect("Could not create test server.")
    }

    fn coffee_form() -> MultipartForm {
        MultipartForm::new()
            .add_text("title", "Coffee")
            .add_text("amount", "3.50")
            .add_text("category", "Food")
            .add_text("date", "2024-01-05")
    }

    #[tokio::test]
    async fn page_has_form_posting_to_itself() {
        let dir = temp_dir("add_page");
        let state = get_test_app_state(&dir);

        let response = get_add_transaction_page(State(CreateTransactionState::from_ref(&state)))
            .await
            .unwrap();

        assert_status_ok(&response);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_form_target(&form, endpoints::ADD_TRANSACTION_VIEW);
    }

    #[tokio::test]
    async fn valid_form_creates_transaction_and_redirects() {
        let dir = temp_dir("add_valid");
        let state = get_test_app_state(&dir);
        let server = get_test_server(state.clone());

        let response = server
            .post(endpoints::ADD_TRANSACTION_VIEW)
            .multipart(coffee_form())
            .await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::ROOT);
        let transactions = get_all_transactions(&state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].title, "Coffee");
        assert_eq!(transactions[0].amount, Decimal::new(350, 2));
        assert_eq!(transactions[0].image, None);
    }

    #[tokio::test]
    async fn valid_form_with_image_stores_receipt() {
        let dir = temp_dir("add_with_image");
        let state = get_test_app_state(&dir);
        let server = get_test_server(state.clone());

        let form = coffee_form().add_part(
            "image",
            Part::bytes(PNG_BYTES)
                .file_name("receipt.png")
                .mime_type("image/png"),
        );
        let response = server
            .post(endpoints::ADD_TRANSACTION_VIEW)
            .multipart(form)
            .await;

        response.assert_status_see_other();
        let transactions = get_all_transactions(&state.db_connection.lock().unwrap()).unwrap();
        let image = transactions[0].image.clone().expect("want stored image");
        assert_eq!(image, format!("{IMAGE_DIRECTORY}/receipt.png"));
        assert_eq!(std::fs::read(dir.path().join(image)).unwrap(), PNG_BYTES);
    }

    #[tokio::test]
    async fn invalid_form_is_shown_again_with_errors() {
        let dir = temp_dir("add_invalid");
        let state = get_test_app_state(&dir);
        let server = get_test_server(state.clone());

        let form = MultipartForm::new()
            .add_text("title", "Coffee")
            .add_text("amount", "abc")
            .add_text("category", "Food")
            .add_text("date", "2024-01-05");
        let response = server
            .post(endpoints::ADD_TRANSACTION_VIEW)
            .multipart(form)
            .await;

        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = Html::parse_document(&response.text());
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_form_input_with_value(&form, "title", "text", "Coffee");
        assert_form_field_error(&form, "amount", "Enter a number.");
        let transactions = get_all_transactions(&state.db_connection.lock().unwrap()).unwrap();
        assert!(transactions.is_empty());
    }

    #[tokio::test]
    async fn non_image_upload_is_rejected() {
        let dir = temp_dir("add_not_image");
        let state = get_test_app_state(&dir);
        let server = get_test_server(state.clone());

        let form = coffee_form().add_part(
            "image",
            Part::text("just some notes")
                .file_name("notes.txt")
                .mime_type("text/plain"),
        );
        let response = server
            .post(endpoints::ADD_TRANSACTION_VIEW)
            .multipart(form)
            .await;

        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = Html::parse_document(&response.text());
        assert_form_field_error(
            &must_get_form(&html),
            "image",
            "Upload a valid image. The file you uploaded was either not an image or a corrupted image.",
        );
        assert!(!dir.path().join(IMAGE_DIRECTORY).exists());
    }

    #[tokio::test]
    async fn html_labelled_as_png_is_rejected() {
        let dir = temp_dir("add_html_as_png");
        let state = get_test_app_state(&dir);
        let server = get_test_server(state.clone());

        let form = coffee_form().add_part(
            "image",
            Part::bytes(b"<script>alert(1)</script>".as_slice())
                .file_name("evil.html")
                .mime_type("image/png"),
        );
        let response = server
            .post(endpoints::ADD_TRANSACTION_VIEW)
            .multipart(form)
            .await;

        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = Html::parse_document(&response.text());
        assert_form_field_error(
            &must_get_form(&html),
            "image",
            "Upload a valid image. The file you uploaded was either not an image or a corrupted image.",
        );
        let transactions = get_all_transactions(&state.db_connection.lock().unwrap()).unwrap();
        assert!(transactions.is_empty());
        assert!(!dir.path().join(IMAGE_DIRECTORY).exists());
    }
}
