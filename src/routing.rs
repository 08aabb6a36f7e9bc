//! Application router configuration.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::get,
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    dashboard::{create_transaction_from_dashboard, get_dashboard_page},
    endpoints,
    not_found::get_404_not_found,
    report::{export_monthly_pdf, export_transactions_pdf},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_add_transaction_page,
        get_transactions_page,
    },
};

/// The largest request body accepted, enough for a photo of a receipt.
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let upload_root = state.upload_store.root().to_path_buf();

    Router::new()
        .route(
            endpoints::ROOT,
            get(get_dashboard_page).post(create_transaction_from_dashboard),
        )
        .route(
            endpoints::ADD_TRANSACTION_VIEW,
            get(get_add_transaction_page).post(create_transaction_endpoint),
        )
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(
            endpoints::DELETE_TRANSACTION,
            get(delete_transaction_endpoint).post(delete_transaction_endpoint),
        )
        .route(
            endpoints::EXPORT_TRANSACTIONS_PDF,
            get(export_transactions_pdf),
        )
        .route(endpoints::EXPORT_MONTHLY_PDF, get(export_monthly_pdf))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE))
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .nest_service(endpoints::MEDIA, ServeDir::new(upload_root))
        .fallback(get_404_not_found)
        .with_state(state)
}
