//! The action that deletes a transaction along with its receipt image.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::Redirect,
};
use rusqlite::Connection;

use crate::{
    AppState, Error, database_id::TransactionId, endpoints, transaction::delete_transaction,
    upload::UploadStore,
};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// Where the receipt images of transactions are stored.
    upload_store: UploadStore,
    /// The database connection for managing transactions.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            upload_store: state.upload_store.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a transaction, redirects to the dashboard.
///
/// Deleting a transaction that does not exist does nothing. The receipt image
/// of the deleted transaction is removed on a best effort basis.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Redirect, Error> {
    let deleted = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        delete_transaction(transaction_id, &connection).inspect_err(|error| {
            tracing::error!("Could not delete transaction {transaction_id}: {error}")
        })?
    };

    match deleted {
        Some(transaction) => {
            tracing::info!("Deleted transaction {transaction_id}");

            if let Some(image) = transaction.image
                && let Err(error) = state.upload_store.remove(&image)
            {
                tracing::warn!("Could not remove receipt {image} of transaction {transaction_id}: {error}");
            }
        }
        None => tracing::debug!("Transaction {transaction_id} was already deleted"),
    }

    Ok(Redirect::to(endpoints::ROOT))
}
