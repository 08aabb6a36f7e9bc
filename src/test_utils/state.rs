use rusqlite::Connection;

use crate::{AppState, UploadStore};

use tempfile::TempDir;

/// An [AppState] backed by an in-memory database with uploads written to
/// `upload_dir`.
pub(crate) fn get_test_app_state(upload_dir: &TempDir) -> AppState {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");

    AppState::new(
        connection,
        "Etc/UTC",
        UploadStore::new(upload_dir.path()),
    )
    .expect("Could not create app state")
}
