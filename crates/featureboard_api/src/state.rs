//! Shared handler state: one SQLite connection behind a mutex.

use crate::error::{ApiError, Operation};
use featureboard_core::db::{open_db, open_db_in_memory, DbResult};
use featureboard_core::{FeatureService, FeatureServiceResult, SqliteFeatureRepository};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Axum state. Cloning shares the same connection.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Wraps an already-migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }

    /// Opens (and migrates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    /// Opens a private in-memory database.
    pub fn in_memory() -> DbResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    /// Runs one service call on the blocking pool.
    ///
    /// The connection lock is held for the whole call, so calls are
    /// serialized. Lock poisoning and join failures become 500s.
    pub async fn run<T, F>(&self, operation: Operation, f: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&FeatureService<SqliteFeatureRepository<'_>>) -> FeatureServiceResult<T>
            + Send
            + 'static,
    {
        let db = Arc::clone(&self.db);
        let joined = tokio::task::spawn_blocking(move || {
            let conn = db
                .lock()
                .map_err(|_| ApiError::internal(operation, "database mutex poisoned"))?;
            let repo = SqliteFeatureRepository::try_new(&conn)
                .map_err(|err| ApiError::internal(operation, err.to_string()))?;
            let service = FeatureService::new(repo);
            f(&service).map_err(|err| ApiError::from_service(operation, err))
        })
        .await;

        match joined {
            Ok(result) => result,
            Err(err) => Err(ApiError::internal(operation, err.to_string())),
        }
    }
}
