//! Persistence gateway.
//!
//! Opens a fresh [`Database`] handle per logical operation on tokio's
//! blocking pool and drops it when the operation finishes. Handlers never
//! share a connection.

use std::path::PathBuf;
use std::sync::Arc;

use ideaboard_store::Database;

use crate::error::ServerError;

#[derive(Clone)]
pub struct Gateway {
    path: Arc<PathBuf>,
}

impl Gateway {
    /// Open the database once so migrations run before the first request.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ServerError> {
        let path = path.into();
        Database::open_at(&path)?;
        tracing::info!(path = %path.display(), "database ready");
        Ok(Self {
            path: Arc::new(path),
        })
    }

    /// Run `op` against a new handle on the blocking pool.
    pub async fn run<T, F>(&self, op: F) -> Result<T, ServerError>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> Result<T, ServerError> + Send + 'static,
    {
        let path = Arc::clone(&self.path);
        tokio::task::spawn_blocking(move || {
            let db = Database::open_at(&path)?;
            op(&db)
        })
        .await
        .map_err(|e| ServerError::Internal(format!("database task failed: {e}")))?
    }
}
