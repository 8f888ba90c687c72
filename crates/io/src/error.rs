use thiserror::Error;

/// Failure inside a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Writing would exceed the backend's capacity.
    #[error("storage quota exceeded: {used} of {quota} bytes in use, {requested} more requested")]
    QuotaExceeded { quota: usize, used: usize, requested: usize },

    /// The backend refuses the operation (read-only, locked, permissions).
    #[error("storage access denied: {0}")]
    AccessDenied(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
