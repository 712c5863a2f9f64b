//! Error types for shellguard-storage.

use thiserror::Error;

/// Storage error types.
///
/// Callers on the execution path are expected to log these and keep going;
/// an audit-write failure must never block the user-facing flow.
#[derive(Debug, Error)]
pub enum StorageError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// JSON serialization error during export.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Home directory not found.
    #[error("Could not determine home/data directory")]
    HomeDirNotFound,
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
