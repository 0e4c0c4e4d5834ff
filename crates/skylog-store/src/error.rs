//! Error types for skylog-store.

use std::path::PathBuf;

/// Result type for skylog-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in skylog-store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database error from SQLite.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Failed to create database directory.
    #[error("Failed to create database directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A stored or imported field could not be parsed.
    #[error("Invalid field: {0}")]
    Parse(#[from] skylog_types::ParseError),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV reading or writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
