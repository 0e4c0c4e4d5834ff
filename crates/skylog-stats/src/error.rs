//! Error types for skylog-stats.

use std::convert::Infallible;

/// Result type for skylog-stats operations.
pub type Result<T> = std::result::Result<T, StatsError>;

/// Errors that stop a statistics pass.
///
/// Missing or malformed fields on individual observations never end up here;
/// they only make the affected figure unavailable.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StatsError {
    /// The observation store could not be scanned.
    #[error("Failed to read observations: {0}")]
    Store(#[from] skylog_store::Error),
}

impl From<Infallible> for StatsError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}
