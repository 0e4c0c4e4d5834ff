//! Error types for data parsing in skylog-types.

use thiserror::Error;

/// Errors that can occur when parsing observation fields.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// A wind string did not match `"<speed> m/s[, <direction>]"`.
    #[error("Invalid wind value: '{0}'")]
    InvalidWind(String),

    /// A timestamp was not in `YYYY-MM-DD HH:MM:SS` form.
    #[error("Invalid timestamp: '{0}'")]
    InvalidTimestamp(String),

    /// A sunrise/sunset value was not in `HH:MM` form.
    #[error("Invalid time of day: '{0}'")]
    InvalidDaylightTime(String),
}

/// Result type alias using skylog-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
