//! Local persistence for weather observations.
//!
//! This crate provides SQLite-based storage for the observation log that the
//! statistics engine reads from.
//!
//! # Features
//!
//! - Append observations with their local insertion time
//! - Scan the full log in insertion order, or page through recent history
//! - Query by city and time range
//! - CSV and JSON export/import with duplicate detection
//! - Opens databases written by earlier releases and migrates them in place
//!
//! # Example
//!
//! ```no_run
//! use skylog_store::{ObservationQuery, Store};
//!
//! let store = Store::open_default()?;
//!
//! let query = ObservationQuery::new().city("Lagos").limit(10);
//! for obs in store.query(&query)? {
//!     if let Some(temp) = obs.temp {
//!         println!("{} {:.1}°C", obs.city, temp);
//!     }
//! }
//! # Ok::<(), skylog_store::Error>(())
//! ```

mod error;
mod models;
mod queries;
mod schema;
mod store;

pub use error::{Error, Result};
pub use models::{CsvRecord, ImportResult};
pub use queries::ObservationQuery;
pub use schema::SCHEMA_VERSION;
pub use store::Store;

/// Default database path following platform conventions.
///
/// - Linux: `~/.local/share/skylog/observations.db`
/// - macOS: `~/Library/Application Support/skylog/observations.db`
/// - Windows: `C:\Users\<user>\AppData\Local\skylog\observations.db`
pub fn default_db_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("skylog")
        .join("observations.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_db_path() {
        let path = default_db_path();
        assert!(path.ends_with("skylog/observations.db"));
    }
}
