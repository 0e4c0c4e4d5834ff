//! Aggregate statistics for recorded weather observations.
//!
//! The engine rescans its [`ObservationSource`] on every request and derives a
//! fresh [`AggregateStats`]: temperature, humidity, wind and pressure extremes
//! with the city and time they were seen, averages, the most frequently
//! recorded city, daylight extremes and condition counts.
//!
//! # Example
//!
//! ```
//! use skylog_stats::collect;
//! use skylog_store::Store;
//! use skylog_types::WeatherObservation;
//! use time::macros::datetime;
//!
//! let store = Store::open_in_memory()?;
//! let lagos = WeatherObservation::new(datetime!(2024-07-18 12:00:00), "Lagos", 31.0, 74, 1009);
//! store.insert(&lagos)?;
//!
//! let stats = collect(&store)?;
//! assert_eq!(stats.count, 1);
//! assert_eq!(stats.avg_temp, Some(31.0));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod aggregate;
mod error;
mod source;

pub use aggregate::{
    AggregateStats, CityCount, ConditionCount, DaylightExtreme, Extreme, WindExtreme, aggregate,
};
pub use error::{Result, StatsError};
pub use source::ObservationSource;

use tracing::{debug, warn};

/// Scan `source` and aggregate everything it holds.
///
/// A failed scan is returned as an error; no partial statistics are produced.
pub fn collect<S>(source: &S) -> Result<AggregateStats>
where
    S: ObservationSource + ?Sized,
{
    let observations = source.scan_all().map_err(Into::into)?;
    debug!("Aggregating {} observations", observations.len());
    Ok(aggregate(&observations))
}

/// Like [`collect`], but a failed scan yields [`AggregateStats::empty`].
pub fn collect_or_empty<S>(source: &S) -> AggregateStats
where
    S: ObservationSource + ?Sized,
{
    match collect(source) {
        Ok(stats) => stats,
        Err(e) => {
            warn!("Statistics unavailable: {}", e);
            AggregateStats::empty()
        }
    }
}
