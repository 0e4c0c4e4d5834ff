//! Where observations come from.

use std::convert::Infallible;

use skylog_store::Store;
use skylog_types::WeatherObservation;

use crate::error::StatsError;

/// A readable collection of observations.
///
/// The engine only needs a full scan; ordering of the returned records is the
/// scan order used for tie-breaks.
///
/// # Example
///
/// ```
/// use skylog_stats::{ObservationSource, collect};
/// use skylog_types::WeatherObservation;
/// use time::macros::datetime;
///
/// let observations = vec![
///     WeatherObservation::new(datetime!(2024-07-18 12:00:00), "Lagos", 31.0, 74, 1009),
/// ];
///
/// let stats = collect(observations.as_slice())?;
/// assert_eq!(stats.count, 1);
/// # Ok::<(), skylog_stats::StatsError>(())
/// ```
pub trait ObservationSource {
    /// Failure reading the source.
    type Error: Into<StatsError>;

    /// Every observation, in scan order.
    fn scan_all(&self) -> Result<Vec<WeatherObservation>, Self::Error>;
}

impl ObservationSource for Store {
    type Error = skylog_store::Error;

    fn scan_all(&self) -> Result<Vec<WeatherObservation>, Self::Error> {
        Store::scan_all(self)
    }
}

impl ObservationSource for [WeatherObservation] {
    type Error = Infallible;

    fn scan_all(&self) -> Result<Vec<WeatherObservation>, Self::Error> {
        Ok(self.to_vec())
    }
}
