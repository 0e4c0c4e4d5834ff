//! Shared types for skylog weather observations.
//!
//! This crate provides the data model used by both the observation store
//! (skylog-store) and the statistics engine (skylog-stats).
//!
//! # Features
//!
//! - [`WeatherObservation`], one stored weather sample
//! - [`CurrentWeather`], the API client's current-conditions payload
//! - [`Wind`], the parsed form of the composite wind string
//! - Timestamp and time-of-day helpers
//!
//! # Example
//!
//! ```
//! use skylog_types::{CurrentWeather, parse_timestamp};
//!
//! let current = CurrentWeather {
//!     temp: 18.4,
//!     feels_like: Some(17.9),
//!     weather: "Light Rain".to_string(),
//!     humidity: 81,
//!     pressure: 1004,
//!     visibility: Some(8000.0),
//!     wind: Some("5.10 m/s, 220°".to_string()),
//!     sea_level: Some(1004.0),
//!     grnd_level: Some(998.0),
//!     sunrise: Some("05:12".to_string()),
//!     sunset: Some("21:48".to_string()),
//! };
//!
//! let obs = current.into_observation("Dublin", parse_timestamp("2024-06-01 09:30:00")?);
//! assert_eq!(obs.wind.unwrap().direction_deg, Some(220.0));
//! # Ok::<(), skylog_types::ParseError>(())
//! ```

pub mod error;
pub mod timestamp;
pub mod types;
pub mod wind;

pub use error::{ParseError, ParseResult};
pub use timestamp::{format_timestamp, now_timestamp, parse_daylight_time, parse_timestamp};
pub use types::{CurrentWeather, WeatherObservation};
pub use wind::{NOT_AVAILABLE, Wind};
