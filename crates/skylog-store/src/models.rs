//! Flat record models for import and export.

use std::fmt::Display;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use skylog_types::{
    NOT_AVAILABLE, ParseResult, WeatherObservation, Wind, format_timestamp, parse_timestamp,
};

/// One observation in the flat CSV layout.
///
/// Column names and order match the `weather` table, so spreadsheets exported
/// by earlier releases import unchanged. Missing numeric cells may be empty or
/// `N/A`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvRecord {
    pub timestamp: String,
    pub city: String,
    #[serde(default, deserialize_with = "reading")]
    pub temp: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub feels_like: Option<f64>,
    #[serde(default)]
    pub weather: String,
    #[serde(default, deserialize_with = "reading")]
    pub humidity: Option<u8>,
    #[serde(default, deserialize_with = "reading")]
    pub pressure: Option<u32>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub visibility: Option<f64>,
    #[serde(default)]
    pub wind: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub sea_level: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub grnd_level: Option<f64>,
    #[serde(default)]
    pub sunrise: Option<String>,
    #[serde(default)]
    pub sunset: Option<String>,
}

impl CsvRecord {
    /// Flatten an observation for CSV output.
    pub fn from_observation(obs: &WeatherObservation) -> Self {
        Self {
            timestamp: format_timestamp(&obs.timestamp),
            city: obs.city.clone(),
            temp: obs.temp,
            feels_like: obs.feels_like,
            weather: obs.weather.clone(),
            humidity: obs.humidity,
            pressure: obs.pressure,
            visibility: obs.visibility,
            wind: obs
                .wind
                .map(|w| w.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            sea_level: obs.sea_level,
            grnd_level: obs.grnd_level,
            sunrise: obs.sunrise.clone(),
            sunset: obs.sunset.clone(),
        }
    }

    /// Convert back to an observation, parsing the composite wind once.
    pub fn into_observation(self) -> ParseResult<WeatherObservation> {
        Ok(WeatherObservation {
            timestamp: parse_timestamp(&self.timestamp)?,
            city: self.city,
            temp: self.temp,
            feels_like: self.feels_like,
            weather: self.weather,
            humidity: self.humidity,
            pressure: self.pressure,
            visibility: self.visibility,
            wind: Wind::parse(&self.wind),
            sea_level: self.sea_level,
            grnd_level: self.grnd_level,
            sunrise: present_text(self.sunrise),
            sunset: present_text(self.sunset),
        })
    }
}

/// A core reading: empty and `N/A` are absent, other text must parse.
fn reading<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match present_text(Option::<String>::deserialize(deserializer)?) {
        None => Ok(None),
        Some(text) => text
            .parse()
            .map(Some)
            .map_err(|e| D::Error::custom(format!("invalid reading '{}': {}", text, e))),
    }
}

/// Treat empty and `N/A` text as absent.
pub(crate) fn present_text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && s != NOT_AVAILABLE)
}

/// Outcome of an import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportResult {
    /// Records read from the input.
    pub total: usize,
    /// Records inserted.
    pub imported: usize,
    /// Records skipped because the same city and timestamp already exist.
    pub skipped: usize,
    /// Per-record problems; the affected records were not imported.
    pub errors: Vec<String>,
}
