//! Core types for weather observations.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

use crate::wind::Wind;

/// One stored weather sample for a city at a point in time.
///
/// Numeric readings are `Option`s: legacy rows may hold NULL or `N/A` in any
/// of them, and aggregates must skip `None` rather than read it as zero.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WeatherObservation {
    /// Local insertion time.
    #[cfg_attr(feature = "serde", serde(with = "crate::timestamp::serde_text"))]
    pub timestamp: PrimitiveDateTime,
    /// City display name, free text.
    pub city: String,
    /// Temperature in degrees Celsius.
    #[cfg_attr(feature = "serde", serde(default))]
    pub temp: Option<f64>,
    /// Apparent temperature in degrees Celsius.
    #[cfg_attr(feature = "serde", serde(default))]
    pub feels_like: Option<f64>,
    /// Short condition description, e.g. "Clear Sky".
    pub weather: String,
    /// Relative humidity percentage.
    #[cfg_attr(feature = "serde", serde(default))]
    pub humidity: Option<u8>,
    /// Atmospheric pressure in hPa.
    #[cfg_attr(feature = "serde", serde(default))]
    pub pressure: Option<u32>,
    /// Visibility in meters.
    #[cfg_attr(feature = "serde", serde(default))]
    pub visibility: Option<f64>,
    /// Wind, if the source string could be parsed.
    #[cfg_attr(feature = "serde", serde(default))]
    pub wind: Option<Wind>,
    /// Sea-level pressure in hPa.
    #[cfg_attr(feature = "serde", serde(default))]
    pub sea_level: Option<f64>,
    /// Ground-level pressure in hPa.
    #[cfg_attr(feature = "serde", serde(default))]
    pub grnd_level: Option<f64>,
    /// Local sunrise time, `HH:MM`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub sunrise: Option<String>,
    /// Local sunset time, `HH:MM`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub sunset: Option<String>,
}

impl WeatherObservation {
    /// Create an observation with the core readings set.
    ///
    /// # Examples
    ///
    /// ```
    /// use skylog_types::WeatherObservation;
    /// use time::macros::datetime;
    ///
    /// let obs = WeatherObservation::new(datetime!(2024-07-18 12:00:00), "Lagos", 31.0, 74, 1009)
    ///     .with_weather("Scattered Clouds")
    ///     .with_wind_text("3.20 m/s, 90°");
    ///
    /// assert_eq!(obs.wind.unwrap().speed, 3.2);
    /// assert!(obs.sea_level.is_none());
    /// ```
    pub fn new(
        timestamp: PrimitiveDateTime,
        city: impl Into<String>,
        temp: f64,
        humidity: u8,
        pressure: u32,
    ) -> Self {
        Self {
            timestamp,
            city: city.into(),
            temp: Some(temp),
            feels_like: None,
            weather: String::new(),
            humidity: Some(humidity),
            pressure: Some(pressure),
            visibility: None,
            wind: None,
            sea_level: None,
            grnd_level: None,
            sunrise: None,
            sunset: None,
        }
    }

    /// Drop the core readings, as a legacy row with NULL numerics reads back.
    pub fn without_readings(mut self) -> Self {
        self.temp = None;
        self.humidity = None;
        self.pressure = None;
        self
    }

    pub fn with_feels_like(mut self, feels_like: f64) -> Self {
        self.feels_like = Some(feels_like);
        self
    }

    pub fn with_weather(mut self, weather: impl Into<String>) -> Self {
        self.weather = weather.into();
        self
    }

    pub fn with_visibility(mut self, meters: f64) -> Self {
        self.visibility = Some(meters);
        self
    }

    pub fn with_wind(mut self, wind: Wind) -> Self {
        self.wind = Some(wind);
        self
    }

    /// Set wind from the legacy composite string.
    ///
    /// Unparseable text (including `"N/A"`) leaves the wind absent.
    pub fn with_wind_text(mut self, text: &str) -> Self {
        self.wind = Wind::parse(text);
        self
    }

    pub fn with_sea_level(mut self, hpa: f64) -> Self {
        self.sea_level = Some(hpa);
        self
    }

    pub fn with_grnd_level(mut self, hpa: f64) -> Self {
        self.grnd_level = Some(hpa);
        self
    }

    pub fn with_sunrise(mut self, sunrise: impl Into<String>) -> Self {
        self.sunrise = Some(sunrise.into());
        self
    }

    pub fn with_sunset(mut self, sunset: impl Into<String>) -> Self {
        self.sunset = Some(sunset.into());
        self
    }
}

/// Current conditions as delivered by the weather API client.
///
/// Wind arrives in its display form (`"3.20 m/s, 90°"`); it is parsed when
/// the payload is turned into a [`WeatherObservation`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurrentWeather {
    /// Temperature in degrees Celsius.
    pub temp: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub feels_like: Option<f64>,
    /// Condition description.
    pub weather: String,
    pub humidity: u8,
    pub pressure: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub visibility: Option<f64>,
    /// Composite wind string.
    #[cfg_attr(feature = "serde", serde(default))]
    pub wind: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sea_level: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub grnd_level: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sunrise: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sunset: Option<String>,
}

impl CurrentWeather {
    /// Turn the payload into an observation for `city` stamped at `timestamp`.
    pub fn into_observation(
        self,
        city: impl Into<String>,
        timestamp: PrimitiveDateTime,
    ) -> WeatherObservation {
        WeatherObservation {
            timestamp,
            city: city.into(),
            temp: Some(self.temp),
            feels_like: self.feels_like,
            weather: self.weather,
            humidity: Some(self.humidity),
            pressure: Some(self.pressure),
            visibility: self.visibility,
            wind: self.wind.as_deref().and_then(Wind::parse),
            sea_level: self.sea_level,
            grnd_level: self.grnd_level,
            sunrise: self.sunrise,
            sunset: self.sunset,
        }
    }
}
