//! Wind speed and direction.
//!
//! The weather API client hands wind over as a display string such as
//! `"3.20 m/s, 90°"`. [`Wind`] is the explicit two-field form; the string is
//! parsed once when an observation enters the system.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Placeholder used by the legacy display form for missing values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Wind measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Wind {
    /// Wind speed in m/s.
    pub speed: f64,
    /// Direction in degrees, if the source reported a numeric direction.
    #[cfg_attr(feature = "serde", serde(default))]
    pub direction_deg: Option<f64>,
}

impl Wind {
    /// Create a wind value from its parts.
    pub fn new(speed: f64, direction_deg: Option<f64>) -> Self {
        Self {
            speed,
            direction_deg,
        }
    }

    /// Parse the composite `"<speed> m/s[, <direction>]"` form.
    ///
    /// Returns `None` for `"N/A"` and for anything that does not carry a
    /// finite leading speed followed by `m/s`. A direction that is missing or
    /// not numeric leaves `direction_deg` empty but still yields a value.
    ///
    /// # Examples
    ///
    /// ```
    /// use skylog_types::Wind;
    ///
    /// let wind = Wind::parse("3.20 m/s, 90°").unwrap();
    /// assert_eq!(wind.speed, 3.2);
    /// assert_eq!(wind.direction_deg, Some(90.0));
    ///
    /// assert_eq!(Wind::parse("7 m/s").unwrap().direction_deg, None);
    /// assert!(Wind::parse("N/A").is_none());
    /// ```
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        text.parse().ok()
    }

    /// Direction label in the legacy display form (`"90°"` or `"N/A"`).
    pub fn direction_label(&self) -> String {
        match self.direction_deg {
            Some(deg) => format!("{:.0}°", deg),
            None => NOT_AVAILABLE.to_string(),
        }
    }
}

impl FromStr for Wind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidWind(s.to_string());

        let (head, direction) = match s.split_once(',') {
            Some((head, tail)) => (head, Some(tail)),
            None => (s, None),
        };

        // Speed and unit must be separated by whitespace: "3.2 m/s", not "3.2m/s".
        let speed_text = head.trim().strip_suffix("m/s").ok_or_else(invalid)?;
        if !speed_text.ends_with(char::is_whitespace) {
            return Err(invalid());
        }

        let speed: f64 = speed_text.trim().parse().map_err(|_| invalid())?;
        if !speed.is_finite() {
            return Err(invalid());
        }

        Ok(Self {
            speed,
            direction_deg: direction.and_then(parse_direction),
        })
    }
}

fn parse_direction(text: &str) -> Option<f64> {
    let text = text.trim();
    let text = text.strip_suffix('°').unwrap_or(text).trim_end();
    text.parse::<f64>().ok().filter(|deg| deg.is_finite())
}

impl fmt::Display for Wind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} m/s, {}", self.speed, self.direction_label())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Parsing arbitrary text must never panic.
        #[test]
        fn parse_wind_never_panics(text in ".*") {
            let _ = Wind::parse(&text);
        }

        /// Any parsed speed is finite.
        #[test]
        fn parsed_speed_is_finite(text in "[0-9a-zA-Z., /°-]{0,24}") {
            if let Some(wind) = Wind::parse(&text) {
                prop_assert!(wind.speed.is_finite());
            }
        }

        /// Two-decimal display output parses back to the rounded speed.
        #[test]
        fn display_round_trips_rounded_speed(speed in 0.0f64..100.0, deg in 0u16..360) {
            let wind = Wind::new(speed, Some(f64::from(deg)));
            let parsed = Wind::parse(&wind.to_string()).unwrap();
            prop_assert!((parsed.speed - speed).abs() <= 0.0051);
            prop_assert_eq!(parsed.direction_deg, Some(f64::from(deg)));
        }
    }
}
