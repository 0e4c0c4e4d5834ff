//! Observation timestamps and time-of-day helpers.
//!
//! Observations are stamped with local wall-clock time in the textual form
//! `YYYY-MM-DD HH:MM:SS`. That form sorts lexicographically in chronological
//! order, which the store relies on for recency queries.

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, Time};

use crate::error::{ParseError, ParseResult};

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Format a timestamp as `YYYY-MM-DD HH:MM:SS`.
pub fn format_timestamp(ts: &PrimitiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| ts.to_string())
}

/// Parse a `YYYY-MM-DD HH:MM:SS` timestamp.
///
/// # Examples
///
/// ```
/// use skylog_types::parse_timestamp;
///
/// let ts = parse_timestamp("2024-07-18 14:05:09").unwrap();
/// assert_eq!(ts.hour(), 14);
/// assert!(parse_timestamp("2024-07-18T14:05:09Z").is_err());
/// ```
pub fn parse_timestamp(text: &str) -> ParseResult<PrimitiveDateTime> {
    PrimitiveDateTime::parse(text.trim(), TIMESTAMP_FORMAT)
        .map_err(|_| ParseError::InvalidTimestamp(text.to_string()))
}

/// Current local time truncated to whole seconds.
///
/// Falls back to UTC when the local offset cannot be determined (for example
/// in a multi-threaded process on some Unix platforms).
pub fn now_timestamp() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    let time = now.time();
    let whole = Time::from_hms(time.hour(), time.minute(), time.second()).unwrap_or(time);
    PrimitiveDateTime::new(now.date(), whole)
}

/// Parse a sunrise/sunset value (`HH:MM`, leading zero optional).
pub fn parse_daylight_time(text: &str) -> ParseResult<Time> {
    let invalid = || ParseError::InvalidDaylightTime(text.to_string());

    let (hour, minute) = text.trim().split_once(':').ok_or_else(invalid)?;
    if minute.len() != 2 || hour.is_empty() || hour.len() > 2 {
        return Err(invalid());
    }
    let hour: u8 = hour.parse().map_err(|_| invalid())?;
    let minute: u8 = minute.parse().map_err(|_| invalid())?;

    Time::from_hms(hour, minute, 0).map_err(|_| invalid())
}

/// Serde adapter for the textual timestamp form.
#[cfg(feature = "serde")]
pub mod serde_text {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::PrimitiveDateTime;

    pub fn serialize<S: Serializer>(
        ts: &PrimitiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<PrimitiveDateTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::parse_timestamp(&text).map_err(serde::de::Error::custom)
    }
}
