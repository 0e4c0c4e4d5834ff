//! Aggregate statistics over a set of observations.
//!
//! Every derived figure is an `Option`: `None` means no observation was
//! eligible for it. Optional inputs that are absent, and wind values that
//! could not be parsed, are skipped rather than counted as zero.
//!
//! Extremes keep the first record in scan order when several share the best
//! value, since every comparison is strict.

use std::collections::HashMap;

use serde::Serialize;
use time::{PrimitiveDateTime, Time};

use skylog_types::{WeatherObservation, parse_daylight_time};

/// An extreme value and the observation it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extreme<T> {
    pub value: T,
    pub city: String,
    #[serde(with = "skylog_types::timestamp::serde_text")]
    pub timestamp: PrimitiveDateTime,
}

/// The strongest wind seen, with its direction when one was recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindExtreme {
    /// Speed in m/s.
    pub speed: f64,
    /// Direction in degrees; `None` when not recorded.
    pub direction_deg: Option<f64>,
    pub city: String,
    #[serde(with = "skylog_types::timestamp::serde_text")]
    pub timestamp: PrimitiveDateTime,
}

/// The earliest sunrise or latest sunset, as recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaylightExtreme {
    /// The stored `HH:MM` text.
    pub time: String,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityCount {
    pub city: String,
    pub count: usize,
}

/// How often a weather description occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionCount {
    /// Lower-cased description, e.g. `"clear sky"`.
    pub condition: String,
    pub count: usize,
}

/// Summary of every observation in a source.
///
/// Built fresh by [`aggregate`] on every call; nothing is cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateStats {
    /// Number of observations, including ones with missing optional fields.
    pub count: usize,
    /// Highest temperature in °C.
    pub hottest: Option<Extreme<f64>>,
    /// Lowest temperature in °C.
    pub coldest: Option<Extreme<f64>>,
    /// Highest relative humidity.
    pub most_humid: Option<Extreme<u8>>,
    pub strongest_wind: Option<WindExtreme>,
    /// Mean temperature in °C, rounded to 2 decimals.
    pub avg_temp: Option<f64>,
    /// Mean humidity, truncated.
    pub avg_humidity: Option<u8>,
    /// Mean pressure in hPa, truncated.
    pub avg_pressure: Option<u32>,
    /// Mean wind speed in m/s over parsed winds, rounded to 2 decimals.
    pub avg_wind_speed: Option<f64>,
    pub most_frequent_city: Option<CityCount>,
    /// Mean sea-level pressure in hPa, rounded to 2 decimals.
    pub avg_sea_level: Option<f64>,
    pub highest_sea_level: Option<Extreme<f64>>,
    /// Mean ground-level pressure in hPa, rounded to 2 decimals.
    pub avg_ground_level: Option<f64>,
    pub lowest_ground_level: Option<Extreme<f64>>,
    pub earliest_sunrise: Option<DaylightExtreme>,
    pub latest_sunset: Option<DaylightExtreme>,
    /// Weather descriptions by frequency, most common first.
    pub conditions: Vec<ConditionCount>,
}

impl AggregateStats {
    /// Statistics with no data: count 0 and every figure unavailable.
    pub fn empty() -> Self {
        Self {
            count: 0,
            hottest: None,
            coldest: None,
            most_humid: None,
            strongest_wind: None,
            avg_temp: None,
            avg_humidity: None,
            avg_pressure: None,
            avg_wind_speed: None,
            most_frequent_city: None,
            avg_sea_level: None,
            highest_sea_level: None,
            avg_ground_level: None,
            lowest_ground_level: None,
            earliest_sunrise: None,
            latest_sunset: None,
            conditions: Vec::new(),
        }
    }

    /// Whether no observations were aggregated.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl Default for AggregateStats {
    fn default() -> Self {
        Self::empty()
    }
}

/// Running arithmetic mean.
#[derive(Default)]
struct Mean {
    sum: f64,
    n: usize,
}

impl Mean {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.n += 1;
    }

    fn value(&self) -> Option<f64> {
        (self.n > 0).then(|| self.sum / self.n as f64)
    }
}

/// Keeps the first candidate and replaces it only when `better` says so.
struct Best<K, T> {
    key: Option<K>,
    item: Option<T>,
}

impl<K: Copy, T> Best<K, T> {
    fn new() -> Self {
        Self {
            key: None,
            item: None,
        }
    }

    fn offer(&mut self, key: K, better: impl Fn(K, K) -> bool, item: impl FnOnce() -> T) {
        let replace = match self.key {
            None => true,
            Some(current) => better(key, current),
        };
        if replace {
            self.key = Some(key);
            self.item = Some(item());
        }
    }

    fn into_item(self) -> Option<T> {
        self.item
    }
}

fn greater<K: PartialOrd>(candidate: K, current: K) -> bool {
    candidate > current
}

fn less<K: PartialOrd>(candidate: K, current: K) -> bool {
    candidate < current
}

fn extreme<T>(value: T, obs: &WeatherObservation) -> Extreme<T> {
    Extreme {
        value,
        city: obs.city.clone(),
        timestamp: obs.timestamp,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute statistics over `observations`, taken in the given order.
///
/// This is a pure function: the same input always yields an identical result.
///
/// # Example
///
/// ```
/// use skylog_stats::aggregate;
/// use skylog_types::WeatherObservation;
/// use time::macros::datetime;
///
/// let observations = vec![
///     WeatherObservation::new(datetime!(2024-07-18 12:00:00), "Lagos", 31.0, 74, 1009)
///         .with_wind_text("3.20 m/s, 90°"),
///     WeatherObservation::new(datetime!(2024-07-18 12:05:00), "Oslo", -4.5, 80, 1021)
///         .with_wind_text("N/A"),
/// ];
///
/// let stats = aggregate(&observations);
/// assert_eq!(stats.hottest.unwrap().city, "Lagos");
/// assert_eq!(stats.avg_temp, Some(13.25));
/// assert_eq!(stats.strongest_wind.unwrap().direction_deg, Some(90.0));
/// ```
pub fn aggregate(observations: &[WeatherObservation]) -> AggregateStats {
    let mut hottest = Best::new();
    let mut coldest = Best::new();
    let mut most_humid = Best::new();
    let mut strongest_wind = Best::new();
    let mut highest_sea_level = Best::new();
    let mut lowest_ground_level = Best::new();
    let mut earliest_sunrise = Best::<Time, _>::new();
    let mut latest_sunset = Best::<Time, _>::new();

    let mut temp = Mean::default();
    let mut humidity = Mean::default();
    let mut pressure = Mean::default();
    let mut wind_speed = Mean::default();
    let mut sea_level = Mean::default();
    let mut ground_level = Mean::default();

    let mut city_counts: HashMap<&str, usize> = HashMap::new();
    let mut most_frequent: Option<(&str, usize)> = None;

    let mut condition_index: HashMap<String, usize> = HashMap::new();
    let mut conditions: Vec<ConditionCount> = Vec::new();

    for obs in observations {
        if let Some(t) = obs.temp.filter(|t| t.is_finite()) {
            hottest.offer(t, greater, || extreme(t, obs));
            coldest.offer(t, less, || extreme(t, obs));
            temp.add(t);
        }

        if let Some(h) = obs.humidity {
            most_humid.offer(h, greater, || extreme(h, obs));
            humidity.add(f64::from(h));
        }
        if let Some(p) = obs.pressure {
            pressure.add(f64::from(p));
        }

        if let Some(wind) = obs.wind.filter(|w| w.speed.is_finite()) {
            // Calm readings count toward the average but never as the strongest.
            if wind.speed > 0.0 {
                strongest_wind.offer(wind.speed, greater, || WindExtreme {
                    speed: wind.speed,
                    direction_deg: wind.direction_deg,
                    city: obs.city.clone(),
                    timestamp: obs.timestamp,
                });
            }
            wind_speed.add(wind.speed);
        }

        if let Some(level) = obs.sea_level.filter(|v| v.is_finite()) {
            highest_sea_level.offer(level, greater, || extreme(level, obs));
            sea_level.add(level);
        }

        if let Some(level) = obs.grnd_level.filter(|v| v.is_finite()) {
            lowest_ground_level.offer(level, less, || extreme(level, obs));
            ground_level.add(level);
        }

        if let Some((text, time)) = daylight(obs.sunrise.as_deref()) {
            earliest_sunrise.offer(time, less, || DaylightExtreme {
                time: text.to_string(),
                city: obs.city.clone(),
            });
        }

        if let Some((text, time)) = daylight(obs.sunset.as_deref()) {
            latest_sunset.offer(time, greater, || DaylightExtreme {
                time: text.to_string(),
                city: obs.city.clone(),
            });
        }

        // First city to reach the highest count wins ties.
        let count = city_counts.entry(obs.city.as_str()).or_insert(0);
        *count += 1;
        if most_frequent.is_none_or(|(_, best)| *count > best) {
            most_frequent = Some((obs.city.as_str(), *count));
        }

        let condition = obs.weather.trim().to_lowercase();
        if !condition.is_empty() {
            match condition_index.get(&condition) {
                Some(&i) => conditions[i].count += 1,
                None => {
                    condition_index.insert(condition.clone(), conditions.len());
                    conditions.push(ConditionCount {
                        condition,
                        count: 1,
                    });
                }
            }
        }
    }

    // Stable sort keeps first appearance among equal counts.
    conditions.sort_by(|a, b| b.count.cmp(&a.count));

    AggregateStats {
        count: observations.len(),
        hottest: hottest.into_item(),
        coldest: coldest.into_item(),
        most_humid: most_humid.into_item(),
        strongest_wind: strongest_wind.into_item(),
        avg_temp: temp.value().map(round2),
        avg_humidity: humidity.value().map(|v| v.trunc() as u8),
        avg_pressure: pressure.value().map(|v| v.trunc() as u32),
        avg_wind_speed: wind_speed.value().map(round2),
        most_frequent_city: most_frequent.map(|(city, count)| CityCount {
            city: city.to_string(),
            count,
        }),
        avg_sea_level: sea_level.value().map(round2),
        highest_sea_level: highest_sea_level.into_item(),
        avg_ground_level: ground_level.value().map(round2),
        lowest_ground_level: lowest_ground_level.into_item(),
        earliest_sunrise: earliest_sunrise.into_item(),
        latest_sunset: latest_sunset.into_item(),
        conditions,
    }
}

/// A sunrise/sunset value that reads as a time of day.
fn daylight(text: Option<&str>) -> Option<(&str, Time)> {
    let text = text?;
    parse_daylight_time(text).ok().map(|time| (text, time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use skylog_types::Wind;
    use time::macros::datetime;

    fn obs(minute: u8, city: &str, temp: f64) -> WeatherObservation {
        let timestamp = datetime!(2024-07-18 12:00:00).replace_minute(minute).unwrap();
        WeatherObservation::new(timestamp, city, temp, 50, 1010)
    }

    #[test]
    fn test_empty_input_is_unavailable() {
        let stats = aggregate(&[]);
        assert_eq!(stats, AggregateStats::empty());
        assert!(stats.is_empty());
        assert!(stats.avg_temp.is_none());
        assert!(stats.most_frequent_city.is_none());
    }

    #[test]
    fn test_hottest_and_coldest_carry_metadata() {
        let stats = aggregate(&[
            obs(0, "Lagos", 31.0),
            obs(1, "Oslo", -4.5),
            obs(2, "Rome", 22.0),
        ]);

        let hottest = stats.hottest.unwrap();
        assert_eq!(hottest.value, 31.0);
        assert_eq!(hottest.city, "Lagos");
        assert_eq!(hottest.timestamp, datetime!(2024-07-18 12:00:00));

        let coldest = stats.coldest.unwrap();
        assert_eq!(coldest.value, -4.5);
        assert_eq!(coldest.city, "Oslo");
    }

    #[test]
    fn test_temperature_ties_keep_first_scanned() {
        let stats = aggregate(&[
            obs(0, "Cairo", 30.0),
            obs(1, "Dubai", 30.0),
            obs(2, "Oslo", 5.0),
            obs(3, "Bergen", 5.0),
        ]);
        assert_eq!(stats.hottest.unwrap().city, "Cairo");
        assert_eq!(stats.coldest.unwrap().city, "Oslo");
    }

    #[test]
    fn test_most_humid() {
        let mut a = obs(0, "Dry", 20.0);
        a.humidity = Some(15);
        let mut b = obs(1, "Wet", 20.0);
        b.humidity = Some(97);
        let mut c = obs(2, "AlsoWet", 20.0);
        c.humidity = Some(97);

        let stats = aggregate(&[a, b, c]);
        let most_humid = stats.most_humid.unwrap();
        assert_eq!(most_humid.value, 97);
        assert_eq!(most_humid.city, "Wet");
        assert_eq!(stats.avg_humidity, Some(69));
    }

    #[test]
    fn test_strongest_wind_skips_unparsed_and_keeps_first_tie() {
        let stats = aggregate(&[
            obs(0, "Calm", 10.0).with_wind_text("N/A"),
            obs(1, "Breezy", 10.0).with_wind_text("6.00 m/s, 200°"),
            obs(2, "Gusty", 10.0).with_wind_text("6.00 m/s, 10°"),
            obs(3, "Broken", 10.0).with_wind_text("fast"),
            obs(4, "Light", 10.0).with_wind_text("2.00 m/s"),
        ]);

        let wind = stats.strongest_wind.unwrap();
        assert_eq!(wind.speed, 6.0);
        assert_eq!(wind.direction_deg, Some(200.0));
        assert_eq!(wind.city, "Breezy");
        // Mean over the three parsed winds only
        assert_eq!(stats.avg_wind_speed, Some(4.67));
    }

    #[test]
    fn test_calm_wind_is_never_strongest() {
        let stats = aggregate(&[
            obs(0, "Calm", 10.0).with_wind_text("0.00 m/s, 0°"),
            obs(1, "Still", 10.0).with_wind(Wind::new(0.0, None)),
        ]);

        assert!(stats.strongest_wind.is_none());
        assert_eq!(stats.avg_wind_speed, Some(0.0));
    }

    #[test]
    fn test_calm_wind_counts_toward_average() {
        let stats = aggregate(&[
            obs(0, "Calm", 10.0).with_wind_text("0.00 m/s, 0°"),
            obs(1, "Breezy", 10.0).with_wind_text("3.00 m/s, 90°"),
        ]);

        assert_eq!(stats.strongest_wind.unwrap().city, "Breezy");
        assert_eq!(stats.avg_wind_speed, Some(1.5));
    }

    #[test]
    fn test_wind_without_direction() {
        let stats = aggregate(&[obs(0, "Nowhere", 1.0).with_wind(Wind::new(3.5, None))]);
        let wind = stats.strongest_wind.unwrap();
        assert_eq!(wind.direction_deg, None);
        assert_eq!(stats.avg_wind_speed, Some(3.5));
    }

    #[test]
    fn test_no_parsed_wind_is_unavailable() {
        let stats = aggregate(&[obs(0, "A", 1.0).with_wind_text("N/A"), obs(1, "B", 2.0)]);
        assert!(stats.strongest_wind.is_none());
        assert!(stats.avg_wind_speed.is_none());
    }

    #[test]
    fn test_averages_precision() {
        let mut a = obs(0, "A", 10.0);
        a.humidity = Some(50);
        a.pressure = Some(1000);
        let mut b = obs(1, "B", 10.5);
        b.humidity = Some(51);
        b.pressure = Some(1003);
        let mut c = obs(2, "C", 11.0);
        c.humidity = Some(51);
        c.pressure = Some(1004);

        let stats = aggregate(&[a, b, c]);
        assert_eq!(stats.avg_temp, Some(10.5));
        // 152 / 3 = 50.67 and 3007 / 3 = 1002.33, both truncated
        assert_eq!(stats.avg_humidity, Some(50));
        assert_eq!(stats.avg_pressure, Some(1002));
    }

    #[test]
    fn test_absent_readings_are_skipped_not_zero() {
        let stats = aggregate(&[obs(0, "Paris", 20.0), obs(1, "Paris", 0.0).without_readings()]);

        assert_eq!(stats.count, 2);
        assert_eq!(stats.avg_temp, Some(20.0));
        assert_eq!(stats.coldest.unwrap().value, 20.0);
        assert_eq!(stats.avg_humidity, Some(50));
        assert_eq!(stats.avg_pressure, Some(1010));
    }

    #[test]
    fn test_only_absent_readings_are_unavailable() {
        let stats = aggregate(&[obs(0, "Paris", 0.0).without_readings()]);

        assert!(stats.hottest.is_none());
        assert!(stats.most_humid.is_none());
        assert!(stats.avg_temp.is_none());
        assert!(stats.avg_humidity.is_none());
        assert!(stats.avg_pressure.is_none());
        assert_eq!(stats.most_frequent_city.unwrap().city, "Paris");
    }

    #[test]
    fn test_avg_temp_rounds_to_two_decimals() {
        let stats = aggregate(&[obs(0, "A", 1.0), obs(1, "B", 1.0), obs(2, "C", 2.0)]);
        assert_eq!(stats.avg_temp, Some(1.33));
    }

    #[test]
    fn test_sea_and_ground_levels_skip_absent() {
        let stats = aggregate(&[
            obs(0, "NoData", 10.0),
            obs(1, "Coast", 10.0).with_sea_level(1013.25).with_grnd_level(1010.0),
            obs(2, "Hills", 10.0).with_sea_level(1020.0).with_grnd_level(890.5),
        ]);

        assert_eq!(stats.avg_sea_level, Some(1016.63));
        assert_eq!(stats.highest_sea_level.unwrap().city, "Hills");
        assert_eq!(stats.avg_ground_level, Some(950.25));

        let lowest = stats.lowest_ground_level.unwrap();
        assert_eq!(lowest.value, 890.5);
        assert_eq!(lowest.city, "Hills");
    }

    #[test]
    fn test_daylight_extremes_compare_chronologically() {
        let stats = aggregate(&[
            obs(0, "Late", 10.0).with_sunrise("10:05").with_sunset("9:40"),
            obs(1, "Early", 10.0).with_sunrise("6:12").with_sunset("21:15"),
            obs(2, "Bad", 10.0).with_sunrise("N/A").with_sunset("sometime"),
            obs(3, "Tie", 10.0).with_sunrise("06:12").with_sunset("21:15"),
        ]);

        let sunrise = stats.earliest_sunrise.unwrap();
        assert_eq!(sunrise.time, "6:12");
        assert_eq!(sunrise.city, "Early");

        let sunset = stats.latest_sunset.unwrap();
        assert_eq!(sunset.time, "21:15");
        assert_eq!(sunset.city, "Early");
    }

    #[test]
    fn test_daylight_unavailable_without_valid_times() {
        let stats = aggregate(&[obs(0, "A", 1.0).with_sunrise("N/A")]);
        assert!(stats.earliest_sunrise.is_none());
        assert!(stats.latest_sunset.is_none());
    }

    #[test]
    fn test_most_frequent_city_is_case_sensitive() {
        let stats = aggregate(&[
            obs(0, "paris", 1.0),
            obs(1, "Paris", 1.0),
            obs(2, "Paris", 1.0),
        ]);
        let city = stats.most_frequent_city.unwrap();
        assert_eq!(city.city, "Paris");
        assert_eq!(city.count, 2);
    }

    #[test]
    fn test_most_frequent_city_tie_goes_to_first_to_reach_max() {
        let stats = aggregate(&[
            obs(0, "A", 1.0),
            obs(1, "B", 1.0),
            obs(2, "B", 1.0),
            obs(3, "A", 1.0),
        ]);
        let city = stats.most_frequent_city.unwrap();
        assert_eq!(city.city, "B");
        assert_eq!(city.count, 2);
    }

    #[test]
    fn test_conditions_counted_case_insensitively() {
        let stats = aggregate(&[
            obs(0, "A", 1.0).with_weather("Light Rain"),
            obs(1, "A", 1.0).with_weather("Clear Sky"),
            obs(2, "A", 1.0).with_weather("clear sky"),
            obs(3, "A", 1.0).with_weather("Mist"),
            obs(4, "A", 1.0).with_weather("light rain"),
            obs(5, "A", 1.0),
        ]);

        let conditions: Vec<(&str, usize)> = stats
            .conditions
            .iter()
            .map(|c| (c.condition.as_str(), c.count))
            .collect();
        assert_eq!(conditions, vec![("light rain", 2), ("clear sky", 2), ("mist", 1)]);
    }

    #[test]
    fn test_serializes_unavailable_as_null() {
        let json = serde_json::to_value(AggregateStats::empty()).unwrap();
        assert_eq!(json["count"], 0);
        assert!(json["hottest"].is_null());
        assert!(json["avg_temp"].is_null());
    }

    #[test]
    fn test_extreme_serializes_timestamp_text() {
        let stats = aggregate(&[obs(5, "Lagos", 31.0)]);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["hottest"]["timestamp"], "2024-07-18 12:05:00");
        assert_eq!(json["hottest"]["city"], "Lagos");
    }
}
