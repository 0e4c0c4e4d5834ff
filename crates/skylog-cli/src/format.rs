//! Output formatting utilities for text, JSON, and CSV output.

use std::cmp::Ordering;

use anyhow::Result;
use serde::Serialize;
use skylog_stats::{AggregateStats, Extreme};
use skylog_types::{NOT_AVAILABLE, WeatherObservation, format_timestamp};

use crate::cli::HistoryColumn;
use crate::style;

/// Formatting options for output.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Disable colored output.
    pub no_color: bool,
    /// Use Fahrenheit for temperatures.
    pub fahrenheit: bool,
}

impl FormatOptions {
    pub fn new(no_color: bool, fahrenheit: bool) -> Self {
        Self {
            no_color,
            fahrenheit,
        }
    }

    /// Serialize value to pretty JSON with a trailing newline.
    pub fn as_json<T: Serialize>(&self, value: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(value)? + "\n")
    }

    /// Temperature unit letter.
    #[must_use]
    pub fn temp_unit(&self) -> &'static str {
        if self.fahrenheit { "F" } else { "C" }
    }

    /// Convert temperature value (for CSV/JSON output).
    #[must_use]
    pub fn convert_temp(&self, celsius: f64) -> f64 {
        if self.fahrenheit {
            celsius_to_fahrenheit(celsius)
        } else {
            celsius
        }
    }

    /// Format temperature with two decimals and unit.
    #[must_use]
    pub fn format_temp(&self, celsius: f64) -> String {
        format!("{:.2}°{}", self.convert_temp(celsius), self.temp_unit())
    }
}

#[must_use]
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Escape a string for CSV output.
/// Wraps the value in quotes if it contains commas, quotes, or newlines.
/// Double quotes are escaped by doubling them.
#[must_use]
pub fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn or_na(value: Option<String>) -> String {
    value.unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn opt_num<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

// ============================================================================
// History formatting
// ============================================================================

/// One observation with its display cells, in [`HistoryColumn`] order.
#[derive(Debug, Clone)]
pub struct HistoryRow {
    pub observation: WeatherObservation,
    pub cells: [String; 13],
}

impl HistoryRow {
    pub fn new(obs: WeatherObservation, opts: &FormatOptions) -> Self {
        let cells = [
            format_timestamp(&obs.timestamp),
            obs.city.clone(),
            or_na(obs.temp.map(|t| opts.format_temp(t))),
            or_na(obs.feels_like.map(|t| opts.format_temp(t))),
            if obs.weather.is_empty() {
                NOT_AVAILABLE.to_string()
            } else {
                obs.weather.clone()
            },
            or_na(obs.humidity.map(|h| format!("{}%", h))),
            or_na(obs.pressure.map(|p| format!("{} hPa", p))),
            or_na(obs.visibility.map(|v| format!("{} m", v))),
            or_na(obs.wind.map(|w| w.to_string())),
            or_na(obs.sea_level.map(|v| format!("{} hPa", v))),
            or_na(obs.grnd_level.map(|v| format!("{} hPa", v))),
            or_na(obs.sunrise.clone()),
            or_na(obs.sunset.clone()),
        ];
        Self {
            observation: obs,
            cells,
        }
    }

    pub fn cell(&self, column: HistoryColumn) -> &str {
        &self.cells[column.index()]
    }
}

/// Numeric value of a display cell: its first word with unit suffixes removed.
fn numeric_key(cell: &str) -> Option<f64> {
    let head = cell.split_whitespace().next()?;
    let stripped = ["°C", "°F", "%", "m/s", "hPa"]
        .iter()
        .fold(head.to_string(), |acc, unit| acc.replace(unit, ""));
    stripped.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Sort rows by the displayed text of `column`.
///
/// Columns whose every cell reads as a number sort numerically; anything else
/// (e.g. a column containing `N/A`) sorts as text. Equal keys keep their order.
pub fn sort_history(rows: &mut [HistoryRow], column: HistoryColumn, ascending: bool) {
    let numeric = rows.iter().all(|r| numeric_key(r.cell(column)).is_some());

    let direction = |ordering: Ordering| {
        if ascending {
            ordering
        } else {
            ordering.reverse()
        }
    };

    if numeric {
        rows.sort_by(|a, b| {
            let (x, y) = (numeric_key(a.cell(column)), numeric_key(b.cell(column)));
            direction(x.partial_cmp(&y).unwrap_or(Ordering::Equal))
        });
    } else {
        rows.sort_by(|a, b| direction(a.cell(column).cmp(b.cell(column))));
    }
}

pub fn format_history_text(rows: &[HistoryRow], opts: &FormatOptions) -> String {
    use tabled::builder::Builder;

    if rows.is_empty() {
        return "No history found.\n".to_string();
    }

    let mut output = format!("History ({} observations):\n\n", rows.len());

    let mut builder = Builder::default();
    builder.push_record(HistoryColumn::ALL.iter().map(|c| c.title()));
    for row in rows {
        builder.push_record(row.cells.iter().cloned());
    }

    let mut table = builder.build();
    style::apply_table_style(&mut table, opts.no_color);
    output.push_str(&table.to_string());
    output.push('\n');
    output
}

#[must_use]
pub fn format_history_csv(rows: &[HistoryRow], opts: &FormatOptions) -> String {
    let unit = opts.temp_unit().to_lowercase();
    let mut output = format!(
        "timestamp,city,temp_{unit},feels_like_{unit},weather,humidity,pressure,visibility,\
         wind_speed,wind_direction_deg,sea_level,grnd_level,sunrise,sunset\n"
    );

    for row in rows {
        let obs = &row.observation;
        output.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{}\n",
            format_timestamp(&obs.timestamp),
            csv_escape(&obs.city),
            obs.temp
                .map(|t| format!("{:.2}", opts.convert_temp(t)))
                .unwrap_or_default(),
            obs.feels_like
                .map(|t| format!("{:.2}", opts.convert_temp(t)))
                .unwrap_or_default(),
            csv_escape(&obs.weather),
            opt_num(obs.humidity),
            opt_num(obs.pressure),
            opt_num(obs.visibility),
            opt_num(obs.wind.map(|w| w.speed)),
            opt_num(obs.wind.and_then(|w| w.direction_deg)),
            opt_num(obs.sea_level),
            opt_num(obs.grnd_level),
            csv_escape(obs.sunrise.as_deref().unwrap_or_default()),
            csv_escape(obs.sunset.as_deref().unwrap_or_default()),
        ));
    }
    output
}

/// Format history as JSON with temperature unit conversion applied.
pub fn format_history_json(rows: &[HistoryRow], opts: &FormatOptions) -> Result<String> {
    #[derive(Serialize)]
    struct HistoryJson<'a> {
        timestamp: String,
        city: &'a str,
        temp: Option<f64>,
        feels_like: Option<f64>,
        temperature_unit: &'static str,
        weather: &'a str,
        humidity: Option<u8>,
        pressure: Option<u32>,
        visibility: Option<f64>,
        wind_speed: Option<f64>,
        wind_direction_deg: Option<f64>,
        sea_level: Option<f64>,
        grnd_level: Option<f64>,
        sunrise: Option<&'a str>,
        sunset: Option<&'a str>,
    }

    let records: Vec<HistoryJson<'_>> = rows
        .iter()
        .map(|row| {
            let obs = &row.observation;
            HistoryJson {
                timestamp: format_timestamp(&obs.timestamp),
                city: &obs.city,
                temp: obs.temp.map(|t| opts.convert_temp(t)),
                feels_like: obs.feels_like.map(|t| opts.convert_temp(t)),
                temperature_unit: opts.temp_unit(),
                weather: &obs.weather,
                humidity: obs.humidity,
                pressure: obs.pressure,
                visibility: obs.visibility,
                wind_speed: obs.wind.map(|w| w.speed),
                wind_direction_deg: obs.wind.and_then(|w| w.direction_deg),
                sea_level: obs.sea_level,
                grnd_level: obs.grnd_level,
                sunrise: obs.sunrise.as_deref(),
                sunset: obs.sunset.as_deref(),
            }
        })
        .collect();

    opts.as_json(&records)
}

// ============================================================================
// Statistics formatting
// ============================================================================

pub const NO_STATISTICS: &str = "No statistics available yet. Record a city first!";

fn extreme_line(
    label: &str,
    value: String,
    city: &str,
    timestamp: String,
    opts: &FormatOptions,
) -> String {
    format!(
        "  {:<16} {:<16} {:<22} {}\n",
        label,
        value,
        style::format_city(city, opts.no_color),
        style::format_dimmed(&timestamp, opts.no_color)
    )
}

fn temp_extreme(label: &str, extreme: &Extreme<f64>, opts: &FormatOptions) -> String {
    let text = opts.format_temp(extreme.value);
    extreme_line(
        label,
        style::format_temp_colored(&text, extreme.value, opts.no_color),
        &extreme.city,
        format_timestamp(&extreme.timestamp),
        opts,
    )
}

fn detail_line(label: &str, value: impl std::fmt::Display) -> String {
    format!("  {:<32} {}\n", label, value)
}

fn at_city<T: std::fmt::Display>(value: T, city: &str, when: Option<String>) -> String {
    match when {
        Some(when) => format!("{} in {} at {}", value, city, when),
        None => format!("{} in {}", value, city),
    }
}

pub fn format_stats_text(stats: &AggregateStats, opts: &FormatOptions) -> String {
    if stats.is_empty() {
        return format!("{}\n", NO_STATISTICS);
    }

    let na = || NOT_AVAILABLE.to_string();
    let mut output = style::format_title("Weather Statistics", opts.no_color);
    output.push_str("\n\n");

    match &stats.hottest {
        Some(hottest) => output.push_str(&temp_extreme("Hottest", hottest, opts)),
        None => output.push_str(&detail_line("Hottest", na())),
    }
    match &stats.coldest {
        Some(coldest) => output.push_str(&temp_extreme("Coldest", coldest, opts)),
        None => output.push_str(&detail_line("Coldest", na())),
    }
    match &stats.strongest_wind {
        Some(wind) => output.push_str(&extreme_line(
            "Strongest wind",
            skylog_types::Wind::new(wind.speed, wind.direction_deg).to_string(),
            &wind.city,
            format_timestamp(&wind.timestamp),
            opts,
        )),
        None => output.push_str(&detail_line("Strongest wind", na())),
    }
    match &stats.most_humid {
        Some(humid) => output.push_str(&extreme_line(
            "Most humid",
            format!("{}%", humid.value),
            &humid.city,
            format_timestamp(&humid.timestamp),
            opts,
        )),
        None => output.push_str(&detail_line("Most humid", na())),
    }
    output.push('\n');

    output.push_str(&detail_line("Total logs:", stats.count));
    output.push_str(&detail_line(
        "Most searched city:",
        stats
            .most_frequent_city
            .as_ref()
            .map(|c| format!("{} ({})", c.city, c.count))
            .unwrap_or_else(na),
    ));
    output.push_str(&detail_line(
        "Average temperature:",
        stats.avg_temp.map(|t| opts.format_temp(t)).unwrap_or_else(na),
    ));
    output.push_str(&detail_line(
        "Average humidity:",
        stats.avg_humidity.map(|h| format!("{}%", h)).unwrap_or_else(na),
    ));
    output.push_str(&detail_line(
        "Average pressure:",
        stats.avg_pressure.map(|p| format!("{} hPa", p)).unwrap_or_else(na),
    ));
    output.push_str(&detail_line(
        "Average wind speed:",
        stats.avg_wind_speed.map(|w| format!("{:.2} m/s", w)).unwrap_or_else(na),
    ));
    output.push_str(&detail_line(
        "Average sea level pressure:",
        stats.avg_sea_level.map(|p| format!("{:.2} hPa", p)).unwrap_or_else(na),
    ));
    output.push_str(&detail_line(
        "Highest sea level:",
        stats
            .highest_sea_level
            .as_ref()
            .map(|e| {
                let when = Some(format_timestamp(&e.timestamp));
                at_city(format!("{} hPa", e.value), &e.city, when)
            })
            .unwrap_or_else(na),
    ));
    output.push_str(&detail_line(
        "Average ground level pressure:",
        stats.avg_ground_level.map(|p| format!("{:.2} hPa", p)).unwrap_or_else(na),
    ));
    output.push_str(&detail_line(
        "Lowest ground level:",
        stats
            .lowest_ground_level
            .as_ref()
            .map(|e| {
                let when = Some(format_timestamp(&e.timestamp));
                at_city(format!("{} hPa", e.value), &e.city, when)
            })
            .unwrap_or_else(na),
    ));
    output.push_str(&detail_line(
        "Earliest sunrise:",
        stats
            .earliest_sunrise
            .as_ref()
            .map(|d| at_city(&d.time, &d.city, None))
            .unwrap_or_else(na),
    ));
    output.push_str(&detail_line(
        "Latest sunset:",
        stats
            .latest_sunset
            .as_ref()
            .map(|d| at_city(&d.time, &d.city, None))
            .unwrap_or_else(na),
    ));

    if !stats.conditions.is_empty() {
        output.push_str("\n  Conditions:\n");
        for condition in &stats.conditions {
            output.push_str(&format!("    {:<28} {}\n", condition.condition, condition.count));
        }
    }

    output
}

/// Statistics as JSON, with temperatures in the selected unit.
pub fn format_stats_json(stats: &AggregateStats, opts: &FormatOptions) -> Result<String> {
    #[derive(Serialize)]
    struct StatsJson {
        temperature_unit: &'static str,
        #[serde(flatten)]
        stats: AggregateStats,
    }

    let mut stats = stats.clone();
    if opts.fahrenheit {
        for extreme in [&mut stats.hottest, &mut stats.coldest].into_iter().flatten() {
            extreme.value = round2(celsius_to_fahrenheit(extreme.value));
        }
        stats.avg_temp = stats.avg_temp.map(|t| round2(celsius_to_fahrenheit(t)));
    }

    opts.as_json(&StatsJson {
        temperature_unit: opts.temp_unit(),
        stats,
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
