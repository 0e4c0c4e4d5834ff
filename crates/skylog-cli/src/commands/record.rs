//! Record command implementation.

use std::path::Path;

use anyhow::{Context, Result, bail};
use skylog_store::Store;
use skylog_types::{CurrentWeather, NOT_AVAILABLE, format_timestamp};

use crate::format::FormatOptions;
use crate::style;
use crate::util::read_input;

/// Store a current-conditions JSON payload for `city`.
pub fn cmd_record(
    store: &Store,
    city: &str,
    input: &Path,
    quiet: bool,
    opts: &FormatOptions,
) -> Result<()> {
    let city = city.trim();
    if city.is_empty() {
        bail!("City name must not be empty");
    }

    let data = read_input(input)?;
    let current: CurrentWeather =
        serde_json::from_str(&data).context("Invalid current-conditions payload")?;

    let observation = store
        .record(city, &current)
        .context("Failed to store observation")?;

    if !quiet {
        let summary = format!(
            "Recorded {} at {}: {}",
            observation.city,
            format_timestamp(&observation.timestamp),
            observation
                .temp
                .map(|t| opts.format_temp(t))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        );
        println!("{}", style::format_success(&summary, opts.no_color));
    }
    Ok(())
}
