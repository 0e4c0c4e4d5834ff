//! Stats command implementation.

use std::path::PathBuf;

use anyhow::Result;
use skylog_store::Store;

use crate::cli::StatsFormat;
use crate::format::{FormatOptions, format_stats_json, format_stats_text};
use crate::util::write_output;

/// Aggregate every stored observation and render the result.
///
/// A failed scan degrades to empty statistics rather than an error.
pub fn cmd_stats(
    store: &Store,
    format: StatsFormat,
    output: Option<&PathBuf>,
    opts: &FormatOptions,
) -> Result<()> {
    let stats = skylog_stats::collect_or_empty(store);

    let content = match format {
        StatsFormat::Text => format_stats_text(&stats, opts),
        StatsFormat::Json => format_stats_json(&stats, opts)?,
    };

    write_output(output, &content)?;
    Ok(())
}
