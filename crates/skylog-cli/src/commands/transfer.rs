//! Import and export of stored observations.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use skylog_store::{ImportResult, ObservationQuery, Store};
use skylog_types::parse_timestamp;
use time::PrimitiveDateTime;

use crate::cli::DataFormat;
use crate::style;
use crate::util::{read_input, write_output};

/// Errors listed individually before the rest are summarized.
const MAX_REPORTED_ERRORS: usize = 10;

fn parse_bound(flag: &str, value: Option<&str>) -> Result<Option<PrimitiveDateTime>> {
    value
        .map(|s| {
            parse_timestamp(s)
                .with_context(|| format!("Invalid --{} value. Use YYYY-MM-DD HH:MM:SS", flag))
        })
        .transpose()
}

/// Arguments for the export command.
pub struct ExportArgs<'a> {
    pub format: DataFormat,
    pub city: Option<String>,
    pub since: Option<String>,
    pub until: Option<String>,
    pub output: Option<&'a PathBuf>,
}

pub fn cmd_export(store: &Store, args: ExportArgs<'_>) -> Result<()> {
    // Parse filters upfront to fail fast
    let since = parse_bound("since", args.since.as_deref())?;
    let until = parse_bound("until", args.until.as_deref())?;

    let mut query = ObservationQuery::new().oldest_first();
    if let Some(city) = args.city.as_deref() {
        query = query.city(city);
    }
    if let Some(since) = since {
        query = query.since(since);
    }
    if let Some(until) = until {
        query = query.until(until);
    }

    let content = match args.format {
        DataFormat::Csv => store.export_csv(&query)?,
        DataFormat::Json => store.export_json(&query)?,
    };

    write_output(args.output, &content)?;
    Ok(())
}

pub fn cmd_import(store: &Store, format: DataFormat, input: &Path, no_color: bool) -> Result<()> {
    let data = read_input(input)?;

    let result = match format {
        DataFormat::Csv => store.import_csv(&data)?,
        DataFormat::Json => store.import_json(&data)?,
    };

    print!("{}", format_import_report(&result, no_color));
    Ok(())
}

fn format_import_report(result: &ImportResult, no_color: bool) -> String {
    let mut report = format!(
        "{}\n  Total records: {}\n  Imported: {}\n  Skipped (duplicates): {}\n",
        style::format_success("Import complete", no_color),
        result.total,
        result.imported,
        result.skipped
    );

    if !result.errors.is_empty() {
        report.push_str(&format!(
            "\n{}\n",
            style::format_warning(&format!("Errors ({}):", result.errors.len()), no_color)
        ));
        for err in result.errors.iter().take(MAX_REPORTED_ERRORS) {
            report.push_str(&format!("  {}\n", err));
        }
        if result.errors.len() > MAX_REPORTED_ERRORS {
            report.push_str(&format!(
                "  ... and {} more errors\n",
                result.errors.len() - MAX_REPORTED_ERRORS
            ));
        }
    }
    report
}
