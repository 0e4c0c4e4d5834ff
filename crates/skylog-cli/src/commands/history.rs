//! History command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use skylog_store::{ObservationQuery, Store};

use crate::cli::{HistoryColumn, OutputFormat};
use crate::format::{
    FormatOptions, HistoryRow, format_history_csv, format_history_json, format_history_text,
    sort_history,
};
use crate::util::write_output;

/// Arguments for the history command.
pub struct HistoryArgs<'a> {
    pub limit: u32,
    pub city: Option<String>,
    pub sort: Option<HistoryColumn>,
    pub ascending: bool,
    pub format: OutputFormat,
    pub output: Option<&'a PathBuf>,
    pub opts: &'a FormatOptions,
}

pub fn cmd_history(store: &Store, args: HistoryArgs<'_>) -> Result<()> {
    let HistoryArgs {
        limit,
        city,
        sort,
        ascending,
        format,
        output,
        opts,
    } = args;

    let mut query = ObservationQuery::new().limit(limit);
    if let Some(city) = city.as_deref() {
        query = query.city(city);
    }

    let observations = store.query(&query).context("Failed to query history")?;
    let mut rows: Vec<HistoryRow> = observations
        .into_iter()
        .map(|obs| HistoryRow::new(obs, opts))
        .collect();

    if let Some(column) = sort {
        sort_history(&mut rows, column, ascending);
    }

    let content = match format {
        OutputFormat::Json => format_history_json(&rows, opts)?,
        OutputFormat::Text => format_history_text(&rows, opts),
        OutputFormat::Csv => format_history_csv(&rows, opts),
    };

    write_output(output, &content)?;
    Ok(())
}
