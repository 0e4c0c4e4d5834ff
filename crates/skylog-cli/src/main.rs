//! Command-line weather logbook.
//!
//! `skylog` records current-conditions payloads per city into a local SQLite
//! store and reports history and aggregate statistics over everything
//! recorded.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `record` | Store a current-conditions JSON payload for a city |
//! | `history` | Show recent observations, optionally sorted by a column |
//! | `stats` | Show aggregate statistics |
//! | `import` / `export` | Move observations in and out as CSV or JSON |
//! | `info` | Show database location, size and record count |
//! | `config` | Manage CLI configuration |
//!
//! # Environment Variables
//!
//! - `SKYLOG_DB`: Database path (overridden by `--database`)
//! - `NO_COLOR`: Disable colored output when set
//! - `RUST_LOG`: Log filter when neither `--verbose` nor `--quiet` is given

mod cli;
mod commands;
mod config;
mod format;
mod style;
mod util;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use skylog_store::Store;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use commands::{ExportArgs, HistoryArgs};
use config::Config;
use format::FormatOptions;

fn open_store(path: &Path) -> Result<Store> {
    Store::open(path).with_context(|| format!("Failed to open database {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON and CSV on stdout stay clean
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load();
    let no_color = cli.no_color || config.no_color;
    let db_path = config::resolve_database(cli.database.clone(), &config);
    let output = cli.output.as_ref();

    match cli.command {
        Commands::Record { city, input } => {
            let store = open_store(&db_path)?;
            let opts = FormatOptions::new(no_color, config.fahrenheit);
            commands::cmd_record(&store, &city, &input, cli.quiet, &opts)?;
        }
        Commands::History {
            limit,
            city,
            sort,
            ascending,
            format,
            units,
        } => {
            let store = open_store(&db_path)?;
            let opts = FormatOptions::new(no_color, units.resolve_fahrenheit(config.fahrenheit));
            commands::cmd_history(
                &store,
                HistoryArgs {
                    limit: limit.unwrap_or_else(|| config.history_limit()),
                    city,
                    sort,
                    ascending,
                    format,
                    output,
                    opts: &opts,
                },
            )?;
        }
        Commands::Stats { format, units } => {
            let store = open_store(&db_path)?;
            let opts = FormatOptions::new(no_color, units.resolve_fahrenheit(config.fahrenheit));
            commands::cmd_stats(&store, format, output, &opts)?;
        }
        Commands::Import { format, input } => {
            let store = open_store(&db_path)?;
            commands::cmd_import(&store, format, &input, no_color)?;
        }
        Commands::Export {
            format,
            city,
            since,
            until,
        } => {
            let store = open_store(&db_path)?;
            commands::cmd_export(
                &store,
                ExportArgs {
                    format,
                    city,
                    since,
                    until,
                    output,
                },
            )?;
        }
        Commands::Info => commands::cmd_info(&db_path, output)?,
        Commands::Config { action } => commands::cmd_config(action, no_color)?,
    }

    Ok(())
}
