//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

/// Output format for statistics, which have no tabular form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StatsFormat {
    #[default]
    Text,
    Json,
}

/// Interchange format for import and export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum DataFormat {
    #[default]
    Csv,
    Json,
}

/// Columns of the history table
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HistoryColumn {
    Timestamp,
    City,
    Temp,
    FeelsLike,
    Weather,
    Humidity,
    Pressure,
    Visibility,
    Wind,
    SeaLevel,
    GrndLevel,
    Sunrise,
    Sunset,
}

impl HistoryColumn {
    pub const ALL: [HistoryColumn; 13] = [
        HistoryColumn::Timestamp,
        HistoryColumn::City,
        HistoryColumn::Temp,
        HistoryColumn::FeelsLike,
        HistoryColumn::Weather,
        HistoryColumn::Humidity,
        HistoryColumn::Pressure,
        HistoryColumn::Visibility,
        HistoryColumn::Wind,
        HistoryColumn::SeaLevel,
        HistoryColumn::GrndLevel,
        HistoryColumn::Sunrise,
        HistoryColumn::Sunset,
    ];

    /// Position of the column in a history row.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Table heading, e.g. "Feels Like".
    pub fn title(self) -> &'static str {
        match self {
            HistoryColumn::Timestamp => "Timestamp",
            HistoryColumn::City => "City",
            HistoryColumn::Temp => "Temp",
            HistoryColumn::FeelsLike => "Feels Like",
            HistoryColumn::Weather => "Weather",
            HistoryColumn::Humidity => "Humidity",
            HistoryColumn::Pressure => "Pressure",
            HistoryColumn::Visibility => "Visibility",
            HistoryColumn::Wind => "Wind",
            HistoryColumn::SeaLevel => "Sea Level",
            HistoryColumn::GrndLevel => "Grnd Level",
            HistoryColumn::Sunrise => "Sunrise",
            HistoryColumn::Sunset => "Sunset",
        }
    }
}

/// Reusable temperature unit arguments
#[derive(Debug, Clone, Args)]
pub struct UnitArgs {
    /// Use Fahrenheit for temperature display (overrides --celsius and config)
    #[arg(long, conflicts_with = "celsius")]
    pub fahrenheit: bool,

    /// Use Celsius for temperature display (default, overrides config)
    #[arg(long, conflicts_with = "fahrenheit")]
    pub celsius: bool,
}

impl UnitArgs {
    /// Resolve fahrenheit setting: explicit flags override config
    pub fn resolve_fahrenheit(&self, config_fahrenheit: bool) -> bool {
        if self.fahrenheit {
            true
        } else if self.celsius {
            false
        } else {
            config_fahrenheit
        }
    }
}

#[derive(Parser)]
#[command(name = "skylog")]
#[command(author, version, about = "Weather logbook with aggregate statistics", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Observation database (defaults to config, then the platform data directory)
    #[arg(long, global = true, env = "SKYLOG_DB")]
    pub database: Option<PathBuf>,

    /// Write output to file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Store a current-conditions payload for a city
    Record {
        /// City the observation belongs to
        #[arg(short, long)]
        city: String,

        /// JSON payload file, or "-" for stdin
        #[arg(short, long, default_value = "-")]
        input: PathBuf,
    },

    /// Show recent observations
    History {
        /// Number of observations to show (defaults to config, then 50)
        #[arg(short = 'n', long)]
        limit: Option<u32>,

        /// Only show observations for this city
        #[arg(short, long)]
        city: Option<String>,

        /// Sort by column
        #[arg(short, long, value_enum)]
        sort: Option<HistoryColumn>,

        /// Sort ascending instead of descending
        #[arg(long, requires = "sort")]
        ascending: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        #[command(flatten)]
        units: UnitArgs,
    },

    /// Show aggregate statistics over every observation
    Stats {
        /// Output format (text, json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: StatsFormat,

        #[command(flatten)]
        units: UnitArgs,
    },

    /// Import observations from CSV or JSON
    Import {
        /// Input format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: DataFormat,

        /// File to import, or "-" for stdin
        #[arg(short, long, default_value = "-")]
        input: PathBuf,
    },

    /// Export observations as CSV or JSON
    Export {
        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: DataFormat,

        /// Only export observations for this city
        #[arg(short, long)]
        city: Option<String>,

        /// Only export observations at or after this time (YYYY-MM-DD HH:MM:SS)
        #[arg(long)]
        since: Option<String>,

        /// Only export observations at or before this time (YYYY-MM-DD HH:MM:SS)
        #[arg(long)]
        until: Option<String>,
    },

    /// Show database location, size and record count
    Info,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration keys
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConfigKey {
    /// Observation database path
    Database,
    /// Use Fahrenheit for temperature
    Fahrenheit,
    /// Disable colored output
    NoColor,
    /// Default number of history rows
    HistoryLimit,
}

/// Configuration subcommands
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Get a configuration value
    Get {
        /// Configuration key
        #[arg(value_enum)]
        key: ConfigKey,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        #[arg(value_enum)]
        key: ConfigKey,
        /// Configuration value
        value: String,
    },

    /// Unset (remove) a configuration value
    Unset {
        /// Configuration key to remove
        #[arg(value_enum)]
        key: ConfigKey,
    },

    /// Show configuration file path
    Path,
}

/// Parse boolean argument with flexible input
pub fn parse_bool_arg(s: &str) -> Result<bool, String> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" | "enable" | "enabled" => Ok(true),
        "false" | "no" | "off" | "0" | "disable" | "disabled" => Ok(false),
        _ => Err(format!(
            "Invalid boolean value '{}'. Use: true/false, yes/no, on/off, 1/0",
            s
        )),
    }
}
