//! Command implementations for the CLI.

mod config;
mod history;
mod info;
mod record;
mod stats;
mod transfer;

pub use config::cmd_config;
pub use history::{HistoryArgs, cmd_history};
pub use info::cmd_info;
pub use record::cmd_record;
pub use stats::cmd_stats;
pub use transfer::{ExportArgs, cmd_export, cmd_import};
