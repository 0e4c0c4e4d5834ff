//! Info command implementation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use skylog_store::{SCHEMA_VERSION, Store};

use crate::util::write_output;

/// Show where the database lives, how large it is and how many rows it holds.
///
/// A missing database is reported rather than created.
pub fn cmd_info(db_path: &Path, output: Option<&PathBuf>) -> Result<()> {
    let mut content = format!("Database path: {}\n", db_path.display());

    if db_path.exists() {
        let metadata = std::fs::metadata(db_path)
            .with_context(|| format!("Failed to read {}", db_path.display()))?;
        let store = Store::open(db_path).context("Failed to open database")?;

        content.push_str(&format!("Database size: {} KB\n", metadata.len() / 1024));
        content.push_str(&format!("Observations: {}\n", store.count()?));
        content.push_str(&format!("Schema version: {}\n", SCHEMA_VERSION));
    } else {
        content.push_str("Database does not exist yet. Run 'skylog record' to create it.\n");
    }

    write_output(output, &content)
}
