//! Config command implementation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::cli::{ConfigAction, ConfigKey, parse_bool_arg};
use crate::config::Config;
use crate::style;

pub fn cmd_config(action: ConfigAction, no_color: bool) -> Result<()> {
    print!("{}", run_action(action, &Config::path(), no_color)?);
    Ok(())
}

/// Apply `action` to the config file at `path` and return what to print.
fn run_action(action: ConfigAction, path: &Path, no_color: bool) -> Result<String> {
    let mut config = Config::load_from(path);

    match action {
        ConfigAction::Show => {
            let content = toml::to_string_pretty(&config).context("Failed to serialize config")?;
            Ok(format!("# {}\n{}", path.display(), content))
        }
        ConfigAction::Get { key } => Ok(format!("{}\n", get_value(&config, key))),
        ConfigAction::Set { key, value } => {
            set_value(&mut config, key, &value)?;
            config.save_to(path)?;
            Ok(format!(
                "{}\n",
                style::format_success(&format!("Set {} = {}", key_name(key), value), no_color)
            ))
        }
        ConfigAction::Unset { key } => {
            unset_value(&mut config, key);
            config.save_to(path)?;
            Ok(format!(
                "{}\n",
                style::format_success(&format!("Unset {}", key_name(key)), no_color)
            ))
        }
        ConfigAction::Path => Ok(format!("{}\n", path.display())),
    }
}

fn key_name(key: ConfigKey) -> &'static str {
    match key {
        ConfigKey::Database => "database",
        ConfigKey::Fahrenheit => "fahrenheit",
        ConfigKey::NoColor => "no_color",
        ConfigKey::HistoryLimit => "history_limit",
    }
}

fn get_value(config: &Config, key: ConfigKey) -> String {
    match key {
        ConfigKey::Database => config
            .database
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not set)".to_string()),
        ConfigKey::Fahrenheit => config.fahrenheit.to_string(),
        ConfigKey::NoColor => config.no_color.to_string(),
        ConfigKey::HistoryLimit => config.history_limit().to_string(),
    }
}

fn set_value(config: &mut Config, key: ConfigKey, value: &str) -> Result<()> {
    match key {
        ConfigKey::Database => config.database = Some(PathBuf::from(value)),
        ConfigKey::Fahrenheit => config.fahrenheit = parse_bool_arg(value).map_err(|e| anyhow!(e))?,
        ConfigKey::NoColor => config.no_color = parse_bool_arg(value).map_err(|e| anyhow!(e))?,
        ConfigKey::HistoryLimit => {
            let limit: u32 = value
                .parse()
                .with_context(|| format!("Invalid history limit '{}'", value))?;
            config.history_limit = Some(limit);
        }
    }
    Ok(())
}

fn unset_value(config: &mut Config, key: ConfigKey) {
    match key {
        ConfigKey::Database => config.database = None,
        ConfigKey::Fahrenheit => config.fahrenheit = false,
        ConfigKey::NoColor => config.no_color = false,
        ConfigKey::HistoryLimit => config.history_limit = None,
    }
}
