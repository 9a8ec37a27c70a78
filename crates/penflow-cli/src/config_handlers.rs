//! Handler functions for `penflow config` commands.
//!
//! Each handler returns the text to print so the dispatcher owns stdout.

use std::path::PathBuf;

use penflow_pipeline::{Error, PenflowConfig, Result};

use crate::cli::ConfigAction;

/// Runs a config subcommand.
pub fn handle_config_command(config_path: Option<&str>, action: ConfigAction) -> Result<String> {
    match action {
        ConfigAction::Path => cmd_config_path(config_path),
        ConfigAction::Show => cmd_config_show(config_path),
        ConfigAction::Get { key } => cmd_config_get(config_path, &key),
        ConfigAction::Init { file, force } => cmd_config_init(file.as_deref(), force),
    }
}

/// Resolved config file path.
pub fn cmd_config_path(config_path: Option<&str>) -> Result<String> {
    match PenflowConfig::resolve_config_path(config_path) {
        Some(path) => {
            if !path.exists() {
                eprintln!("(file does not exist, run `penflow config init` to create it)");
            }
            Ok(path.display().to_string())
        }
        None => Err(Error::config(
            "Could not determine config directory for this platform",
        )),
    }
}

/// Effective configuration, overrides applied, as TOML.
pub fn cmd_config_show(config_path: Option<&str>) -> Result<String> {
    PenflowConfig::load(config_path)?.to_toml_string()
}

/// One configuration value by dotted key.
pub fn cmd_config_get(config_path: Option<&str>, key: &str) -> Result<String> {
    let config = PenflowConfig::load(config_path)?;
    let value = toml::Value::try_from(&config).map_err(|e| Error::config(e.to_string()))?;
    get_nested_value(&value, key)
        .map(format_toml_value)
        .ok_or_else(|| Error::config(format!("Key '{key}' not found in configuration")))
}

/// Writes a default configuration file.
pub fn cmd_config_init(file: Option<&str>, force: bool) -> Result<String> {
    let path = match file {
        Some(p) => PathBuf::from(p),
        None => PenflowConfig::default_config_path()
            .ok_or_else(|| Error::config("Could not determine config directory"))?,
    };

    if path.exists() && !force {
        return Err(Error::config(format!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| Error::config(format!("Failed to create {}: {e}", parent.display())))?;
    }

    let content = PenflowConfig::default().to_toml_string()?;
    std::fs::write(&path, content)
        .map_err(|e| Error::config(format!("Failed to write {}: {e}", path.display())))?;

    Ok(format!("Config file created at {}", path.display()))
}

/// Navigates a dotted key path in a TOML value tree.
pub fn get_nested_value<'a>(value: &'a toml::Value, key: &str) -> Option<&'a toml::Value> {
    key.split('.')
        .try_fold(value, |current, part| current.as_table()?.get(part))
}

/// Formats a TOML value for display.
pub fn format_toml_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Integer(i) => i.to_string(),
        toml::Value::Float(f) => f.to_string(),
        toml::Value::Boolean(b) => b.to_string(),
        toml::Value::Datetime(dt) => dt.to_string(),
        toml::Value::Array(_) | toml::Value::Table(_) => {
            toml::to_string_pretty(value).unwrap_or_else(|_| format!("{value:?}"))
        }
    }
}
