//! `arbor config`: read and write configuration values.

use std::path::PathBuf;

use tracing::info;

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
///
/// `config` is the merged view (file + env); `set` edits the file alone so
/// environment overrides are never written back.
pub fn execute(
    cmd: ConfigCommands,
    config: AppConfig,
    config_file: Option<&PathBuf>,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = config.get(&key).map_err(config_error)?;
            output.print(&value)?;
        }

        ConfigCommands::Set { key, value } => {
            let path = AppConfig::active_path(config_file);
            let mut on_disk = read_file_only(&path)?;
            on_disk.set(&key, &value).map_err(config_error)?;
            on_disk.save(&path).map_err(|e| CliError::ConfigError {
                message: format!("{e:#}"),
                source: None,
            })?;
            info!(key = %key, path = %path.display(), "config updated");
            output.success(&format!("{key} = {value}"))?;
        }

        ConfigCommands::List => {
            output.header("Current Configuration:")?;
            let serialised = config.to_toml().map_err(|e| CliError::ConfigError {
                message: format!("Failed to serialise config: {e}"),
                source: Some(Box::new(e)),
            })?;
            output.print(&serialised)?;
        }

        ConfigCommands::Path => {
            output.print(&AppConfig::active_path(config_file).display().to_string())?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

/// The file's own values over defaults, without `ARBOR_*` overrides.
fn read_file_only(path: &std::path::Path) -> CliResult<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let raw = std::fs::read_to_string(path).map_err(|e| CliError::IoError {
        message: format!("Failed to read {}", path.display()),
        source: e,
    })?;
    toml::from_str(&raw).map_err(|e| CliError::ConfigError {
        message: format!("Failed to parse {}", path.display()),
        source: Some(Box::new(e)),
    })
}

fn config_error(message: String) -> CliError {
    CliError::ConfigError {
        message,
        source: None,
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
