//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `ARBOR_<SECTION>__<KEY>`, e.g.
//!    `ARBOR_DEFAULTS__ROOT=/srv/projects`
//! 3. Config file (`--config FILE`, else the platform config dir)
//! 4. Built-in defaults (always present)

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use arbor_core::domain::Platform;

use crate::cli::global::OutputFormat;

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Defaults for `arbor apply` and `arbor check`.
    pub defaults: Defaults,
    pub output: OutputConfig,
    /// Where to find user blueprints.
    pub blueprints: BlueprintConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Parent directory for `arbor apply` when no ROOT is given.
    pub root: PathBuf,
    /// `native`, `unix` or `windows`.
    pub platform: String,
    pub overwrite: bool,
    pub fail_fast: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            platform: "native".into(),
            overwrite: false,
            fail_fast: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// `auto`, `human`, `plain` or `json`.  `--output-format` wins.
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlueprintConfig {
    /// Directory scanned for `.tree` and `.toml` blueprints.
    pub local_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Also write logs to this file.
    pub file: Option<PathBuf>,
}

/// Every key accepted by `arbor config get` / `set`.
pub const KEYS: &[&str] = &[
    "defaults.root",
    "defaults.platform",
    "defaults.overwrite",
    "defaults.fail_fast",
    "output.no_color",
    "output.format",
    "blueprints.local_path",
    "logging.file",
];

impl AppConfig {
    /// Load configuration: defaults, then the file, then `ARBOR_*` env vars.
    ///
    /// `config_file` is the path the user passed via `--config` (or `None` to
    /// use the default location).  A missing file is not an error.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let path = Self::active_path(config_file);
        if config_file.is_some() && !path.exists() {
            warn!(path = %path.display(), "config file does not exist, using defaults");
        }
        debug!(path = %path.display(), "loading configuration");

        let config: Self = Config::builder()
            .add_source(
                Config::try_from(&Self::default())
                    .context("Failed to build default configuration")?,
            )
            .add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix("ARBOR")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?
            .try_deserialize()
            .context("Configuration has invalid values")?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values serde accepts but the CLI cannot use.
    fn validate(&self) -> anyhow::Result<()> {
        self.platform()
            .map_err(|e| anyhow::anyhow!("defaults.platform: {e}"))?;
        parse_output_format(&self.output.format)
            .map_err(|e| anyhow::anyhow!("output.format: {e}"))?;
        Ok(())
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.arbor.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "arbor", "arbor")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".arbor.toml"))
    }

    /// The file `--config` points at, else [`Self::config_path`].
    pub fn active_path(config_file: Option<&PathBuf>) -> PathBuf {
        config_file.cloned().unwrap_or_else(Self::config_path)
    }

    /// Naming rules from `defaults.platform`.
    pub fn platform(&self) -> Result<Platform, String> {
        self.defaults.platform.parse()
    }

    /// `output.format` as a flag value.
    pub fn output_format(&self) -> OutputFormat {
        parse_output_format(&self.output.format).unwrap_or_default()
    }

    /// Read one dotted key as a display string.
    pub fn get(&self, key: &str) -> Result<String, String> {
        let value = match key {
            "defaults.root" => self.defaults.root.display().to_string(),
            "defaults.platform" => self.defaults.platform.clone(),
            "defaults.overwrite" => self.defaults.overwrite.to_string(),
            "defaults.fail_fast" => self.defaults.fail_fast.to_string(),
            "output.no_color" => self.output.no_color.to_string(),
            "output.format" => self.output.format.clone(),
            "blueprints.local_path" => display_opt(self.blueprints.local_path.as_deref()),
            "logging.file" => display_opt(self.logging.file.as_deref()),
            _ => return Err(unknown_key(key)),
        };
        Ok(value)
    }

    /// Set one dotted key from its string form.
    ///
    /// An empty value clears optional keys.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "defaults.root" => self.defaults.root = PathBuf::from(value),
            "defaults.platform" => {
                value.parse::<Platform>()?;
                self.defaults.platform = value.to_ascii_lowercase();
            }
            "defaults.overwrite" => self.defaults.overwrite = parse_bool(key, value)?,
            "defaults.fail_fast" => self.defaults.fail_fast = parse_bool(key, value)?,
            "output.no_color" => self.output.no_color = parse_bool(key, value)?,
            "output.format" => {
                parse_output_format(value)?;
                self.output.format = value.to_ascii_lowercase();
            }
            "blueprints.local_path" => self.blueprints.local_path = path_opt(value),
            "logging.file" => self.logging.file = path_opt(value),
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }

    /// Render as pretty TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Write to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let rendered = self.to_toml().context("Failed to serialise configuration")?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, rendered).with_context(|| format!("Failed to write {}", path.display()))
    }
}

fn parse_output_format(raw: &str) -> Result<OutputFormat, String> {
    match raw.to_ascii_lowercase().as_str() {
        "auto" => Ok(OutputFormat::Auto),
        "human" => Ok(OutputFormat::Human),
        "plain" => Ok(OutputFormat::Plain),
        "json" => Ok(OutputFormat::Json),
        other => Err(format!(
            "unknown output format '{other}'; expected one of: auto, human, plain, json"
        )),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, String> {
    value
        .parse()
        .map_err(|_| format!("{key} expects true or false, got '{value}'"))
}

fn path_opt(value: &str) -> Option<PathBuf> {
    (!value.is_empty()).then(|| PathBuf::from(value))
}

fn display_opt(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string()).unwrap_or_default()
}

fn unknown_key(key: &str) -> String {
    format!("Unknown config key '{key}'; known keys: {}", KEYS.join(", "))
}
