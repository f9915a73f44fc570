//! `arbor check`: validate a blueprint without touching the disk.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::instrument;

use arbor_core::domain::{DomainValidator, PathSet, Platform};
use arbor_core::error::ArborError;

use crate::{
    cli::{CheckArgs, OutputFormat},
    commands::resolve_blueprint,
    config::AppConfig,
    error::{CliError, CliResult, FailedEntry},
    output::OutputManager,
};

#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    blueprint: Option<&'a str>,
    platform: Platform,
    entries: usize,
    violations: &'a [FailedEntry],
}

#[instrument(skip_all, fields(blueprint = %args.blueprint))]
pub fn execute(args: CheckArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let blueprint = resolve_blueprint(&args.blueprint, &config)?;
    let platform = match args.platform {
        Some(flag) => flag.into(),
        None => config.platform().map_err(|message| CliError::ConfigError {
            message: format!("defaults.platform: {message}"),
            source: None,
        })?,
    };
    let root = args.root.unwrap_or_else(|| PathBuf::from("."));

    let violations = check(&blueprint, &root, platform)?;

    if output.format() == OutputFormat::Json {
        output.json(&CheckReport {
            blueprint: blueprint.name(),
            platform,
            entries: blueprint.len(),
            violations: &violations,
        })?;
    } else if violations.is_empty() {
        output.success(&format!(
            "{} is valid for {platform} ({} entries)",
            blueprint.name().unwrap_or("blueprint"),
            blueprint.len()
        ))?;
    }

    if violations.is_empty() {
        return Ok(());
    }
    Err(CliError::EntriesFailed {
        failed: violations.len(),
        total: blueprint.len(),
        status: "naming check",
        entries: violations,
    })
}

/// Structural validation first (fatal), then per-entry naming rules.
fn check(blueprint: &PathSet, root: &Path, platform: Platform) -> CliResult<Vec<FailedEntry>> {
    DomainValidator::validate_path_set(blueprint).map_err(ArborError::from)?;

    Ok(DomainValidator::naming_violations(blueprint, root, platform)
        .into_iter()
        .map(|(entry, err)| FailedEntry {
            path: entry.relative_path.to_string(),
            kind: err.kind_name(),
            detail: err.detail().to_string(),
        })
        .collect())
}
