//! `arbor apply`: materialize a blueprint under a root directory.

use std::path::PathBuf;

use tracing::{info, instrument, warn};

use arbor_adapters::LocalFilesystem;
use arbor_core::application::{CancellationToken, MaterializeOptions, Materializer};
use arbor_core::domain::PathSet;

use crate::{
    cli::{ApplyArgs, OutputFormat},
    commands::{confirm, resolve_blueprint},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Fallback directory name for blueprints loaded without a name.
const UNNAMED_ROOT: &str = "arbor-tree";

#[instrument(skip_all, fields(blueprint = %args.blueprint, dry_run = args.dry_run))]
pub fn execute(args: ApplyArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let blueprint = resolve_blueprint(&args.blueprint, &config)?;
    let options = build_options(&args, &config)?;
    let root = resolve_root(args.root.clone(), &blueprint, &config);

    let destructive = options.overwrite_existing_files && !options.dry_run;
    if destructive && !args.yes && !output.is_quiet() {
        let prompt = format!(
            "Existing files under {} will be truncated to empty. Continue?",
            root.display()
        );
        if !confirm(&prompt)? {
            return Err(CliError::Cancelled);
        }
    }

    if output.format() != OutputFormat::Json {
        let verb = if options.dry_run { "Checking" } else { "Applying" };
        output.header(&format!(
            "{verb} {} ({} entries) at {}",
            blueprint.name().unwrap_or(UNNAMED_ROOT),
            blueprint.len(),
            root.display()
        ))?;
    }

    let token = CancellationToken::new();
    cancel_on_interrupt(&token);
    let materializer =
        Materializer::new(Box::new(LocalFilesystem::new())).with_cancellation(token);
    let progress = output.progress(blueprint.len());
    let result = materializer.materialize_with(&blueprint, &root, &options, &progress)?;

    info!(
        created = result.created_count(),
        skipped = result.skipped_count(),
        failed = result.failed_count(),
        "run finished"
    );

    if output.format() == OutputFormat::Json {
        output.json(&result)?;
    } else {
        output.summary(&result)?;
    }

    match CliError::from_result(&result) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Ctrl-C stops the run between entries; the partial result is still reported.
fn cancel_on_interrupt(token: &CancellationToken) {
    let token = token.clone();
    if let Err(e) = ctrlc::set_handler(move || token.cancel()) {
        warn!(error = %e, "Could not install Ctrl-C handler");
    }
}

/// Flags win over `[defaults]`.
fn build_options(args: &ApplyArgs, config: &AppConfig) -> CliResult<MaterializeOptions> {
    let platform = match args.platform {
        Some(flag) => flag.into(),
        None => config.platform().map_err(|message| CliError::ConfigError {
            message: format!("defaults.platform: {message}"),
            source: None,
        })?,
    };

    Ok(MaterializeOptions {
        dry_run: args.dry_run,
        overwrite_existing_files: toggle(
            args.overwrite,
            args.no_overwrite,
            config.defaults.overwrite,
        ),
        stop_on_first_error: toggle(
            args.fail_fast,
            args.no_fail_fast,
            config.defaults.fail_fast,
        ),
        platform,
    })
}

/// `--flag` / `--no-flag` pair over a configured default.
fn toggle(on: bool, off: bool, default: bool) -> bool {
    match (on, off) {
        (true, _) => true,
        (_, true) => false,
        _ => default,
    }
}

/// ROOT if given, else `<defaults.root>/<blueprint name>`.
fn resolve_root(explicit: Option<PathBuf>, blueprint: &PathSet, config: &AppConfig) -> PathBuf {
    explicit.unwrap_or_else(|| {
        config
            .defaults
            .root
            .join(blueprint.name().unwrap_or(UNNAMED_ROOT))
    })
}
