//! Subcommand handlers, one module per subcommand.
//!
//! Helpers shared by several handlers (blueprint lookup, confirmation) live
//! here so each handler stays a thin translation from flags to core calls.

pub mod apply;
pub mod check;
pub mod completions;
pub mod config;
pub mod init;
pub mod list;
pub mod show;

use std::io::{self, Write};
use std::path::Path;

use tracing::{debug, warn};

use arbor_adapters::{InMemoryBlueprintStore, blueprint_loader, load_dir, load_file};
use arbor_core::application::BlueprintService;
use arbor_core::domain::PathSet;

use crate::config::AppConfig;
use crate::error::{CliError, CliResult};

/// Built-in blueprints plus every valid file under `blueprints.local_path`.
///
/// A local blueprint with the same name as a built-in replaces it.
pub(crate) fn blueprint_service(config: &AppConfig) -> CliResult<BlueprintService> {
    let service = BlueprintService::new(Box::new(InMemoryBlueprintStore::with_builtin()?));

    if let Some(dir) = &config.blueprints.local_path {
        match load_dir(dir) {
            Ok(found) => {
                debug!(dir = %dir.display(), count = found.len(), "loaded local blueprints");
                for blueprint in found {
                    service.save(blueprint)?;
                }
            }
            Err(e) => warn!(error = %e, "blueprints.local_path is unusable, ignoring it"),
        }
    }

    Ok(service)
}

/// Resolve a BLUEPRINT argument: a file path, or a name in the catalogue.
pub(crate) fn resolve_blueprint(spec: &str, config: &AppConfig) -> CliResult<PathSet> {
    let path = Path::new(spec);
    if looks_like_path(spec, path) {
        debug!(path = %path.display(), "loading blueprint file");
        return Ok(load_file(path)?);
    }
    Ok(blueprint_service(config)?.get(spec)?)
}

fn looks_like_path(spec: &str, path: &Path) -> bool {
    spec.contains('/')
        || spec.contains('\\')
        || blueprint_loader::is_blueprint_file(path)
        || path.is_file()
}

/// Ask a yes/no question; the default answer is no.
pub(crate) fn confirm(prompt: &str) -> CliResult<bool> {
    #[cfg(feature = "interactive")]
    if io::IsTerminal::is_terminal(&io::stdin()) && io::IsTerminal::is_terminal(&io::stderr()) {
        return dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| CliError::InvalidInput {
                message: "failed to read confirmation".into(),
                source: Some(Box::new(e)),
            });
    }

    eprint!("{prompt} [y/N] ");
    io::stderr().flush().map_err(|e| CliError::IoError {
        message: "failed to flush stderr".into(),
        source: e,
    })?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: e,
        })?;

    Ok(is_yes(&input))
}

fn is_yes(input: &str) -> bool {
    matches!(input.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
