//! `arbor show`: print the entries of a blueprint in materialization order.

use arbor_core::domain::{PathEntry, PathSet};

use crate::{
    cli::{OutputFormat, ShowArgs},
    commands::resolve_blueprint,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ShowArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let blueprint = resolve_blueprint(&args.blueprint, &config)?;

    if output.format() == OutputFormat::Json {
        let entries: Vec<&PathEntry> = ordered(&blueprint).collect();
        output.json(&serde_json::json!({
            "name": blueprint.name(),
            "description": blueprint.description(),
            "entries": entries,
        }))?;
        return Ok(());
    }

    if let Some(name) = blueprint.name() {
        output.header(name)?;
    }
    if let Some(description) = blueprint.description() {
        output.print(description)?;
    }
    for entry in ordered(&blueprint) {
        output.print(&entry.to_string())?;
    }
    Ok(())
}

/// Directories first, then files, each in declaration order.
fn ordered(blueprint: &PathSet) -> impl Iterator<Item = &PathEntry> + '_ {
    blueprint.directories().chain(blueprint.files())
}
