//! Implementation of the `arbor list` command.

use arbor_core::application::BlueprintInfo;

use crate::{
    cli::{ListArgs, ListFormat},
    commands::blueprint_service,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ListArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let blueprints = blueprint_service(&config)?.list()?;

    match args.format {
        ListFormat::Table => {
            output.header("Available Blueprints:")?;
            for line in table_rows(&blueprints) {
                output.print(&line)?;
            }
            if blueprints.is_empty() {
                output.warning("No blueprints found")?;
            }
        }

        // JSON must stay parseable even in quiet mode.
        ListFormat::Json => output.json(&blueprints)?,

        ListFormat::List => {
            for info in &blueprints {
                output.print(&info.name)?;
            }
        }

        ListFormat::Csv => {
            for line in csv_rows(&blueprints) {
                output.print(&line)?;
            }
        }
    }

    Ok(())
}

fn table_rows(blueprints: &[BlueprintInfo]) -> Vec<String> {
    let width = blueprints
        .iter()
        .map(|info| info.name.len())
        .max()
        .unwrap_or(0);

    blueprints
        .iter()
        .map(|info| {
            let mut line = format!(
                "  {:<width$}  {:>3} dirs  {:>4} files",
                info.name, info.directories, info.files
            );
            if !info.description.is_empty() {
                line.push_str("  ");
                line.push_str(&info.description);
            }
            line
        })
        .collect()
}

fn csv_rows(blueprints: &[BlueprintInfo]) -> Vec<String> {
    std::iter::once("name,directories,files,description".to_string())
        .chain(blueprints.iter().map(|info| {
            format!(
                "{},{},{},{}",
                csv_field(&info.name),
                info.directories,
                info.files,
                csv_field(&info.description)
            )
        }))
        .collect()
}

/// Quote a field if it contains a separator, quote or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
