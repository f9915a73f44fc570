//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use arbor_core::domain::Platform;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "arbor",
    bin_name = "arbor",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{1f333} Declarative project tree materialization",
    long_about = "Arbor creates the directories and empty files declared in a \
                  blueprint under a root directory. Existing entries are left \
                  alone, so re-running a blueprint is always safe.",
    after_help = "EXAMPLES:\n\
        \x20 arbor apply moviestream ./moviestream-app\n\
        \x20 arbor apply ./layout.tree ./out --dry-run\n\
        \x20 arbor check ./layout.toml --platform windows\n\
        \x20 arbor completions bash > /usr/share/bash-completion/completions/arbor",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Materialize a blueprint under a root directory.
    #[command(
        visible_alias = "a",
        about = "Create the tree declared by a blueprint",
        after_help = "EXAMPLES:\n\
            \x20 arbor apply moviestream\n\
            \x20 arbor apply moviestream ./app --dry-run\n\
            \x20 arbor apply ./layout.tree ./out --overwrite --yes\n\
            \x20 arbor apply ./layout.toml ./out --fail-fast --output-format json"
    )]
    Apply(ApplyArgs),

    /// Validate a blueprint without touching the disk.
    #[command(
        visible_alias = "c",
        about = "Validate a blueprint and its names",
        after_help = "EXAMPLES:\n\
            \x20 arbor check moviestream\n\
            \x20 arbor check ./layout.tree --platform windows"
    )]
    Check(CheckArgs),

    /// Print the entries of a blueprint.
    #[command(
        about = "Show the entries of a blueprint",
        after_help = "EXAMPLES:\n\
            \x20 arbor show moviestream\n\
            \x20 arbor show ./layout.toml --output-format json"
    )]
    Show(ShowArgs),

    /// List available blueprints.
    #[command(
        visible_alias = "ls",
        about = "List available blueprints",
        after_help = "EXAMPLES:\n\
            \x20 arbor list\n\
            \x20 arbor list --format json"
    )]
    List(ListArgs),

    /// Initialise an Arbor configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 arbor init\n\
            \x20 arbor init --force"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 arbor completions bash > ~/.local/share/bash-completion/completions/arbor\n\
            \x20 arbor completions zsh  > ~/.zfunc/_arbor\n\
            \x20 arbor completions fish > ~/.config/fish/completions/arbor.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the Arbor configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 arbor config get defaults.root\n\
            \x20 arbor config set defaults.platform windows\n\
            \x20 arbor config list"
    )]
    Config(ConfigCommands),
}

// ── apply ─────────────────────────────────────────────────────────────────────

/// Arguments for `arbor apply`.
#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Blueprint name, or a path to a `.tree` / `.toml` file.
    #[arg(value_name = "BLUEPRINT", help = "Blueprint name or file")]
    pub blueprint: String,

    /// Directory to build the tree under.  Defaults to
    /// `<defaults.root>/<blueprint name>`.
    #[arg(value_name = "ROOT", help = "Root directory (created if missing)")]
    pub root: Option<PathBuf>,

    /// Classify every entry without writing anything.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,

    /// Truncate existing files to empty.
    #[arg(
        long = "overwrite",
        overrides_with = "no_overwrite",
        help = "Truncate files that already exist"
    )]
    pub overwrite: bool,

    /// Keep existing files even if `defaults.overwrite` is set.
    #[arg(
        long = "no-overwrite",
        overrides_with = "overwrite",
        help = "Keep existing files (overrides config)"
    )]
    pub no_overwrite: bool,

    /// Stop at the first failed entry.
    #[arg(
        long = "fail-fast",
        overrides_with = "no_fail_fast",
        help = "Stop at the first failed entry"
    )]
    pub fail_fast: bool,

    #[arg(
        long = "no-fail-fast",
        overrides_with = "fail_fast",
        help = "Attempt every entry (overrides config)"
    )]
    pub no_fail_fast: bool,

    #[arg(
        long = "platform",
        value_enum,
        value_name = "PLATFORM",
        help = "Naming rules to enforce (default: from config, else native)"
    )]
    pub platform: Option<PlatformArg>,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long = "yes", help = "Skip confirmation prompts")]
    pub yes: bool,
}

// ── check ─────────────────────────────────────────────────────────────────────

/// Arguments for `arbor check`.
#[derive(Debug, Args)]
pub struct CheckArgs {
    #[arg(value_name = "BLUEPRINT", help = "Blueprint name or file")]
    pub blueprint: String,

    #[arg(
        long = "platform",
        value_enum,
        value_name = "PLATFORM",
        help = "Naming rules to enforce (default: from config, else native)"
    )]
    pub platform: Option<PlatformArg>,

    /// Root used for full-path length limits.
    #[arg(
        long = "root",
        value_name = "DIR",
        help = "Root to measure path lengths against (default: current directory)"
    )]
    pub root: Option<PathBuf>,
}

// ── show ──────────────────────────────────────────────────────────────────────

/// Arguments for `arbor show`.
#[derive(Debug, Args)]
pub struct ShowArgs {
    #[arg(value_name = "BLUEPRINT", help = "Blueprint name or file")]
    pub blueprint: String,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `arbor list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
    /// CSV rows.
    Csv,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `arbor init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `arbor completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `arbor config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.root`.
        key: String,
    },
    /// Set a configuration key and write the config file.
    Set {
        /// Dotted key path.
        key: String,
        /// New value.
        value: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── value enums ───────────────────────────────────────────────────────────────

/// Naming rules selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum PlatformArg {
    /// Rules of the running OS.
    Native,
    #[value(alias = "linux", alias = "macos")]
    Unix,
    #[value(alias = "win")]
    Windows,
}

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Native => Platform::current(),
            PlatformArg::Unix => Platform::Unix,
            PlatformArg::Windows => Platform::Windows,
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn platform_arg_maps_to_core() {
        assert_eq!(Platform::from(PlatformArg::Unix), Platform::Unix);
        assert_eq!(Platform::from(PlatformArg::Windows), Platform::Windows);
        assert_eq!(Platform::from(PlatformArg::Native), Platform::current());
    }

    #[test]
    fn parse_apply_minimal() {
        let cli = Cli::try_parse_from(["arbor", "apply", "moviestream"]).unwrap();
        match cli.command {
            Commands::Apply(args) => {
                assert_eq!(args.blueprint, "moviestream");
                assert!(args.root.is_none());
                assert!(!args.dry_run);
                assert!(!args.overwrite);
                assert!(args.platform.is_none());
            }
            other => panic!("expected Apply, got {other:?}"),
        }
    }

    #[test]
    fn parse_apply_full() {
        let cli = Cli::try_parse_from([
            "arbor",
            "apply",
            "./layout.tree",
            "out",
            "--dry-run",
            "--overwrite",
            "--fail-fast",
            "--platform",
            "win",
            "-y",
        ])
        .unwrap();
        match cli.command {
            Commands::Apply(args) => {
                assert_eq!(args.root, Some(PathBuf::from("out")));
                assert!(args.dry_run && args.overwrite && args.fail_fast && args.yes);
                assert_eq!(args.platform, Some(PlatformArg::Windows));
            }
            other => panic!("expected Apply, got {other:?}"),
        }
    }

    #[test]
    fn parse_apply_last_overwrite_flag_wins() {
        let cli =
            Cli::try_parse_from(["arbor", "apply", "x", "--overwrite", "--no-overwrite"]).unwrap();
        match cli.command {
            Commands::Apply(args) => assert!(!args.overwrite && args.no_overwrite),
            other => panic!("expected Apply, got {other:?}"),
        }

        let cli =
            Cli::try_parse_from(["arbor", "apply", "x", "--no-fail-fast", "--fail-fast"]).unwrap();
        match cli.command {
            Commands::Apply(args) => assert!(args.fail_fast && !args.no_fail_fast),
            other => panic!("expected Apply, got {other:?}"),
        }
    }

    #[test]
    fn parse_alias_a_for_apply() {
        let cli = Cli::try_parse_from(["arbor", "a", "moviestream"]).unwrap();
        assert!(matches!(cli.command, Commands::Apply(_)));
    }

    #[test]
    fn parse_check_with_root() {
        let cli =
            Cli::try_parse_from(["arbor", "check", "x.tree", "--root", "/tmp/out"]).unwrap();
        match cli.command {
            Commands::Check(args) => assert_eq!(args.root, Some(PathBuf::from("/tmp/out"))),
            other => panic!("expected Check, got {other:?}"),
        }
    }

    #[test]
    fn parse_list_format_json() {
        let cli = Cli::try_parse_from(["arbor", "ls", "--format", "json"]).unwrap();
        match cli.command {
            Commands::List(args) => assert_eq!(args.format, ListFormat::Json),
            other => panic!("expected List, got {other:?}"),
        }
    }

    #[test]
    fn parse_config_set() {
        let cli = Cli::try_parse_from(["arbor", "config", "set", "defaults.root", "/srv"]).unwrap();
        match cli.command {
            Commands::Config(ConfigCommands::Set { key, value }) => {
                assert_eq!(key, "defaults.root");
                assert_eq!(value, "/srv");
            }
            other => panic!("expected Config Set, got {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["arbor", "show", "moviestream", "-vv", "--no-color"]).unwrap();
        assert_eq!(cli.global.verbose, 2);
        assert!(cli.global.no_color);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["arbor", "-q", "-v", "list"]).is_err());
    }

    #[test]
    fn unknown_platform_is_rejected() {
        assert!(Cli::try_parse_from(["arbor", "check", "x", "--platform", "beos"]).is_err());
    }
}
