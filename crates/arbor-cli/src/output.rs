//! Output management and formatting.

use std::io::{self, IsTerminal};

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;

use arbor_core::application::ports::{MaterializeObserver, Phase};
use arbor_core::domain::{EntryAction, EntryReport, MaterializationResult};

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Manages CLI output based on configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        // The flag wins over `output.format`; Auto then resolves to Human
        // (TTY) or Plain (piped/redirected).
        let requested = match args.output_format {
            OutputFormat::Auto => config.output_format(),
            explicit => explicit,
        };
        let resolved_format = if requested == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            requested
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
        }
    }

    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2713} {msg}") // ✓
        } else {
            format!("{} {}", "\u{2713}".green().bold(), msg.green())
        };
        self.term.write_line(&line)
    }

    /// Error indicator: `✗ <msg>`.  *Not* suppressed in quiet mode.
    pub fn error(&self, msg: &str) -> io::Result<()> {
        let line = if self.no_color {
            format!("\u{2717} {msg}") // ✗
        } else {
            format!("{} {}", "\u{2717}".red().bold(), msg.red())
        };
        self.term.write_line(&line)
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{26a0} {msg}") // ⚠
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        self.term.write_line(&line)
    }

    /// Informational indicator: `ℹ <msg>`.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2139} {msg}") // ℹ
        } else {
            format!("{} {}", "\u{2139}".blue().bold(), msg.blue())
        };
        self.term.write_line(&line)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// Pretty JSON on stdout.  Written even in quiet mode: a caller who asked
    /// for JSON is parsing it.
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> io::Result<()> {
        let rendered = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.term.write_line(&rendered)
    }

    /// Counts for a finished run.
    pub fn summary(&self, result: &MaterializationResult) -> io::Result<()> {
        if result.is_dry_run() {
            self.info(&format!(
                "Dry run: nothing was written under {}",
                result.root_path().display()
            ))?;
        }
        if result.root_created() {
            let verb = if result.is_dry_run() { "would be created" } else { "created" };
            self.print(&format!("  root {verb}: {}", result.root_path().display()))?;
        }

        let rows = [
            ("created", result.created_count() - result.overwritten_count()),
            ("overwritten", result.overwritten_count()),
            ("skipped", result.skipped_count()),
            ("failed", result.failed_count()),
            ("not attempted", result.not_attempted_count()),
        ];
        for (label, count) in rows {
            if count > 0 || label == "created" {
                self.print(&format!("  {label:<14}{count}"))?;
            }
        }
        if result.failed_count() > 0 {
            self.error(&format!("{} entries failed", result.failed_count()))?;
        }

        if result.is_success() {
            let msg = if result.is_dry_run() {
                "Blueprint can be applied"
            } else {
                "Tree is in place"
            };
            self.success(msg)?;
        }
        Ok(())
    }

    /// Progress observer for a run over `total` entries.
    ///
    /// Hidden unless output is human-readable and stderr is a terminal.
    pub fn progress(&self, total: usize) -> ProgressObserver {
        let visible = !self.quiet
            && self.resolved_format == OutputFormat::Human
            && io::stderr().is_terminal();
        if !visible {
            return ProgressObserver::hidden();
        }
        ProgressObserver::new(total as u64, self.supports_color())
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// `true` if ANSI colours are enabled.
    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    /// `true` if quiet mode suppresses most output.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// The resolved (non-Auto) output format.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }
}

// ── progress ──────────────────────────────────────────────────────────────────

/// Draws an indicatif bar on stderr while the materializer runs.
pub struct ProgressObserver {
    bar: ProgressBar,
}

impl ProgressObserver {
    fn new(total: u64, color: bool) -> Self {
        let template = if color {
            "{spinner:.green} {msg:<12} [{bar:40.cyan/blue}] {pos}/{len}"
        } else {
            "{spinner} {msg:<12} [{bar:40}] {pos}/{len}"
        };
        let style = ProgressStyle::with_template(template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");

        let bar = ProgressBar::new(total);
        bar.set_style(style);
        Self { bar }
    }

    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Entries reported so far.
    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl MaterializeObserver for ProgressObserver {
    fn phase_changed(&self, phase: Phase) {
        match phase {
            Phase::Completed | Phase::Rejected => self.bar.finish_and_clear(),
            other => self.bar.set_message(other.to_string()),
        }
    }

    fn entry_finished(&self, report: &EntryReport) {
        if let EntryAction::Failed(err) = &report.action {
            self.bar.suspend(|| {
                tracing::debug!(path = %report.path, kind = err.kind_name(), "entry failed")
            });
        }
        self.bar.inc(1);
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
