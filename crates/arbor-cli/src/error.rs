//! Comprehensive error handling for Arbor CLI.
//!
//! Provides structured errors with:
//! - User-friendly messages
//! - Actionable suggestions
//! - Proper error chaining
//! - Exit code mapping

use std::error::Error;
use std::io;

use owo_colors::OwoColorize;
use serde::Serialize;
use thiserror::Error;

use arbor_adapters::LoadError;
use arbor_core::domain::{MaterializationResult, RunStatus};
use arbor_core::error::ArborError;

// Re-export so callers only need `use crate::error::*`.
pub use arbor_core::error::ErrorCategory as CoreCategory;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// One entry that could not be materialized, flattened for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedEntry {
    pub path: String,
    pub kind: &'static str,
    pub detail: String,
}

/// Comprehensive CLI error types.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input (validation failed).
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ── Config errors ──────────────────────────────────────────────────────
    /// A configuration file could not be read, parsed, or written.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ── Blueprint errors ───────────────────────────────────────────────────
    /// A blueprint file given on the command line could not be loaded.
    #[error("Could not load blueprint: {0}")]
    Load(#[from] LoadError),

    /// An error propagated from `arbor-core`.
    #[error("{0}")]
    Core(#[from] ArborError),

    /// The run finished, but some entries were not materialized.
    #[error("{failed} of {total} entries failed ({status})")]
    EntriesFailed {
        failed: usize,
        total: usize,
        status: &'static str,
        entries: Vec<FailedEntry>,
    },

    // ── System errors ──────────────────────────────────────────────────────
    /// An I/O operation failed.
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: io::Error,
    },

    /// Operation cancelled by user.
    #[error("Operation cancelled")]
    Cancelled,
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    /// Build [`CliError::EntriesFailed`] from a run that did not fully succeed.
    ///
    /// Returns `None` for a clean run.
    pub fn from_result(result: &MaterializationResult) -> Option<Self> {
        if result.is_success() {
            return None;
        }
        let status = match result.status() {
            RunStatus::Completed => return None,
            RunStatus::CompletedWithFailures => "completed with failures",
            RunStatus::Aborted => "aborted",
            RunStatus::Cancelled if result.failed_count() == 0 => return Some(Self::Cancelled),
            RunStatus::Cancelled => "cancelled",
        };
        let entries = result
            .failed_entries()
            .iter()
            .map(|(path, err)| FailedEntry {
                path: path.to_string(),
                kind: err.kind_name(),
                detail: err.detail().to_string(),
            })
            .collect();

        Some(Self::EntriesFailed {
            failed: result.failed_count(),
            total: result.reports().len() + result.not_attempted_count(),
            status,
            entries,
        })
    }

    /// Lines that identify what went wrong, printed before suggestions.
    pub fn details(&self) -> Vec<String> {
        match self {
            Self::EntriesFailed { entries, .. } => entries
                .iter()
                .map(|e| format!("{}: {}: {}", e.path, e.kind, e.detail))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { message, .. } => vec![
                format!("Check your input: {}", message),
                "Use --help for usage information".into(),
            ],

            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {}", message),
                "Run 'arbor config path' to see which file is read".into(),
                "Use 'arbor init --force' to write a fresh default config".into(),
            ],

            Self::Load(err) => match err {
                LoadError::Io { .. } => vec![
                    "Check that the blueprint file exists and is readable".into(),
                    "Use 'arbor list' to see blueprints available by name".into(),
                ],
                LoadError::Toml { .. } => vec![
                    "A .toml blueprint needs a [blueprint] table and [[entries]] with path and kind"
                        .into(),
                ],
                LoadError::Invalid { source, .. } => source.suggestions(),
                LoadError::UnsupportedFormat { .. } => vec![
                    "Blueprint files must end in .tree or .toml".into(),
                ],
            },

            Self::Core(core_err) => core_err.suggestions(),

            Self::EntriesFailed { .. } => vec![
                "Entries that already existed or were created are kept".into(),
                "Fix the paths listed above and run the same command again".into(),
                "Use --dry-run to preview the outcome without writing".into(),
            ],

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {}", message),
                "Check file permissions".into(),
                "Ensure the parent directory exists".into(),
            ],

            Self::Cancelled => vec![
                "Operation was cancelled".into(),
                "No changes were made".into(),
            ],
        }
    }

    /// Get the error category for styling and exit codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } => ErrorCategory::UserError,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Load(LoadError::Io { source, .. })
                if source.kind() == io::ErrorKind::NotFound =>
            {
                ErrorCategory::NotFound
            }
            Self::Load(_) => ErrorCategory::UserError,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Filesystem | CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::EntriesFailed { .. } => ErrorCategory::PartialFailure,
            Self::IoError { .. } => ErrorCategory::Internal,
            Self::Cancelled => ErrorCategory::UserError,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category        | Code |
    /// |-----------------|------|
    /// | User error      |  2   |
    /// | Not found       |  3   |
    /// | Configuration   |  4   |
    /// | Partial failure |  5   |
    /// | Internal        |  1   |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::PartialFailure => 5,
            ErrorCategory::Internal => 1,
        }
    }

    /// Format the error for display with colors and suggestions.
    pub fn format_colored(&self, verbose: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{} {}\n\n",
            "✗".red().bold(),
            "Error:".red().bold()
        ));

        output.push_str(&format!("  {}\n", self.to_string().red()));

        let details = self.details();
        if !details.is_empty() {
            output.push('\n');
            for line in details {
                output.push_str(&format!("  {} {}\n", "•".red(), line));
            }
        }

        // Error chain (if verbose)
        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                output.push_str(&format!(
                    "\n  {} {}\n",
                    "→".dimmed(),
                    err.to_string().dimmed()
                ));
                source = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in suggestions {
                output.push_str(&format!("  {}\n", suggestion));
            }
        }

        if !verbose {
            output.push('\n');
            output.push_str(&format!(
                "{} {}\n",
                "\u{2139}".blue(), // ℹ
                "Use -v / --verbose for more details.".dimmed(),
            ));
        }

        output
    }

    /// Plain-text version of [`Self::format_colored`], no ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = String::new();
        out.push_str(&format!("\nError: {}\n", self));

        let details = self.details();
        if !details.is_empty() {
            out.push('\n');
            for line in &details {
                out.push_str(&format!("  - {line}\n"));
            }
        }

        if verbose {
            let mut src = std::error::Error::source(self);
            while let Some(err) = src {
                out.push_str(&format!("  Caused by: {err}\n"));
                src = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for s in &suggestions {
                out.push_str(&format!("  {s}\n"));
            }
        }

        if !verbose {
            out.push_str("\nUse -v / --verbose for more details.\n");
        }

        out
    }

    /// Log the error using tracing.
    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError => tracing::warn!("User error: {}", self),
            ErrorCategory::NotFound => tracing::warn!("Not found: {}", self),
            ErrorCategory::PartialFailure => tracing::warn!("Partial failure: {}", self),
            ErrorCategory::Configuration => tracing::error!("Configuration error: {}", self),
            ErrorCategory::Internal => tracing::error!("Internal error: {}", self),
        }

        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }
}

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// User input error (validation, invalid arguments).
    UserError,
    /// Resource not found.
    NotFound,
    /// Configuration error.
    Configuration,
    /// The run finished but some entries failed.
    PartialFailure,
    /// Internal/system error.
    Internal,
}
