//! Application layer errors.
//!
//! These errors represent failures in orchestration, not blueprint rules.
//! Blueprint rule violations are `SpecificationError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::EntryError;
use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    /// A filesystem adapter call failed, already classified.
    #[error("Filesystem error at {path}: {cause}")]
    Filesystem { path: PathBuf, cause: EntryError },

    /// The root directory cannot host the tree.
    #[error("Root {path} is unavailable: {reason}")]
    RootUnavailable { path: PathBuf, reason: String },

    #[error("Blueprint not found: {name}")]
    BlueprintNotFound { name: String },

    /// Store access failed (lock poisoned).
    #[error("Blueprint store error")]
    StoreLockError,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Filesystem { path, cause } => match cause {
                EntryError::Permission { .. } => vec![
                    format!("Check write permissions on {}", path.display()),
                ],
                _ => vec![format!("Failed to access: {}", path.display())],
            },
            Self::RootUnavailable { path, .. } => vec![
                format!("Make sure {} is a directory or does not exist yet", path.display()),
                "Pass a different ROOT argument".into(),
            ],
            Self::BlueprintNotFound { name } => vec![
                format!("No blueprint named '{}'", name),
                "Try: arbor list to see available blueprints".into(),
                "Or pass a path to a .tree or .toml file".into(),
            ],
            Self::StoreLockError => vec![
                "The blueprint store is locked".into(),
                "Try again in a moment".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Filesystem { .. } | Self::RootUnavailable { .. } => ErrorCategory::Filesystem,
            Self::BlueprintNotFound { .. } => ErrorCategory::NotFound,
            Self::StoreLockError => ErrorCategory::Internal,
        }
    }
}
