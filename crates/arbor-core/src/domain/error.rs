// ============================================================================
// domain/error.rs - BLUEPRINT SPECIFICATION ERRORS
// ============================================================================

use thiserror::Error;

/// A blueprint that must not be materialized.
///
/// These are pre-flight errors: they are detected before any filesystem call
/// and always reject the whole run.
///
/// All errors are:
/// - Cloneable (results can be cached and re-reported)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpecificationError {
    // ========================================================================
    // Path shape
    // ========================================================================
    #[error("Blueprint contains an entry with an empty path")]
    EmptyPath,

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePath { path: String },

    #[error("Path escapes the root via '..': {path}")]
    ParentTraversal { path: String },

    #[error("Path contains an empty segment: {path}")]
    EmptySegment { path: String },

    #[error("Invalid segment '{segment}' in {path}: {reason}")]
    InvalidSegment {
        path: String,
        segment: String,
        reason: String,
    },

    // ========================================================================
    // Blueprint consistency
    // ========================================================================
    #[error("Duplicate {kind} entry in blueprint: {path}")]
    DuplicateEntry { path: String, kind: String },

    #[error("Path declared as both file and directory: {path}")]
    KindConflict { path: String },

    #[error("'{ancestor}' is declared as a file but is an ancestor of {path}")]
    AncestorIsFile { path: String, ancestor: String },

    // ========================================================================
    // Source
    // ========================================================================
    #[error("Invalid blueprint: {0}")]
    InvalidBlueprint(String),
}

impl SpecificationError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::AbsolutePath { path } => vec![
                format!("Make '{}' relative to the blueprint root", path),
                "Blueprint paths are always resolved under the target root".into(),
            ],
            Self::ParentTraversal { .. } => vec![
                "Remove '..' segments; entries must stay inside the root".into(),
            ],
            Self::EmptySegment { path } => vec![
                format!("Remove doubled or trailing separators in '{}'", path),
            ],
            Self::DuplicateEntry { path, .. } => {
                vec![format!("Remove the repeated entry for '{}'", path)]
            }
            Self::KindConflict { path } => vec![
                format!("Declare '{}' either as a file or as a directory", path),
            ],
            Self::AncestorIsFile { ancestor, .. } => vec![
                format!("'{}' has children, so it must be a directory", ancestor),
                "In .tree listings, directories end with '/'".into(),
            ],
            Self::InvalidBlueprint(_) => vec![
                "Check the blueprint syntax".into(),
                "Try: arbor show <BLUEPRINT> to see how it is read".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidBlueprint(_) => ErrorCategory::Source,
            _ => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Source,
}
