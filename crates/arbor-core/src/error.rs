//! Unified error handling for Arbor Core.
//!
//! Wraps domain and application errors behind one type with user-actionable
//! suggestions, so the CLI only has to know about `ArborError`.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::SpecificationError;

/// Root error type for Arbor Core operations.
#[derive(Debug, Error, Clone)]
pub enum ArborError {
    /// The blueprint itself is invalid. Nothing was touched.
    #[error("Invalid blueprint: {0}")]
    Specification(#[from] SpecificationError),

    /// Errors from the application layer (orchestration failures).
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl ArborError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Specification(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check your setup and try again".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in Arbor".into(),
                "Please report it with the output of `arbor -vvv`".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Specification(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Source => ErrorCategory::Validation,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Filesystem,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type ArborResult<T> = Result<T, ArborError>;
