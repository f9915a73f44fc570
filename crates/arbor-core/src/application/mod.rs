//! Application layer for Arbor.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (Materializer, BlueprintService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. Blueprint rules live in `crate::domain`.

pub mod cancel;
pub mod error;
pub mod ports;
pub mod services;

pub use services::{BlueprintInfo, BlueprintService, MaterializeOptions, Materializer};

// Re-export port traits (for adapter implementation)
pub use ports::{BlueprintStore, Filesystem, MaterializeObserver, PathState, Phase};

pub use cancel::CancellationToken;
pub use error::ApplicationError;
