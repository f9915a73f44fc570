// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Arbor.
//!
//! This module contains the blueprint model with ZERO I/O. Everything that
//! touches a disk goes through the ports defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **No external crates**: Only std library + thiserror + serde derives
//! - **Immutable entities**: A `PathSet` is finished once built
//!
// Public API - what the world sees
pub mod entities;
pub mod error;
pub mod naming;

// Private implementation details - not visible outside domain
mod validation;

// Re-exports for convenience
pub use entities::{
    common::RelativePath,
    outcome::{EntryAction, EntryError, EntryReport, MaterializationResult, RunStatus},
    path_set::{EntryKind, PathEntry, PathSet},
};

pub use error::{ErrorCategory, SpecificationError};
pub use naming::Platform;
pub use validation::DomainValidator;
