//! Infrastructure adapters for Arbor.
//!
//! This crate implements the ports defined in `arbor-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod blueprint_loader;
pub mod blueprint_store;
pub mod builtin_blueprints;
pub mod filesystem;

// Re-export commonly used adapters
pub use blueprint_loader::{LoadError, load_dir, load_file};
pub use blueprint_store::InMemoryBlueprintStore;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
