//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `arbor-adapters` crate provides implementations.

use std::fmt;
use std::path::Path;

use crate::domain::{EntryReport, PathSet};
use crate::error::ArborResult;

/// What currently occupies a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathState {
    Missing,
    Directory,
    File,
    /// A symbolic link, reported without following it. Never written through.
    Symlink,
    /// Anything else (socket, device, ...). Treated like a file for conflicts.
    Other,
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `arbor_adapters::filesystem::LocalFilesystem` (production)
/// - `arbor_adapters::filesystem::MemoryFilesystem` (testing)
///
/// ## Design Notes
///
/// - Exactly two mutating primitives; nothing is ever removed or written
/// - Failures surface as `ApplicationError::Filesystem` carrying a classified
///   `EntryError`, so the materializer never sees raw `io::Error`s
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Inspect a path. A symlink in the final position is reported as
    /// [`PathState::Symlink`], not as whatever it points at.
    fn probe(&self, path: &Path) -> ArborResult<PathState>;

    /// Create a directory and all missing parents. Existing directories are fine.
    fn create_dir_all(&self, path: &Path) -> ArborResult<()>;

    /// Ensure an empty file exists at `path`.
    ///
    /// With `truncate`, an existing file is emptied. Without it, the file must
    /// not exist yet; anything already at `path` is a conflict.
    fn create_empty_file(&self, path: &Path, truncate: bool) -> ArborResult<()>;
}

/// Port for blueprint storage and retrieval.
///
/// Implemented by:
/// - `arbor_adapters::blueprint_store::InMemoryBlueprintStore` (built-in + loaded)
pub trait BlueprintStore: Send + Sync {
    /// Get a blueprint by name.
    fn get(&self, name: &str) -> ArborResult<PathSet>;

    /// List all available blueprints, sorted by name.
    fn list(&self) -> ArborResult<Vec<PathSet>>;

    /// Insert or replace a blueprint under its name.
    fn insert(&self, blueprint: PathSet) -> ArborResult<()>;
}

/// Where a materializer run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Validating,
    /// Blueprint failed validation; terminal.
    Rejected,
    TraversingDirectories,
    TraversingFiles,
    Completed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Rejected => "rejected",
            Self::TraversingDirectories => "directories",
            Self::TraversingFiles => "files",
            Self::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// Progress callbacks for a materializer run.
///
/// Implemented by:
/// - the CLI progress bar
pub trait MaterializeObserver {
    fn phase_changed(&self, _phase: Phase) {}

    fn entry_finished(&self, _report: &EntryReport) {}
}

/// Observer that ignores everything.
impl MaterializeObserver for () {}
