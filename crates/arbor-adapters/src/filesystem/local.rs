//! Local filesystem adapter using std::fs.

use std::fs::{self, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::Path;

use arbor_core::{
    application::{
        ApplicationError,
        ports::{Filesystem, PathState},
    },
    domain::{EntryError, Platform},
    error::{ArborError, ArborResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn probe(&self, path: &Path) -> ArborResult<PathState> {
        match fs::symlink_metadata(path) {
            Ok(meta) if meta.file_type().is_symlink() => Ok(PathState::Symlink),
            Ok(meta) if meta.is_dir() => Ok(PathState::Directory),
            Ok(meta) if meta.is_file() => Ok(PathState::File),
            Ok(_) => Ok(PathState::Other),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(PathState::Missing),
            Err(e) => Err(map_io_error(path, e, "inspect")),
        }
    }

    fn create_dir_all(&self, path: &Path) -> ArborResult<()> {
        fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn create_empty_file(&self, path: &Path, truncate: bool) -> ArborResult<()> {
        let mut options = OpenOptions::new();
        options.write(true);

        if truncate {
            // Only a regular file is ever truncated; a link swapped in since
            // the probe is refused instead of followed.
            let meta =
                fs::symlink_metadata(path).map_err(|e| map_io_error(path, e, "inspect"))?;
            if !meta.is_file() {
                return Err(ApplicationError::Filesystem {
                    path: path.to_path_buf(),
                    cause: EntryError::conflict(format!(
                        "{} is no longer a regular file",
                        path.display()
                    )),
                }
                .into());
            }
            options.truncate(true);
        } else {
            // create_new refuses existing paths, dangling symlinks included.
            options.create_new(true);
        }

        options
            .open(path)
            .map(drop)
            .map_err(|e| map_io_error(path, e, "create file"))
    }
}

/// Classify an I/O failure on `path` into the per-entry taxonomy.
pub fn classify_io_error(path: &Path, err: &io::Error) -> EntryError {
    let detail = err.to_string();
    match err.kind() {
        ErrorKind::PermissionDenied | ErrorKind::ReadOnlyFilesystem => {
            EntryError::Permission { detail }
        }
        ErrorKind::AlreadyExists | ErrorKind::NotADirectory | ErrorKind::IsADirectory => {
            EntryError::Conflict { detail }
        }
        ErrorKind::InvalidFilename if Platform::current().path_exceeds_limit(path) => {
            EntryError::PathTooLong { detail }
        }
        ErrorKind::InvalidFilename | ErrorKind::InvalidInput => EntryError::InvalidName { detail },
        _ => EntryError::Io { detail },
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> ArborError {
    let cause = classify_io_error(path, &e);
    tracing::trace!(path = %path.display(), error = %e, "Failed to {}", operation);

    ApplicationError::Filesystem {
        path: path.to_path_buf(),
        cause,
    }
    .into()
}
