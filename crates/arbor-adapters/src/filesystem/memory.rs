//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use arbor_core::{
    application::{
        ApplicationError,
        ports::{Filesystem, PathState},
    },
    domain::EntryError,
    error::ArborResult,
};

/// In-memory filesystem for testing.
///
/// Clones share state, so a test can keep one handle while the materializer
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
    /// Paths under which every mutation is refused.
    read_only: BTreeSet<PathBuf>,
}

impl MemoryFilesystemInner {
    /// First strict ancestor of `path` that is a file, if any.
    fn file_ancestor<'p>(&self, path: &'p Path) -> Option<&'p Path> {
        path.ancestors()
            .skip(1)
            .find(|a| self.files.contains_key(*a))
    }

    fn is_read_only(&self, path: &Path) -> bool {
        self.read_only.iter().any(|p| path.starts_with(p))
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file with content, creating its parents (testing helper).
    pub fn write_file(&self, path: impl AsRef<Path>, content: &str) {
        if let Ok(mut inner) = self.inner.write() {
            let path = path.as_ref();
            for parent in path.ancestors().skip(1).filter(|p| !p.as_os_str().is_empty()) {
                inner.directories.insert(parent.to_path_buf());
            }
            inner.files.insert(path.to_path_buf(), content.to_string());
        }
    }

    /// Refuse every later mutation at or below `path`.
    pub fn set_read_only(&self, path: impl AsRef<Path>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.read_only.insert(path.as_ref().to_path_buf());
        }
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path.as_ref()).cloned()
    }

    pub fn is_dir(&self, path: impl AsRef<Path>) -> bool {
        self.inner
            .read()
            .map(|inner| inner.directories.contains(path.as_ref()))
            .unwrap_or(false)
    }

    pub fn is_file(&self, path: impl AsRef<Path>) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path.as_ref()))
            .unwrap_or(false)
    }

    /// All files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// All directories, sorted.
    pub fn list_directories(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.directories.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Clear all contents.
    pub fn clear(&self) {
        if let Ok(mut inner) = self.inner.write() {
            inner.files.clear();
            inner.directories.clear();
            inner.read_only.clear();
        }
    }
}

fn fs_error(path: &Path, cause: EntryError) -> arbor_core::error::ArborError {
    ApplicationError::Filesystem {
        path: path.to_path_buf(),
        cause,
    }
    .into()
}

impl Filesystem for MemoryFilesystem {
    fn probe(&self, path: &Path) -> ArborResult<PathState> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        if let Some(ancestor) = inner.file_ancestor(path) {
            return Err(fs_error(
                path,
                EntryError::conflict(format!("{} is a file", ancestor.display())),
            ));
        }

        Ok(if inner.directories.contains(path) {
            PathState::Directory
        } else if inner.files.contains_key(path) {
            PathState::File
        } else {
            PathState::Missing
        })
    }

    fn create_dir_all(&self, path: &Path) -> ArborResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            if inner.files.contains_key(&current) {
                return Err(fs_error(
                    path,
                    EntryError::conflict(format!("{} is a file", current.display())),
                ));
            }
            if !inner.directories.contains(&current) {
                if inner.is_read_only(&current) {
                    return Err(fs_error(
                        path,
                        EntryError::Permission {
                            detail: format!("{} is read-only", current.display()),
                        },
                    ));
                }
                inner.directories.insert(current.clone());
            }
        }

        Ok(())
    }

    fn create_empty_file(&self, path: &Path, truncate: bool) -> ArborResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        if inner.directories.contains(path) {
            return Err(fs_error(path, EntryError::conflict("is a directory")));
        }

        // Ensure parent exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(fs_error(
                    path,
                    EntryError::io("parent directory does not exist"),
                ));
            }
        }

        if inner.is_read_only(path) {
            return Err(fs_error(
                path,
                EntryError::Permission {
                    detail: "read-only".into(),
                },
            ));
        }

        match inner.files.get_mut(path) {
            Some(content) if truncate => content.clear(),
            Some(_) => return Err(fs_error(path, EntryError::conflict("already exists"))),
            None => {
                inner.files.insert(path.to_path_buf(), String::new());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_dir_all_registers_every_ancestor() {
        let fs = MemoryFilesystem::new();
        fs.create_dir_all(Path::new("out/app/api")).unwrap();

        assert!(fs.is_dir("out"));
        assert!(fs.is_dir("out/app"));
        assert_eq!(fs.probe(Path::new("out/app/api")).unwrap(), PathState::Directory);
    }

    #[test]
    fn file_requires_parent() {
        let fs = MemoryFilesystem::new();
        assert!(fs.create_empty_file(Path::new("out/a.txt"), false).is_err());

        fs.create_dir_all(Path::new("out")).unwrap();
        fs.create_empty_file(Path::new("out/a.txt"), false).unwrap();
        assert_eq!(fs.read_file("out/a.txt").as_deref(), Some(""));
    }

    #[test]
    fn truncate_only_when_asked() {
        let fs = MemoryFilesystem::new();
        fs.write_file("out/a.txt", "data");

        assert!(fs.create_empty_file(Path::new("out/a.txt"), false).is_err());
        assert_eq!(fs.read_file("out/a.txt").as_deref(), Some("data"));

        fs.create_empty_file(Path::new("out/a.txt"), true).unwrap();
        assert_eq!(fs.read_file("out/a.txt").as_deref(), Some(""));
    }

    #[test]
    fn probe_under_file_is_conflict() {
        let fs = MemoryFilesystem::new();
        fs.write_file("out/lib", "");
        assert!(fs.probe(Path::new("out/lib/db.ts")).is_err());
        assert!(fs.create_dir_all(Path::new("out/lib/x")).is_err());
    }

    #[test]
    fn read_only_refuses_mutation() {
        let fs = MemoryFilesystem::new();
        fs.create_dir_all(Path::new("out")).unwrap();
        fs.set_read_only("out/locked");

        assert!(fs.create_dir_all(Path::new("out/locked/x")).is_err());
        assert!(fs.create_dir_all(Path::new("out/open")).is_ok());
    }

    #[test]
    fn clones_share_state() {
        let fs = MemoryFilesystem::new();
        let other = fs.clone();
        fs.create_dir_all(Path::new("shared")).unwrap();
        assert!(other.is_dir("shared"));

        other.clear();
        assert!(fs.list_directories().is_empty());
    }
}
