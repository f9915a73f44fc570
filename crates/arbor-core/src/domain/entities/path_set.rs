use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::domain::{entities::common::RelativePath, error::SpecificationError};

/// What a blueprint entry becomes on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Directory,
    File,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Directory => write!(f, "directory"),
            Self::File => write!(f, "file"),
        }
    }
}

/// One node of a blueprint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PathEntry {
    pub relative_path: RelativePath,
    pub kind: EntryKind,
}

impl PathEntry {
    pub fn directory(path: impl Into<RelativePath>) -> Self {
        Self {
            relative_path: path.into(),
            kind: EntryKind::Directory,
        }
    }

    pub fn file(path: impl Into<RelativePath>) -> Self {
        Self {
            relative_path: path.into(),
            kind: EntryKind::File,
        }
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

impl fmt::Display for PathEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EntryKind::Directory => write!(f, "{}/", self.relative_path),
            EntryKind::File => write!(f, "{}", self.relative_path),
        }
    }
}

/// Declarative description of a project tree.
///
/// A `PathSet` only describes what should exist; it never touches the
/// filesystem. Entries keep their insertion order, which is also the order the
/// materializer processes them in (directories first, then files).
///
/// Builder methods consume `self`, so a finished set cannot be mutated.
///
/// ```
/// use arbor_core::domain::PathSet;
///
/// let set = PathSet::new()
///     .with_directory("app")
///     .with_file("app/page.tsx");
///
/// assert!(set.validate().is_ok());
/// assert_eq!(set.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathSet {
    name: Option<String>,
    description: Option<String>,
    entries: Vec<PathEntry>,
}

impl PathSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty set carrying a display name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn from_entries(entries: Vec<PathEntry>) -> Self {
        Self {
            entries,
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_entry(mut self, entry: PathEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn with_directory(self, path: impl Into<RelativePath>) -> Self {
        self.with_entry(PathEntry::directory(path))
    }

    pub fn with_file(self, path: impl Into<RelativePath>) -> Self {
        self.with_entry(PathEntry::file(path))
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// All entries in blueprint order. Each call starts from the beginning.
    pub fn entries(&self) -> impl Iterator<Item = &PathEntry> + '_ {
        self.entries.iter()
    }

    pub fn directories(&self) -> impl Iterator<Item = &PathEntry> + '_ {
        self.entries.iter().filter(|e| e.is_directory())
    }

    pub fn files(&self) -> impl Iterator<Item = &PathEntry> + '_ {
        self.entries.iter().filter(|e| e.is_file())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check every invariant of the blueprint.
    ///
    /// Reports the first violation found, in blueprint order:
    /// - each path is relative, non-empty, free of `..`, `.` and empty segments
    /// - no `(path, kind)` pair appears twice
    /// - no path is declared as both a file and a directory
    /// - no listed ancestor of an entry is declared as a file
    pub fn validate(&self) -> Result<(), SpecificationError> {
        let mut declared: HashMap<&RelativePath, EntryKind> =
            HashMap::with_capacity(self.entries.len());

        for entry in &self.entries {
            entry.relative_path.validate()?;

            match declared.get(&entry.relative_path) {
                Some(kind) if *kind == entry.kind => {
                    return Err(SpecificationError::DuplicateEntry {
                        path: entry.relative_path.to_string(),
                        kind: entry.kind.to_string(),
                    });
                }
                Some(_) => {
                    return Err(SpecificationError::KindConflict {
                        path: entry.relative_path.to_string(),
                    });
                }
                None => {
                    declared.insert(&entry.relative_path, entry.kind);
                }
            }
        }

        for entry in &self.entries {
            for ancestor in entry.relative_path.ancestors() {
                if declared.get(&ancestor) == Some(&EntryKind::File) {
                    return Err(SpecificationError::AncestorIsFile {
                        path: entry.relative_path.to_string(),
                        ancestor: ancestor.to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

impl FromIterator<PathEntry> for PathSet {
    fn from_iter<T: IntoIterator<Item = PathEntry>>(iter: T) -> Self {
        Self::from_entries(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PathSet {
    type Item = &'a PathEntry;
    type IntoIter = std::slice::Iter<'a, PathEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
