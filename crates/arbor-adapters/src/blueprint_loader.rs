//! Filesystem-based blueprint loader.
//!
//! Reads blueprints from two formats and turns them into domain [`PathSet`]s.
//!
//! # `.tree` line listing
//!
//! ```text
//! # comments and blank lines are ignored
//! app/                  ← trailing '/' marks a directory
//! app/page.tsx          ← everything else is an empty file
//! app/(auth)/login/page.tsx
//! ```
//!
//! The blueprint name is the file stem.
//!
//! # `.toml` manifest
//!
//! ```toml
//! [blueprint]
//! name        = "web"            # optional; defaults to the file stem
//! description = "Small website"  # optional
//!
//! [[entries]]
//! path = "app"
//! kind = "directory"             # directory | dir | file
//!
//! [[entries]]
//! path = "app/page.tsx"
//! kind = "file"
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use arbor_core::domain::{DomainValidator, PathEntry, PathSet, SpecificationError};

/// File extensions recognised as blueprints.
pub const EXTENSIONS: &[&str] = &["tree", "toml"];

/// Why a blueprint file could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid blueprint {}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: SpecificationError,
    },

    #[error("unsupported blueprint format for {}; expected .tree or .toml", path.display())]
    UnsupportedFormat { path: PathBuf },
}

impl From<LoadError> for SpecificationError {
    fn from(err: LoadError) -> Self {
        SpecificationError::InvalidBlueprint(err.to_string())
    }
}

// ── Manifest types ────────────────────────────────────────────────────────────

/// Deserialised representation of a `.toml` blueprint.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct BlueprintManifest {
    #[serde(default)]
    pub blueprint: BlueprintSection,
    #[serde(default)]
    pub entries: Vec<ManifestEntry>,
}

/// `[blueprint]` section.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct BlueprintSection {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// One `[[entries]]` item.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ManifestEntry {
    pub path: String,
    pub kind: ManifestKind,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ManifestKind {
    #[serde(alias = "dir")]
    Directory,
    File,
}

impl From<ManifestEntry> for PathEntry {
    fn from(entry: ManifestEntry) -> Self {
        match entry.kind {
            ManifestKind::Directory => PathEntry::directory(entry.path),
            ManifestKind::File => PathEntry::file(entry.path),
        }
    }
}

// ── Parsers ───────────────────────────────────────────────────────────────────

/// Parse a `.tree` listing.
///
/// Never fails: every non-comment line becomes an entry, and shape problems
/// are left to [`PathSet::validate`] so they are reported with the path.
pub fn parse_tree(name: Option<&str>, source: &str) -> PathSet {
    let entries = source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| match line.strip_suffix(&['/', '\\'][..]) {
            Some(dir) => PathEntry::directory(dir),
            None => PathEntry::file(line),
        });

    let set: PathSet = entries.collect();
    match name {
        Some(name) => set.with_name(name),
        None => set,
    }
}

/// Parse a `.toml` manifest. `fallback_name` is used when the manifest has none.
pub fn parse_manifest(
    fallback_name: Option<&str>,
    source: &str,
) -> Result<PathSet, toml::de::Error> {
    let manifest: BlueprintManifest = toml::from_str(source)?;

    let mut set: PathSet = manifest.entries.into_iter().map(PathEntry::from).collect();
    if let Some(name) = manifest.blueprint.name.as_deref().or(fallback_name) {
        set = set.with_name(name);
    }
    if let Some(description) = manifest.blueprint.description {
        set = set.with_description(description);
    }
    Ok(set)
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// `true` if `path` has a blueprint extension.
pub fn is_blueprint_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| EXTENSIONS.contains(&ext))
}

/// Load a single blueprint file, picking the format from its extension.
///
/// The result is not validated.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_file(path: &Path) -> Result<PathSet, LoadError> {
    let stem = path.file_stem().and_then(|s| s.to_str());
    let extension = path.extension().and_then(|s| s.to_str());

    if !matches!(extension, Some("tree" | "toml")) {
        return Err(LoadError::UnsupportedFormat {
            path: path.to_path_buf(),
        });
    }

    let source = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let set = match extension {
        Some("toml") => parse_manifest(stem, &source).map_err(|source| LoadError::Toml {
            path: path.to_path_buf(),
            source,
        })?,
        _ => parse_tree(stem, &source),
    };

    debug!(entries = set.len(), "loaded blueprint");
    Ok(set)
}

/// Load every valid blueprint found under `dir`, recursively, sorted by path.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if `dir` does not exist or is not a directory.
///
/// Files that cannot be read, parsed or validated are **skipped with a
/// `WARN` log** rather than failing the whole batch.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn load_dir(dir: &Path) -> Result<Vec<PathSet>, LoadError> {
    let meta = fs::metadata(dir).map_err(|source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(LoadError::Io {
            path: dir.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotADirectory, "not a directory"),
        });
    }

    let mut blueprints = Vec::new();

    for walk_entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = match walk_entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };

        if !entry.file_type().is_file() || !is_blueprint_file(entry.path()) {
            continue;
        }

        let loaded = load_file(entry.path()).and_then(|set| {
            DomainValidator::validate_path_set(&set)
                .map(|()| set)
                .map_err(|source| LoadError::Invalid {
                    path: entry.path().to_path_buf(),
                    source,
                })
        });

        match loaded {
            Ok(set) => blueprints.push(set),
            Err(e) => {
                // One bad blueprint must not block all others.
                warn!(
                    path  = %entry.path().display(),
                    error = %e,
                    "skipping blueprint due to load error"
                );
            }
        }
    }

    debug!(count = blueprints.len(), "finished loading blueprints");
    Ok(blueprints)
}
