use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

use super::SpecificationError;

/// A blueprint path, stored as an ordered list of segments.
///
/// Parsing is lenient: absolute prefixes, `..` and empty segments are kept so
/// that [`RelativePath::validate`] can report them by name. Both `/` and `\`
/// are accepted as separators; the canonical rendering uses `/`.
///
/// Equality, hashing and ordering only look at the segments, so `app\page.tsx`
/// and `app/page.tsx` are the same path.
#[derive(Debug, Clone)]
pub struct RelativePath {
    segments: Vec<String>,
    absolute: bool,
}

impl RelativePath {
    /// Parse a path written with `/` or `\` separators.
    pub fn parse(raw: &str) -> Self {
        let absolute = raw.starts_with('/') || raw.starts_with('\\') || has_drive_prefix(raw);

        let trimmed = raw.trim_start_matches(['/', '\\']);
        let segments = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.split(['/', '\\']).map(str::to_owned).collect()
        };

        Self { segments, absolute }
    }

    /// Check that the path stays inside the root it will be joined to.
    pub fn validate(&self) -> Result<(), SpecificationError> {
        if self.absolute {
            return Err(SpecificationError::AbsolutePath {
                path: self.to_string(),
            });
        }

        if self.segments.is_empty() {
            return Err(SpecificationError::EmptyPath);
        }

        for segment in &self.segments {
            match segment.as_str() {
                "" => {
                    return Err(SpecificationError::EmptySegment {
                        path: self.to_string(),
                    });
                }
                ".." => {
                    return Err(SpecificationError::ParentTraversal {
                        path: self.to_string(),
                    });
                }
                "." => {
                    return Err(SpecificationError::InvalidSegment {
                        path: self.to_string(),
                        segment: segment.clone(),
                        reason: "'.' segments are not allowed".into(),
                    });
                }
                s if s.contains(['/', '\\']) => {
                    return Err(SpecificationError::InvalidSegment {
                        path: self.to_string(),
                        segment: segment.clone(),
                        reason: "segment contains a path separator".into(),
                    });
                }
                _ => {}
            }
        }

        Ok(())
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The path without its last segment, or `None` for a top-level entry.
    pub fn parent(&self) -> Option<RelativePath> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
            absolute: self.absolute,
        })
    }

    /// Proper ancestors, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = RelativePath> {
        std::iter::successors(self.parent(), RelativePath::parent)
    }

    /// Resolve against `root`, pushing one segment at a time so the result
    /// uses the platform separator.
    pub fn to_native(&self, root: &Path) -> PathBuf {
        let mut path = root.to_path_buf();
        for segment in &self.segments {
            path.push(segment);
        }
        path
    }
}

/// `C:` style prefixes are absolute on Windows and never valid as a segment.
fn has_drive_prefix(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

impl PartialEq for RelativePath {
    fn eq(&self, other: &Self) -> bool {
        self.absolute == other.absolute && self.segments == other.segments
    }
}

impl Eq for RelativePath {}

impl Hash for RelativePath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.absolute.hash(state);
        self.segments.hash(state);
    }
}

impl PartialOrd for RelativePath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RelativePath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.segments
            .cmp(&other.segments)
            .then(self.absolute.cmp(&other.absolute))
    }
}

impl From<&str> for RelativePath {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for RelativePath {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.absolute && !self.segments.first().is_some_and(|s| has_drive_prefix(s)) {
            f.write_str("/")?;
        }
        f.write_str(&self.segments.join("/"))
    }
}

impl Serialize for RelativePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
