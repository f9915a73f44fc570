//! Platform naming rules.
//!
//! Checks a resolved entry path against the length and character limits of a
//! target platform, without touching the filesystem. Running the same check on
//! dry and real runs keeps their classifications identical.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{common::RelativePath, outcome::EntryError};

/// Longest single path component, in bytes (Unix) or UTF-16 units (Windows).
pub const MAX_SEGMENT_LEN: usize = 255;
/// `PATH_MAX` on Linux.
pub const UNIX_MAX_PATH: usize = 4096;
/// Classic `MAX_PATH`, without the long-path opt-in.
pub const WINDOWS_MAX_PATH: usize = 260;

const WINDOWS_RESERVED_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*'];
const WINDOWS_RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Naming rules to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Unix,
    Windows,
}

impl Platform {
    /// Rules of the platform this binary was built for.
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Unix
        }
    }

    fn max_path(self) -> usize {
        match self {
            Self::Unix => UNIX_MAX_PATH,
            Self::Windows => WINDOWS_MAX_PATH,
        }
    }

    /// Length of `s` in the unit the platform measures names in.
    fn measure(self, s: &str) -> usize {
        match self {
            Self::Unix => s.len(),
            Self::Windows => s.encode_utf16().count(),
        }
    }

    /// `true` if `path` exceeds the platform's full-path limit.
    pub fn path_exceeds_limit(self, path: &Path) -> bool {
        self.measure(&path.to_string_lossy()) > self.max_path()
    }

    /// Check one resolved entry.
    ///
    /// `root` is only used for the full-path length limit.
    pub fn check_name(self, root: &Path, path: &RelativePath) -> Result<(), EntryError> {
        for segment in path.segments() {
            self.check_segment(segment)?;
        }

        let full = path.to_native(root);
        if self.path_exceeds_limit(&full) {
            return Err(EntryError::PathTooLong {
                detail: format!(
                    "{} characters exceeds the {} limit of {}",
                    self.measure(&full.to_string_lossy()),
                    self,
                    self.max_path()
                ),
            });
        }

        Ok(())
    }

    fn check_segment(self, segment: &str) -> Result<(), EntryError> {
        if segment.contains('\0') {
            return Err(invalid_name(segment, "contains a NUL byte"));
        }

        if self.measure(segment) > MAX_SEGMENT_LEN {
            return Err(EntryError::PathTooLong {
                detail: format!(
                    "segment of {} exceeds the {} limit of {}",
                    self.measure(segment),
                    self,
                    MAX_SEGMENT_LEN
                ),
            });
        }

        if self == Self::Windows {
            if let Some(c) = segment
                .chars()
                .find(|c| WINDOWS_RESERVED_CHARS.contains(c) || c.is_ascii_control())
            {
                return Err(invalid_name(
                    segment,
                    &format!("character {c:?} is reserved on windows"),
                ));
            }

            if segment.ends_with(' ') || segment.ends_with('.') {
                return Err(invalid_name(
                    segment,
                    "trailing space or dot is stripped on windows",
                ));
            }

            let stem = segment.split('.').next().unwrap_or(segment);
            if WINDOWS_RESERVED_NAMES
                .iter()
                .any(|reserved| reserved.eq_ignore_ascii_case(stem.trim_end()))
            {
                return Err(invalid_name(segment, "reserved device name on windows"));
            }
        }

        Ok(())
    }
}

fn invalid_name(segment: &str, reason: &str) -> EntryError {
    EntryError::InvalidName {
        detail: format!("'{}' {}", segment.escape_debug(), reason),
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unix => write!(f, "unix"),
            Self::Windows => write!(f, "windows"),
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unix" | "linux" | "macos" => Ok(Self::Unix),
            "windows" | "win" => Ok(Self::Windows),
            "native" => Ok(Self::current()),
            other => Err(format!(
                "unknown platform '{other}'; expected one of: native, unix, windows"
            )),
        }
    }
}
