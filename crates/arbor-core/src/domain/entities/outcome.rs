use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::domain::entities::{common::RelativePath, path_set::EntryKind};

/// Why a single entry could not be materialized.
///
/// Entry errors never abort a run on their own; the materializer records them
/// and moves on unless asked to stop on the first failure.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryError {
    /// Something of the wrong kind already occupies the path or an ancestor.
    #[error("conflict: {detail}")]
    Conflict { detail: String },

    #[error("permission denied: {detail}")]
    Permission { detail: String },

    #[error("path too long: {detail}")]
    PathTooLong { detail: String },

    /// Reserved name or character for the target platform.
    #[error("invalid name: {detail}")]
    InvalidName { detail: String },

    #[error("I/O error: {detail}")]
    Io { detail: String },
}

impl EntryError {
    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::Conflict {
            detail: detail.into(),
        }
    }

    pub fn io(detail: impl Into<String>) -> Self {
        Self::Io {
            detail: detail.into(),
        }
    }

    /// Stable name used in reports.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Conflict { .. } => "ConflictError",
            Self::Permission { .. } => "PermissionError",
            Self::PathTooLong { .. } => "PathTooLongError",
            Self::InvalidName { .. } => "InvalidNameError",
            Self::Io { .. } => "IOError",
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            Self::Conflict { detail }
            | Self::Permission { detail }
            | Self::PathTooLong { detail }
            | Self::InvalidName { detail }
            | Self::Io { detail } => detail,
        }
    }
}

/// What happened to one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "error", rename_all = "snake_case")]
pub enum EntryAction {
    Created,
    /// An existing file was truncated to empty.
    Overwritten,
    /// Already present in the expected form; left untouched.
    Skipped,
    Failed(EntryError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryReport {
    pub path: RelativePath,
    pub kind: EntryKind,
    #[serde(flatten)]
    pub action: EntryAction,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Every entry was attempted and none failed.
    Completed,
    /// Every entry was attempted; some failed.
    CompletedWithFailures,
    /// Stopped after the first failure.
    Aborted,
    /// Stopped by a cancellation request between entries.
    Cancelled,
}

/// Outcome of one materializer run.
///
/// Built up by the materializer and handed to the caller read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaterializationResult {
    pub(crate) root_path: PathBuf,
    pub(crate) dry_run: bool,
    pub(crate) root_created: bool,
    pub(crate) created_count: usize,
    pub(crate) overwritten_count: usize,
    pub(crate) skipped_count: usize,
    pub(crate) not_attempted_count: usize,
    pub(crate) failed_entries: BTreeMap<RelativePath, EntryError>,
    pub(crate) status: RunStatus,
    pub(crate) reports: Vec<EntryReport>,
}

impl MaterializationResult {
    pub(crate) fn new(root_path: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            root_path: root_path.into(),
            dry_run,
            root_created: false,
            created_count: 0,
            overwritten_count: 0,
            skipped_count: 0,
            not_attempted_count: 0,
            failed_entries: BTreeMap::new(),
            status: RunStatus::Completed,
            reports: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, report: EntryReport) {
        match &report.action {
            EntryAction::Created => self.created_count += 1,
            EntryAction::Overwritten => {
                self.created_count += 1;
                self.overwritten_count += 1;
            }
            EntryAction::Skipped => self.skipped_count += 1,
            EntryAction::Failed(err) => {
                self.failed_entries
                    .insert(report.path.clone(), err.clone());
            }
        }
        self.reports.push(report);
    }

    pub(crate) fn finish(&mut self, stopped: Option<RunStatus>, not_attempted: usize) {
        self.not_attempted_count = not_attempted;
        self.status = match stopped {
            Some(status) => status,
            None if self.failed_entries.is_empty() => RunStatus::Completed,
            None => RunStatus::CompletedWithFailures,
        };
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// `true` if the root directory did not exist and was (or, on a dry run,
    /// would have been) created.
    pub fn root_created(&self) -> bool {
        self.root_created
    }

    /// Entries created, including truncated files.
    pub fn created_count(&self) -> usize {
        self.created_count
    }

    pub fn overwritten_count(&self) -> usize {
        self.overwritten_count
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped_count
    }

    pub fn failed_count(&self) -> usize {
        self.failed_entries.len()
    }

    pub fn not_attempted_count(&self) -> usize {
        self.not_attempted_count
    }

    pub fn failed_entries(&self) -> &BTreeMap<RelativePath, EntryError> {
        &self.failed_entries
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Per-entry reports in processing order.
    pub fn reports(&self) -> &[EntryReport] {
        &self.reports
    }

    /// `true` when every entry was attempted and none failed.
    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Completed
    }

    /// Classification of every attempted entry, keyed by path.
    ///
    /// Two runs over the same blueprint and disk state agree on this map
    /// whether or not they are dry runs.
    pub fn classification(&self) -> BTreeMap<RelativePath, EntryAction> {
        self.reports
            .iter()
            .map(|r| (r.path.clone(), r.action.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(path: &str, action: EntryAction) -> EntryReport {
        EntryReport {
            path: RelativePath::parse(path),
            kind: EntryKind::File,
            action,
        }
    }

    #[test]
    fn tallies_actions() {
        let mut result = MaterializationResult::new("/tmp/x", false);
        result.record(report("a", EntryAction::Created));
        result.record(report("b", EntryAction::Overwritten));
        result.record(report("c", EntryAction::Skipped));
        result.record(report("d", EntryAction::Failed(EntryError::io("boom"))));
        result.finish(None, 0);

        assert_eq!(result.created_count(), 2);
        assert_eq!(result.overwritten_count(), 1);
        assert_eq!(result.skipped_count(), 1);
        assert_eq!(result.failed_count(), 1);
        assert_eq!(result.status(), RunStatus::CompletedWithFailures);
        assert!(!result.is_success());
    }

    #[test]
    fn explicit_stop_status_wins() {
        let mut result = MaterializationResult::new("/tmp/x", true);
        result.finish(Some(RunStatus::Cancelled), 3);
        assert_eq!(result.status(), RunStatus::Cancelled);
        assert_eq!(result.not_attempted_count(), 3);
    }

    #[test]
    fn kind_names_are_stable() {
        assert_eq!(EntryError::conflict("x").kind_name(), "ConflictError");
        assert_eq!(
            EntryError::Permission { detail: "x".into() }.kind_name(),
            "PermissionError"
        );
        assert_eq!(EntryError::io("x").kind_name(), "IOError");
    }

    #[test]
    fn serializes_failed_entries_by_path() {
        let mut result = MaterializationResult::new("root", false);
        result.record(report("x/y", EntryAction::Failed(EntryError::conflict("file"))));
        result.finish(None, 0);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["failed_entries"]["x/y"]["kind"], "conflict");
        assert_eq!(json["reports"][0]["action"], "failed");
        assert_eq!(json["status"], "completed_with_failures");
    }
}
