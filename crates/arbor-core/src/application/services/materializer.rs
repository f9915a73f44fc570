//! Materializer - main application orchestrator.
//!
//! Turns a validated `PathSet` into directories and empty files under a root:
//! 1. Validate the blueprint (nothing is touched on failure)
//! 2. Ensure the root directory
//! 3. Ensure every directory, then every file, in blueprint order
//!
//! Each entry is probed first, so re-running over an existing tree only skips.

use std::path::Path;

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError, CancellationToken,
        ports::{Filesystem, MaterializeObserver, PathState, Phase},
    },
    domain::{
        DomainValidator as validator, EntryAction, EntryError, EntryReport,
        MaterializationResult, PathEntry, PathSet, Platform, RunStatus,
    },
    error::{ArborError, ArborResult},
};

/// Knobs for a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializeOptions {
    /// Probe and classify, but never mutate.
    pub dry_run: bool,
    /// Truncate files that already exist instead of skipping them.
    pub overwrite_existing_files: bool,
    /// Stop after the first failed entry.
    pub stop_on_first_error: bool,
    /// Naming rules checked for every entry.
    pub platform: Platform,
}

impl Default for MaterializeOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            overwrite_existing_files: false,
            stop_on_first_error: false,
            platform: Platform::current(),
        }
    }
}

/// Main materialization service.
pub struct Materializer {
    filesystem: Box<dyn Filesystem>,
    cancellation: CancellationToken,
}

impl Materializer {
    /// Create a materializer over the given filesystem adapter.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use arbor_core::application::Materializer;
    ///
    /// let materializer = Materializer::new(Box::new(LocalFilesystem::new()));
    /// ```
    pub fn new(filesystem: Box<dyn Filesystem>) -> Self {
        Self {
            filesystem,
            cancellation: CancellationToken::new(),
        }
    }

    /// Share a cancellation token with the caller.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Materialize `path_set` under `root`.
    pub fn materialize(
        &self,
        path_set: &PathSet,
        root: impl AsRef<Path>,
        options: &MaterializeOptions,
    ) -> ArborResult<MaterializationResult> {
        self.materialize_with(path_set, root, options, &())
    }

    /// Materialize `path_set` under `root`, reporting progress to `observer`.
    ///
    /// Returns `Err` only when nothing could be attempted: an invalid
    /// blueprint or an unusable root. Per-entry failures are collected in the
    /// result.
    #[instrument(
        skip_all,
        fields(
            blueprint = path_set.name().unwrap_or("<unnamed>"),
            root = %root.as_ref().display(),
            dry_run = options.dry_run
        )
    )]
    pub fn materialize_with(
        &self,
        path_set: &PathSet,
        root: impl AsRef<Path>,
        options: &MaterializeOptions,
        observer: &dyn MaterializeObserver,
    ) -> ArborResult<MaterializationResult> {
        let root = root.as_ref();
        observer.phase_changed(Phase::Idle);

        // 1. Validate blueprint
        observer.phase_changed(Phase::Validating);
        if let Err(e) = validator::validate_path_set(path_set) {
            warn!(error = %e, "Blueprint rejected");
            observer.phase_changed(Phase::Rejected);
            return Err(ArborError::Specification(e));
        }

        let mut result = MaterializationResult::new(root, options.dry_run);

        // 2. Ensure root
        result.root_created = self.ensure_root(root, options.dry_run)?;

        // 3. Directories, then files
        let ordered: Vec<&PathEntry> = path_set.directories().chain(path_set.files()).collect();
        let total = ordered.len();
        let first_file = path_set.directories().count();

        info!(entries = total, "Materializing");
        observer.phase_changed(Phase::TraversingDirectories);

        let mut stopped = None;
        let mut not_attempted = 0;

        for (index, entry) in ordered.iter().enumerate() {
            if index == first_file {
                observer.phase_changed(Phase::TraversingFiles);
            }

            if self.cancellation.is_cancelled() {
                info!(remaining = total - index, "Cancelled");
                stopped = Some(RunStatus::Cancelled);
                not_attempted = total - index;
                break;
            }

            let action = match self.process(entry, root, options) {
                Ok(action) => action,
                Err(cause) => {
                    warn!(path = %entry.relative_path, error = %cause, "Entry failed");
                    EntryAction::Failed(cause)
                }
            };
            debug!(path = %entry, action = ?action, "Entry finished");

            let failed = matches!(action, EntryAction::Failed(_));
            let report = EntryReport {
                path: entry.relative_path.clone(),
                kind: entry.kind,
                action,
            };
            observer.entry_finished(&report);
            result.record(report);

            if failed && options.stop_on_first_error {
                info!(remaining = total - index - 1, "Stopping after first failure");
                stopped = Some(RunStatus::Aborted);
                not_attempted = total - index - 1;
                break;
            }
        }

        // Files phase is still entered for sets without files.
        if stopped.is_none() && first_file == total {
            observer.phase_changed(Phase::TraversingFiles);
        }

        result.finish(stopped, not_attempted);
        observer.phase_changed(Phase::Completed);

        info!(
            created = result.created_count(),
            skipped = result.skipped_count(),
            failed = result.failed_count(),
            status = ?result.status(),
            "Materialization finished"
        );
        Ok(result)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    /// Returns `true` if the root was (or would be) created.
    fn ensure_root(&self, root: &Path, dry_run: bool) -> ArborResult<bool> {
        let unavailable = |reason: String| ApplicationError::RootUnavailable {
            path: root.to_path_buf(),
            reason,
        };

        match self.filesystem.probe(root) {
            Ok(PathState::Directory) => Ok(false),
            // The caller named this link; only links below the root are refused.
            Ok(PathState::Symlink) => {
                debug!(root = %root.display(), "Root is a symlink");
                Ok(false)
            }
            Ok(PathState::Missing) => {
                if !dry_run {
                    self.filesystem
                        .create_dir_all(root)
                        .map_err(|e| unavailable(classify(e).to_string()))?;
                }
                info!(root = %root.display(), "Root created");
                Ok(true)
            }
            Ok(PathState::File | PathState::Other) => {
                Err(unavailable("exists and is not a directory".into()).into())
            }
            Err(e) => Err(unavailable(classify(e).to_string()).into()),
        }
    }

    fn process(
        &self,
        entry: &PathEntry,
        root: &Path,
        options: &MaterializeOptions,
    ) -> Result<EntryAction, EntryError> {
        options.platform.check_name(root, &entry.relative_path)?;

        self.check_ancestors(entry, root)?;

        let target = entry.relative_path.to_native(root);
        let state = self.filesystem.probe(&target).map_err(classify)?;

        if entry.is_directory() {
            self.ensure_directory(&target, state, options.dry_run)
        } else {
            self.ensure_file(&target, state, options)
        }
    }

    /// Every existing ancestor between `root` and the entry must be a real
    /// directory, so no mutation is ever routed through a symlink.
    fn check_ancestors(&self, entry: &PathEntry, root: &Path) -> Result<(), EntryError> {
        let mut ancestors: Vec<_> = entry.relative_path.ancestors().collect();
        ancestors.reverse();

        for ancestor in ancestors {
            let path = ancestor.to_native(root);
            match self.filesystem.probe(&path).map_err(classify)? {
                PathState::Directory => {}
                PathState::Missing => return Ok(()),
                PathState::Symlink => {
                    return Err(EntryError::conflict(format!(
                        "ancestor {} is a symlink",
                        path.display()
                    )));
                }
                PathState::File | PathState::Other => {
                    return Err(EntryError::conflict(format!(
                        "ancestor {} is not a directory",
                        path.display()
                    )));
                }
            }
        }

        Ok(())
    }

    fn ensure_directory(
        &self,
        target: &Path,
        state: PathState,
        dry_run: bool,
    ) -> Result<EntryAction, EntryError> {
        match state {
            PathState::Directory => Ok(EntryAction::Skipped),
            PathState::File | PathState::Other => Err(EntryError::conflict(format!(
                "expected directory, found file at {}",
                target.display()
            ))),
            PathState::Symlink => Err(EntryError::conflict(format!(
                "expected directory, found symlink at {}",
                target.display()
            ))),
            PathState::Missing => {
                if !dry_run {
                    self.filesystem.create_dir_all(target).map_err(classify)?;
                }
                Ok(EntryAction::Created)
            }
        }
    }

    fn ensure_file(
        &self,
        target: &Path,
        state: PathState,
        options: &MaterializeOptions,
    ) -> Result<EntryAction, EntryError> {
        match state {
            PathState::Directory => Err(EntryError::conflict(format!(
                "expected file, found directory at {}",
                target.display()
            ))),
            PathState::Other => Err(EntryError::conflict(format!(
                "expected file, found special file at {}",
                target.display()
            ))),
            PathState::Symlink => Err(EntryError::conflict(format!(
                "expected file, found symlink at {}",
                target.display()
            ))),
            PathState::File if !options.overwrite_existing_files => Ok(EntryAction::Skipped),
            PathState::File => {
                if !options.dry_run {
                    self.filesystem
                        .create_empty_file(target, true)
                        .map_err(classify)?;
                }
                Ok(EntryAction::Overwritten)
            }
            PathState::Missing => {
                if !options.dry_run {
                    if let Some(parent) = target.parent() {
                        self.filesystem.create_dir_all(parent).map_err(classify)?;
                    }
                    self.filesystem
                        .create_empty_file(target, false)
                        .map_err(classify)?;
                }
                Ok(EntryAction::Created)
            }
        }
    }
}

/// Recover the classified cause from an adapter error.
fn classify(err: ArborError) -> EntryError {
    match err {
        ArborError::Application(ApplicationError::Filesystem { cause, .. }) => cause,
        other => EntryError::io(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::PathBuf;

    use super::*;
    use crate::application::ports::MockFilesystem;
    use crate::domain::RelativePath;

    const ROOT: &str = "root";

    fn native(raw: &str) -> PathBuf {
        RelativePath::parse(raw).to_native(Path::new(ROOT))
    }

    fn scenario() -> PathSet {
        PathSet::named("scenario")
            .with_directory("app")
            .with_file("app/page.tsx")
            .with_directory("app/api/health")
            .with_file("app/api/health/route.ts")
    }

    fn options() -> MaterializeOptions {
        MaterializeOptions {
            platform: Platform::Unix,
            ..MaterializeOptions::default()
        }
    }

    fn fs_error(path: &Path, cause: EntryError) -> ArborError {
        ApplicationError::Filesystem {
            path: path.to_path_buf(),
            cause,
        }
        .into()
    }

    /// Root exists, everything below it is missing, every mutation succeeds.
    fn empty_root() -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        fs.expect_probe().returning(|p| {
            Ok(if p == Path::new(ROOT) {
                PathState::Directory
            } else {
                PathState::Missing
            })
        });
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_create_empty_file().returning(|_, _| Ok(()));
        fs
    }

    #[derive(Default)]
    struct Recorder {
        phases: RefCell<Vec<Phase>>,
        paths: RefCell<Vec<String>>,
        cancel_after_first: Option<CancellationToken>,
    }

    impl MaterializeObserver for Recorder {
        fn phase_changed(&self, phase: Phase) {
            self.phases.borrow_mut().push(phase);
        }

        fn entry_finished(&self, report: &EntryReport) {
            self.paths.borrow_mut().push(report.path.to_string());
            if let Some(token) = &self.cancel_after_first {
                token.cancel();
            }
        }
    }

    // ========================================================================
    // Happy path
    // ========================================================================

    #[test]
    fn creates_every_entry_of_scenario() {
        let materializer = Materializer::new(Box::new(empty_root()));
        let result = materializer
            .materialize(&scenario(), ROOT, &options())
            .unwrap();

        assert_eq!(result.created_count(), 4);
        assert_eq!(result.skipped_count(), 0);
        assert!(result.failed_entries().is_empty());
        assert_eq!(result.status(), RunStatus::Completed);
        assert!(!result.root_created());
    }

    #[test]
    fn directories_are_processed_before_files() {
        let recorder = Recorder::default();
        let materializer = Materializer::new(Box::new(empty_root()));
        materializer
            .materialize_with(&scenario(), ROOT, &options(), &recorder)
            .unwrap();

        assert_eq!(
            *recorder.paths.borrow(),
            vec![
                "app",
                "app/api/health",
                "app/page.tsx",
                "app/api/health/route.ts"
            ]
        );
        assert_eq!(
            *recorder.phases.borrow(),
            vec![
                Phase::Idle,
                Phase::Validating,
                Phase::TraversingDirectories,
                Phase::TraversingFiles,
                Phase::Completed
            ]
        );
    }

    #[test]
    fn file_parent_is_ensured_before_creation() {
        let mut fs = MockFilesystem::new();
        let mut seq = mockall::Sequence::new();
        fs.expect_probe().returning(|p| {
            Ok(if p == Path::new(ROOT) {
                PathState::Directory
            } else {
                PathState::Missing
            })
        });
        fs.expect_create_dir_all()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|p| p == native("lib/db"))
            .returning(|_| Ok(()));
        fs.expect_create_empty_file()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|p, truncate| p == native("lib/db/mongodb.ts") && !*truncate)
            .returning(|_, _| Ok(()));

        let set = PathSet::new().with_file("lib/db/mongodb.ts");
        let result = Materializer::new(Box::new(fs))
            .materialize(&set, ROOT, &options())
            .unwrap();
        assert_eq!(result.created_count(), 1);
    }

    #[test]
    fn missing_root_is_created_first() {
        let mut fs = MockFilesystem::new();
        fs.expect_probe().returning(|_| Ok(PathState::Missing));
        fs.expect_create_dir_all()
            .withf(|p| p == Path::new(ROOT))
            .times(1)
            .returning(|_| Ok(()));

        let result = Materializer::new(Box::new(fs))
            .materialize(&PathSet::new(), ROOT, &options())
            .unwrap();
        assert!(result.root_created());
        assert_eq!(result.created_count(), 0);
    }

    // ========================================================================
    // Idempotence and overwrite
    // ========================================================================

    #[test]
    fn existing_entries_are_skipped_without_mutation() {
        let mut fs = MockFilesystem::new();
        fs.expect_probe().returning(|p| {
            Ok(if p.extension().is_some() {
                PathState::File
            } else {
                PathState::Directory
            })
        });
        fs.expect_create_dir_all().never();
        fs.expect_create_empty_file().never();

        let result = Materializer::new(Box::new(fs))
            .materialize(&scenario(), ROOT, &options())
            .unwrap();
        assert_eq!(result.created_count(), 0);
        assert_eq!(result.skipped_count(), 4);
    }

    #[test]
    fn overwrite_truncates_existing_files() {
        let mut fs = MockFilesystem::new();
        fs.expect_probe().returning(|p| {
            Ok(if p.extension().is_some() {
                PathState::File
            } else {
                PathState::Directory
            })
        });
        fs.expect_create_empty_file()
            .withf(|_, truncate| *truncate)
            .times(2)
            .returning(|_, _| Ok(()));

        let opts = MaterializeOptions {
            overwrite_existing_files: true,
            ..options()
        };
        let result = Materializer::new(Box::new(fs))
            .materialize(&scenario(), ROOT, &opts)
            .unwrap();
        assert_eq!(result.overwritten_count(), 2);
        assert_eq!(result.created_count(), 2);
        assert_eq!(result.skipped_count(), 2);
    }

    // ========================================================================
    // Dry run
    // ========================================================================

    #[test]
    fn dry_run_never_mutates() {
        let mut fs = MockFilesystem::new();
        fs.expect_probe().returning(|_| Ok(PathState::Missing));
        fs.expect_create_dir_all().never();
        fs.expect_create_empty_file().never();

        let opts = MaterializeOptions {
            dry_run: true,
            ..options()
        };
        let result = Materializer::new(Box::new(fs))
            .materialize(&scenario(), ROOT, &opts)
            .unwrap();
        assert!(result.is_dry_run());
        assert!(result.root_created());
        assert_eq!(result.created_count(), 4);
    }

    // ========================================================================
    // Failures
    // ========================================================================

    #[test]
    fn file_at_directory_path_is_conflict_and_others_succeed() {
        let mut fs = MockFilesystem::new();
        fs.expect_probe().returning(|p| {
            Ok(if p == Path::new(ROOT) {
                PathState::Directory
            } else if p == native("app/api/health") {
                PathState::File
            } else {
                PathState::Missing
            })
        });
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_create_empty_file().returning(|_, _| Ok(()));

        let set = PathSet::new()
            .with_directory("app")
            .with_directory("app/api/health")
            .with_file("app/page.tsx");
        let result = Materializer::new(Box::new(fs))
            .materialize(&set, ROOT, &options())
            .unwrap();

        assert_eq!(result.created_count(), 2);
        assert_eq!(result.failed_count(), 1);
        let (path, err) = result.failed_entries().iter().next().unwrap();
        assert_eq!(path.to_string(), "app/api/health");
        assert!(matches!(err, EntryError::Conflict { .. }));
        assert_eq!(result.status(), RunStatus::CompletedWithFailures);
    }

    #[test]
    fn directory_at_file_path_is_conflict() {
        let mut fs = MockFilesystem::new();
        fs.expect_probe().returning(|_| Ok(PathState::Directory));

        let set = PathSet::new().with_file("README.md");
        let result = Materializer::new(Box::new(fs))
            .materialize(&set, ROOT, &options())
            .unwrap();
        assert!(matches!(
            result.failed_entries().values().next(),
            Some(EntryError::Conflict { .. })
        ));
    }

    #[test]
    fn adapter_cause_is_preserved() {
        let mut fs = MockFilesystem::new();
        fs.expect_probe().returning(|p| {
            Ok(if p == Path::new(ROOT) {
                PathState::Directory
            } else {
                PathState::Missing
            })
        });
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_create_empty_file().returning(|p, _| {
            Err(fs_error(
                p,
                EntryError::Permission {
                    detail: "read-only".into(),
                },
            ))
        });

        let result = Materializer::new(Box::new(fs))
            .materialize(&scenario(), ROOT, &options())
            .unwrap();
        assert_eq!(result.created_count(), 2);
        assert_eq!(result.failed_count(), 2);
        assert!(
            result
                .failed_entries()
                .values()
                .all(|e| e.kind_name() == "PermissionError")
        );
    }

    #[test]
    fn unclassified_errors_become_io() {
        let mut fs = MockFilesystem::new();
        fs.expect_probe().returning(|p| {
            if p == Path::new(ROOT) {
                Ok(PathState::Directory)
            } else {
                Err(ArborError::Internal {
                    message: "boom".into(),
                })
            }
        });

        let set = PathSet::new().with_directory("a");
        let result = Materializer::new(Box::new(fs))
            .materialize(&set, ROOT, &options())
            .unwrap();
        assert!(matches!(
            result.failed_entries().values().next(),
            Some(EntryError::Io { .. })
        ));
    }

    #[test]
    fn stop_on_first_error_aborts() {
        let mut fs = MockFilesystem::new();
        fs.expect_probe().returning(|p| {
            Ok(if p == Path::new(ROOT) {
                PathState::Directory
            } else {
                PathState::File
            })
        });

        let opts = MaterializeOptions {
            stop_on_first_error: true,
            ..options()
        };
        let result = Materializer::new(Box::new(fs))
            .materialize(&scenario(), ROOT, &opts)
            .unwrap();
        assert_eq!(result.status(), RunStatus::Aborted);
        assert_eq!(result.failed_count(), 1);
        assert_eq!(result.not_attempted_count(), 3);
    }

    #[test]
    fn reserved_windows_name_fails_without_mutation() {
        let mut fs = MockFilesystem::new();
        fs.expect_probe()
            .withf(|p| p == Path::new(ROOT))
            .returning(|_| Ok(PathState::Directory));
        fs.expect_create_empty_file().never();

        let opts = MaterializeOptions {
            platform: Platform::Windows,
            ..options()
        };
        let set = PathSet::new().with_file("aux.ts");
        let result = Materializer::new(Box::new(fs))
            .materialize(&set, ROOT, &opts)
            .unwrap();
        assert!(matches!(
            result.failed_entries().values().next(),
            Some(EntryError::InvalidName { .. })
        ));
    }

    #[test]
    fn symlink_at_entry_path_is_conflict_without_mutation() {
        let mut fs = MockFilesystem::new();
        fs.expect_probe().returning(|p| {
            Ok(if p == Path::new(ROOT) {
                PathState::Directory
            } else {
                PathState::Symlink
            })
        });
        fs.expect_create_dir_all().never();
        fs.expect_create_empty_file().never();

        let opts = MaterializeOptions {
            overwrite_existing_files: true,
            ..options()
        };
        let set = PathSet::new().with_directory("app").with_file("README.md");
        let result = Materializer::new(Box::new(fs))
            .materialize(&set, ROOT, &opts)
            .unwrap();

        assert_eq!(result.failed_count(), 2);
        assert!(
            result
                .failed_entries()
                .values()
                .all(|e| matches!(e, EntryError::Conflict { .. }))
        );
    }

    #[test]
    fn symlinked_ancestor_blocks_entries_below_it() {
        let mut fs = MockFilesystem::new();
        fs.expect_probe().returning(|p| {
            Ok(if p == Path::new(ROOT) {
                PathState::Directory
            } else if p == native("lib") {
                PathState::Symlink
            } else {
                PathState::Missing
            })
        });
        fs.expect_create_dir_all()
            .withf(|p| !p.starts_with(native("lib")))
            .returning(|_| Ok(()));
        fs.expect_create_empty_file()
            .withf(|p, _| !p.starts_with(native("lib")))
            .returning(|_, _| Ok(()));

        let set = PathSet::new()
            .with_directory("lib/db")
            .with_file("lib/db/mongodb.ts")
            .with_file("README.md");
        let result = Materializer::new(Box::new(fs))
            .materialize(&set, ROOT, &options())
            .unwrap();

        let failed: Vec<String> = result.failed_entries().keys().map(|p| p.to_string()).collect();
        assert_eq!(failed, vec!["lib/db", "lib/db/mongodb.ts"]);
        assert_eq!(result.created_count(), 1);
    }

    #[test]
    fn file_ancestor_on_disk_is_conflict() {
        let mut fs = MockFilesystem::new();
        fs.expect_probe().returning(|p| {
            Ok(if p == Path::new(ROOT) || p == native("app") {
                PathState::Directory
            } else if p == native("app/api") {
                PathState::File
            } else {
                PathState::Missing
            })
        });
        fs.expect_create_dir_all().never();
        fs.expect_create_empty_file().never();

        let set = PathSet::new().with_file("app/api/health/route.ts");
        let result = Materializer::new(Box::new(fs))
            .materialize(&set, ROOT, &options())
            .unwrap();
        assert!(matches!(
            result.failed_entries().values().next(),
            Some(EntryError::Conflict { .. })
        ));
    }

    // ========================================================================
    // Rejection and root
    // ========================================================================

    #[test]
    fn invalid_blueprint_touches_nothing() {
        let mut fs = MockFilesystem::new();
        fs.expect_probe().never();
        fs.expect_create_dir_all().never();
        fs.expect_create_empty_file().never();

        let recorder = Recorder::default();
        let set = PathSet::new().with_directory("app").with_file("../escape.txt");
        let err = Materializer::new(Box::new(fs))
            .materialize_with(&set, ROOT, &options(), &recorder)
            .unwrap_err();

        assert!(matches!(
            err,
            ArborError::Specification(crate::domain::SpecificationError::ParentTraversal { .. })
        ));
        assert_eq!(recorder.phases.borrow().last(), Some(&Phase::Rejected));
    }

    #[test]
    fn root_that_is_a_file_is_unavailable() {
        let mut fs = MockFilesystem::new();
        fs.expect_probe().times(1).returning(|_| Ok(PathState::File));

        let err = Materializer::new(Box::new(fs))
            .materialize(&scenario(), ROOT, &options())
            .unwrap_err();
        assert!(matches!(
            err,
            ArborError::Application(ApplicationError::RootUnavailable { .. })
        ));
    }

    #[test]
    fn symlinked_root_is_used_as_is() {
        let mut fs = MockFilesystem::new();
        fs.expect_probe().returning(|p| {
            Ok(if p == Path::new(ROOT) {
                PathState::Symlink
            } else {
                PathState::Missing
            })
        });
        fs.expect_create_dir_all()
            .withf(|p| p != Path::new(ROOT))
            .returning(|_| Ok(()));
        fs.expect_create_empty_file().returning(|_, _| Ok(()));

        let result = Materializer::new(Box::new(fs))
            .materialize(&scenario(), ROOT, &options())
            .unwrap();
        assert!(!result.root_created());
        assert_eq!(result.created_count(), 4);
    }

    // ========================================================================
    // Cancellation
    // ========================================================================

    #[test]
    fn cancellation_stops_between_entries() {
        let token = CancellationToken::new();
        let recorder = Recorder {
            cancel_after_first: Some(token.clone()),
            ..Recorder::default()
        };

        let materializer = Materializer::new(Box::new(empty_root())).with_cancellation(token);
        let result = materializer
            .materialize_with(&scenario(), ROOT, &options(), &recorder)
            .unwrap();

        assert_eq!(result.status(), RunStatus::Cancelled);
        assert_eq!(result.created_count(), 1);
        assert_eq!(result.not_attempted_count(), 3);
        assert_eq!(recorder.paths.borrow().len(), 1);
    }
}
