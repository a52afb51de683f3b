use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{self, Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use super::{CLEANUP_TARGET, CleanupReport};

/// Files a file-backed HSQLDB database writes next to its name.
pub const ARTIFACT_SUFFIXES: [&str; 5] = [".log", ".properties", ".script", ".data", ".backup"];

/// Capability to defer a file deletion until the process winds down.
#[cfg_attr(test, mockall::automock)]
pub trait ExitRegistrar: Send + Sync {
    /// Records `path` for deletion at normal termination.
    fn register(&self, path: PathBuf);
}

impl<T> ExitRegistrar for Arc<T>
where
    T: ExitRegistrar + ?Sized,
{
    fn register(&self, path: PathBuf) {
        (**self).register(path);
    }
}

/// Exit-time deletion set owned by the process entry point.
///
/// Paths are only ever added while the launcher runs. The set is consumed
/// once, by [`PendingDeletions::run`] or, failing that, when the value is
/// dropped.
#[derive(Debug, Default)]
pub struct PendingDeletions {
    paths: Mutex<BTreeSet<PathBuf>>,
}

impl PendingDeletions {
    /// Builds an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered paths still awaiting deletion.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Returns `true` when nothing is awaiting deletion.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Snapshot of the registered paths in sorted order.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.entries().iter().cloned().collect()
    }

    /// Deletes every registered file and empties the set.
    ///
    /// Files that have already disappeared are skipped without being counted.
    pub fn run(&self) -> CleanupReport {
        let drained = std::mem::take(&mut *self.entries());
        let mut report = CleanupReport::default();
        for path in drained {
            match fs::remove_file(&path) {
                Ok(()) => {
                    debug!(
                        target: CLEANUP_TARGET,
                        file = %path.display(),
                        "removed artefact at exit"
                    );
                    report.removed += 1;
                }
                Err(error) if error.kind() == io::ErrorKind::NotFound => {}
                Err(error) => {
                    warn!(
                        target: CLEANUP_TARGET,
                        file = %path.display(),
                        %error,
                        "failed to remove artefact at exit"
                    );
                    report.failed += 1;
                }
            }
        }
        report
    }

    fn entries(&self) -> MutexGuard<'_, BTreeSet<PathBuf>> {
        self.paths.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ExitRegistrar for PendingDeletions {
    fn register(&self, path: PathBuf) {
        self.entries().insert(path);
    }
}

impl Drop for PendingDeletions {
    fn drop(&mut self) {
        if self.is_empty() {
            return;
        }
        let report = self.run();
        info!(
            target: CLEANUP_TARGET,
            removed = report.removed,
            failed = report.failed,
            "exit cleanup completed"
        );
    }
}

/// Registers `path` for exit-time deletion if it exists right now.
///
/// Returns `true` when the path was registered. Paths are made absolute
/// against the current directory so later directory changes cannot redirect
/// the deletion.
pub fn schedule_deletion(path: &Path, registrar: &dyn ExitRegistrar) -> bool {
    if !path.exists() {
        return false;
    }
    let absolute = path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    registrar.register(absolute);
    true
}

/// Paths of the artefacts a file-backed database named `db_name` writes.
#[must_use]
pub fn artifact_paths(work_dir: &Path, db_name: &str) -> [PathBuf; 5] {
    ARTIFACT_SUFFIXES.map(|suffix| work_dir.join(format!("{db_name}{suffix}")))
}

/// Schedules every existing artefact of `db_name` for exit-time deletion.
///
/// Returns the number of paths registered.
pub fn schedule_artifacts(work_dir: &Path, db_name: &str, registrar: &dyn ExitRegistrar) -> usize {
    artifact_paths(work_dir, db_name)
        .iter()
        .filter(|path| schedule_deletion(path, registrar))
        .count()
}
