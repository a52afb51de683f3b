//! Best-effort removal of database artefacts.
//!
//! Two policies are supported. Entry cleanup runs before the server starts and
//! aggressively removes anything in the working directory whose name starts
//! with the database name, recursing into directories left behind by earlier
//! runs. Exit cleanup is conservative: it registers only the exact artefact
//! files of a file-backed database, and only those present at registration
//! time, with an [`ExitRegistrar`] that deletes them when the process winds
//! down.
//!
//! Neither policy ever aborts the launch. Failures are tallied in a
//! [`CleanupReport`] instead.

mod entry;
mod exit;

pub use entry::delete_matching;
pub use exit::{
    ARTIFACT_SUFFIXES, ExitRegistrar, PendingDeletions, artifact_paths, schedule_artifacts,
    schedule_deletion,
};

#[cfg(test)]
pub(crate) use exit::MockExitRegistrar;

pub(crate) const CLEANUP_TARGET: &str = "hsqldb_launcher::cleanup";

/// Tally of a best-effort deletion pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Entries removed from the filesystem.
    pub removed: usize,
    /// Entries that could not be removed.
    pub failed: usize,
}

impl CleanupReport {
    /// Returns `true` when every attempted deletion succeeded.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failed == 0
    }

    pub(crate) fn absorb(&mut self, other: Self) {
        self.removed += other.removed;
        self.failed += other.failed;
    }
}
