//! Structured reporting of lifecycle events.

use std::sync::Arc;

use crate::cleanup::CleanupReport;
use crate::lifecycle::{LaunchError, LifecycleStage};

const HEALTH_TARGET: &str = "hsqldb_launcher::health";

/// Confirmation logged once the server is up.
pub const LAUNCHED_MESSAGE: &str = "HSQL Launched";

/// Prefix of the status line naming the live database.
pub const LIVE_NAME_PREFIX: &str = "Live name: ";

/// The three human-readable status lines of a successful launch.
#[must_use]
pub fn status_lines(state_descriptor: &str, live_name: &str) -> [String; 3] {
    [
        LAUNCHED_MESSAGE.to_owned(),
        state_descriptor.to_owned(),
        format!("{LIVE_NAME_PREFIX}{live_name}"),
    ]
}

/// Observer notified as the lifecycle progresses.
pub trait LifecycleReporter: Send + Sync {
    /// Invoked each time the lifecycle enters a stage.
    fn stage_reached(&self, stage: LifecycleStage);

    /// Invoked before stale database files are deleted.
    fn entry_cleanup_starting(&self, db_name: &str);

    /// Invoked after stale database files were deleted.
    fn entry_cleanup_finished(&self, report: CleanupReport);

    /// Invoked once the server accepts connections.
    fn launched(&self, state_descriptor: &str, live_name: &str);

    /// Invoked after artefacts were registered for exit-time deletion.
    fn exit_cleanup_scheduled(&self, scheduled: usize);

    /// Invoked when the launch sequence stops with an error.
    fn launch_failed(&self, error: &LaunchError);
}

impl<T> LifecycleReporter for Arc<T>
where
    T: LifecycleReporter + ?Sized,
{
    fn stage_reached(&self, stage: LifecycleStage) {
        (**self).stage_reached(stage);
    }

    fn entry_cleanup_starting(&self, db_name: &str) {
        (**self).entry_cleanup_starting(db_name);
    }

    fn entry_cleanup_finished(&self, report: CleanupReport) {
        (**self).entry_cleanup_finished(report);
    }

    fn launched(&self, state_descriptor: &str, live_name: &str) {
        (**self).launched(state_descriptor, live_name);
    }

    fn exit_cleanup_scheduled(&self, scheduled: usize) {
        (**self).exit_cleanup_scheduled(scheduled);
    }

    fn launch_failed(&self, error: &LaunchError) {
        (**self).launch_failed(error);
    }
}

/// Default reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredLifecycleReporter;

impl StructuredLifecycleReporter {
    /// Builds a new reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl LifecycleReporter for StructuredLifecycleReporter {
    fn stage_reached(&self, stage: LifecycleStage) {
        tracing::debug!(
            target: HEALTH_TARGET,
            event = "stage_reached",
            stage = %stage,
            "lifecycle stage reached"
        );
    }

    fn entry_cleanup_starting(&self, db_name: &str) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "entry_cleanup_starting",
            db_name,
            "deleting database files on entry"
        );
    }

    fn entry_cleanup_finished(&self, report: CleanupReport) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "entry_cleanup_finished",
            removed = report.removed,
            failed = report.failed,
            "entry cleanup finished"
        );
    }

    fn launched(&self, state_descriptor: &str, live_name: &str) {
        for line in status_lines(state_descriptor, live_name) {
            tracing::info!(target: HEALTH_TARGET, event = "launched", "{line}");
        }
    }

    fn exit_cleanup_scheduled(&self, scheduled: usize) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "exit_cleanup_scheduled",
            scheduled,
            "database artefacts scheduled for deletion at exit"
        );
    }

    fn launch_failed(&self, error: &LaunchError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "launch_failed",
            error = %error,
            "server launch failed"
        );
    }
}
