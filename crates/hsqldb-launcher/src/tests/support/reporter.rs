//! Test double for [`LifecycleReporter`] that records events for assertions.

use std::sync::Mutex;

use crate::cleanup::CleanupReport;
use crate::health::LifecycleReporter;
use crate::lifecycle::{LaunchError, LifecycleStage};

/// Lifecycle events captured during a test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// A stage was reached.
    Stage(LifecycleStage),
    /// Entry cleanup began for the database name.
    EntryCleanupStarting(String),
    /// Entry cleanup ended.
    EntryCleanupFinished(CleanupReport),
    /// The server is up.
    Launched {
        state_descriptor: String,
        live_name: String,
    },
    /// Artefacts were scheduled for exit deletion.
    ExitCleanupScheduled(usize),
    /// The launch failed with a message.
    LaunchFailed(String),
}

/// Records lifecycle events for assertions.
#[derive(Debug, Default)]
pub struct RecordingLifecycleReporter {
    events: Mutex<Vec<LifecycleEvent>>,
}

impl RecordingLifecycleReporter {
    /// Captures a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.events
            .lock()
            .expect("lifecycle reporter mutex poisoned")
            .clone()
    }

    /// Stages reached, in order.
    #[must_use]
    pub fn stages(&self) -> Vec<LifecycleStage> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                LifecycleEvent::Stage(stage) => Some(stage),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: LifecycleEvent) {
        self.events
            .lock()
            .expect("lifecycle reporter mutex poisoned")
            .push(event);
    }
}

impl LifecycleReporter for RecordingLifecycleReporter {
    fn stage_reached(&self, stage: LifecycleStage) {
        self.record(LifecycleEvent::Stage(stage));
    }

    fn entry_cleanup_starting(&self, db_name: &str) {
        self.record(LifecycleEvent::EntryCleanupStarting(db_name.to_owned()));
    }

    fn entry_cleanup_finished(&self, report: CleanupReport) {
        self.record(LifecycleEvent::EntryCleanupFinished(report));
    }

    fn launched(&self, state_descriptor: &str, live_name: &str) {
        self.record(LifecycleEvent::Launched {
            state_descriptor: state_descriptor.to_owned(),
            live_name: live_name.to_owned(),
        });
    }

    fn exit_cleanup_scheduled(&self, scheduled: usize) {
        self.record(LifecycleEvent::ExitCleanupScheduled(scheduled));
    }

    fn launch_failed(&self, error: &LaunchError) {
        self.record(LifecycleEvent::LaunchFailed(error.to_string()));
    }
}
