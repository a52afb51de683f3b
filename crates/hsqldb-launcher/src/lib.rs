//! Launches an HSQLDB server for integration testing.
//!
//! Given a [`ServerConfig`], the [`LifecycleManager`] optionally deletes stale
//! files left by an earlier run, builds the server variant named by the
//! configured mode, registers the database in the primary slot, starts it and
//! reports three status lines. For persistent databases it can also register
//! the server's artefact files for deletion when the process exits.
//!
//! The server itself is reached through the [`DatabaseServer`] trait. The
//! binary uses [`ProcessServer`], which runs the HSQLDB jar in a child JVM;
//! tests substitute recording doubles. Lifecycle events go to a
//! [`LifecycleReporter`], and the production [`StructuredLifecycleReporter`]
//! emits them as `tracing` events.
//!
//! Deletions deferred to exit are owned by an explicit [`PendingDeletions`]
//! registry rather than a process-global hook. The binary drains it after the
//! server stops.

mod cleanup;
mod health;
mod identity;
mod lifecycle;
mod runtime;
mod server;
mod shutdown;
mod telemetry;

pub use cleanup::{
    ARTIFACT_SUFFIXES, CleanupReport, ExitRegistrar, PendingDeletions, artifact_paths,
    delete_matching, schedule_artifacts, schedule_deletion,
};
pub use health::{
    LAUNCHED_MESSAGE, LIVE_NAME_PREFIX, LifecycleReporter, StructuredLifecycleReporter,
    status_lines,
};
pub use identity::{PATH_SEPARATOR, ResolvedIdentity, StorageMode, URL_PROPERTIES, resolve};
pub use lifecycle::{LaunchError, LifecycleManager, LifecycleStage, RunningServer, ServerConfig};
pub use runtime::{RunError, run, run_with};
pub use server::{
    ConfigurationError, DatabaseServer, DatabaseSlot, Launcher, PRIMARY_SLOT, ProcessServer,
    ProcessServerFactory, ServerError, ServerFactory, ServerSettings, ServerVariant,
};
pub use shutdown::{SHUTDOWN_SIGNALS, ShutdownError, ShutdownSignal, SystemShutdownSignal};
pub use telemetry::{TelemetryError, TelemetryHandle, initialise as initialise_telemetry};

#[cfg(test)]
mod tests;
