//! Sequences cleanup, construction, configuration and start of the server.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::cleanup::{ExitRegistrar, delete_matching, schedule_artifacts};
use crate::health::LifecycleReporter;
use crate::identity::{ResolvedIdentity, resolve};
use crate::server::{
    DatabaseServer, DatabaseSlot, PRIMARY_SLOT, ServerError, ServerFactory, ServerSettings,
};

use super::{LIFECYCLE_TARGET, LaunchError, LifecycleStage, ServerConfig};

/// Launches one server per call from a [`ServerConfig`].
///
/// The sequence is linear and stops at the first failure:
///
/// 1. optional entry cleanup of files prefixed with the database name;
/// 2. server construction from the configured mode;
/// 3. configuration, including the primary database slot;
/// 4. start;
/// 5. optional registration of the artefact files for exit-time deletion;
/// 6. status reporting.
///
/// Only an unsupported mode and a failing start stop the sequence. Nothing is
/// rolled back on failure.
pub struct LifecycleManager<F> {
    factory: F,
    registrar: Arc<dyn ExitRegistrar>,
    reporter: Arc<dyn LifecycleReporter>,
    work_dir: PathBuf,
}

impl<F> LifecycleManager<F>
where
    F: ServerFactory,
{
    /// Builds a manager operating on `work_dir`.
    pub fn new(
        factory: F,
        registrar: Arc<dyn ExitRegistrar>,
        reporter: Arc<dyn LifecycleReporter>,
        work_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            factory,
            registrar,
            reporter,
            work_dir: work_dir.into(),
        }
    }

    /// Directory scanned for stale files and holding the artefacts.
    #[must_use]
    pub fn work_dir(&self) -> &Path {
        self.work_dir.as_path()
    }

    /// Runs the launch sequence and hands back the started server.
    pub fn launch(&self, config: &ServerConfig) -> Result<RunningServer<F::Server>, LaunchError> {
        info!(
            target: LIFECYCLE_TARGET,
            mode = %config.mode,
            db_name = %config.db_name,
            transient = config.is_transient,
            "starting launch sequence"
        );
        self.reporter.stage_reached(LifecycleStage::Init);

        if config.delete_on_entry {
            self.reporter.entry_cleanup_starting(&config.db_name);
            let report = delete_matching(&self.work_dir, &config.db_name);
            self.reporter.entry_cleanup_finished(report);
            self.reporter.stage_reached(LifecycleStage::EntryCleanup);
        }

        let mut server = self
            .factory
            .create(&config.mode)
            .map_err(|source| self.fail(source.into()))?;
        self.reporter.stage_reached(LifecycleStage::Constructed);

        let identity = resolve(&config.db_name, config.is_transient);
        server.configure(settings_for(config, &identity));
        self.reporter.stage_reached(LifecycleStage::Configured);

        server.start().map_err(|source| self.fail(source.into()))?;
        self.reporter.stage_reached(LifecycleStage::Started);

        let scheduled_deletions = if config.schedules_exit_cleanup() {
            let scheduled =
                schedule_artifacts(&self.work_dir, &config.db_name, self.registrar.as_ref());
            self.reporter.exit_cleanup_scheduled(scheduled);
            self.reporter
                .stage_reached(LifecycleStage::ExitCleanupScheduled);
            scheduled
        } else {
            0
        };

        let state_descriptor = server.state_descriptor();
        let live_name = server
            .database_name(PRIMARY_SLOT)
            .unwrap_or_else(|| identity.name().to_owned());
        self.reporter.launched(&state_descriptor, &live_name);

        Ok(RunningServer {
            server,
            identity,
            live_name,
            state_descriptor,
            scheduled_deletions,
            reporter: Arc::clone(&self.reporter),
        })
    }

    fn fail(&self, error: LaunchError) -> LaunchError {
        self.reporter.launch_failed(&error);
        error
    }
}

fn settings_for(config: &ServerConfig, identity: &ResolvedIdentity) -> ServerSettings {
    ServerSettings {
        silent: config.silent,
        trace: config.trace,
        tls: config.tls,
        port: (config.port != 0).then_some(config.port),
        database: DatabaseSlot {
            name: identity.name().to_owned(),
            path: identity.connection_url().to_owned(),
        },
    }
}

/// A started server together with what the launch resolved.
pub struct RunningServer<S> {
    server: S,
    identity: ResolvedIdentity,
    live_name: String,
    state_descriptor: String,
    scheduled_deletions: usize,
    reporter: Arc<dyn LifecycleReporter>,
}

impl<S> RunningServer<S>
where
    S: DatabaseServer,
{
    /// Identity used to configure the primary slot.
    #[must_use]
    pub const fn identity(&self) -> &ResolvedIdentity {
        &self.identity
    }

    /// Database name as reported back by the server after start.
    #[must_use]
    pub fn live_name(&self) -> &str {
        self.live_name.as_str()
    }

    /// State descriptor captured right after start.
    #[must_use]
    pub fn state_descriptor(&self) -> &str {
        self.state_descriptor.as_str()
    }

    /// Number of artefact files registered for exit-time deletion.
    #[must_use]
    pub const fn scheduled_deletions(&self) -> usize {
        self.scheduled_deletions
    }

    /// The running server.
    #[must_use]
    pub const fn server(&self) -> &S {
        &self.server
    }

    /// Stops the server and consumes the handle.
    pub fn stop(mut self) -> Result<(), ServerError> {
        self.server.stop()?;
        self.reporter.stage_reached(LifecycleStage::Stopped);
        info!(target: LIFECYCLE_TARGET, "server stopped");
        Ok(())
    }
}

impl<S> fmt::Debug for RunningServer<S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("RunningServer")
            .field("identity", &self.identity)
            .field("live_name", &self.live_name)
            .field("state_descriptor", &self.state_descriptor)
            .field("scheduled_deletions", &self.scheduled_deletions)
            .finish_non_exhaustive()
    }
}
