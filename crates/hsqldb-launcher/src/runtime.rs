//! Wires configuration, telemetry and the lifecycle into the `hsqldb-run`
//! binary.

use std::env;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use ortho_config::OrthoError;
use thiserror::Error;
use tracing::info;

use hsqldb_config::Config;

use crate::cleanup::{CleanupReport, ExitRegistrar, PendingDeletions};
use crate::health::{LifecycleReporter, StructuredLifecycleReporter};
use crate::lifecycle::{LaunchError, LifecycleManager, ServerConfig};
use crate::server::{Launcher, ProcessServerFactory, ServerError, ServerFactory};
use crate::shutdown::{ShutdownError, ShutdownSignal, SystemShutdownSignal};
use crate::telemetry::{self, TelemetryError};

const RUNTIME_TARGET: &str = "hsqldb_launcher::runtime";

/// Errors that end a run of the binary.
#[derive(Debug, Error)]
pub enum RunError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Config {
        /// Underlying loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// The working directory could not be determined.
    #[error("failed to resolve working directory: {source}")]
    WorkDir {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
    /// The launch sequence failed.
    #[error(transparent)]
    Launch(#[from] LaunchError),
    /// Waiting for the shutdown signal failed.
    #[error("failed to wait for shutdown: {source}")]
    Shutdown {
        /// Underlying signal error.
        #[source]
        source: ShutdownError,
    },
    /// The server did not stop cleanly.
    #[error("failed to stop server: {source}")]
    Stop {
        /// Underlying server error.
        #[source]
        source: ServerError,
    },
}

/// Runs the launcher for `args`, writing any error to `stderr`.
///
/// The first argument is the program name.
pub fn run<I, T, W>(args: I, stderr: &mut W) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    W: Write,
{
    match run_from_args(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let _ = writeln!(stderr, "{error}");
            ExitCode::FAILURE
        }
    }
}

fn run_from_args<I, T>(args: I) -> Result<(), RunError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let config = Config::load_from_iter(args).map_err(|source| RunError::Config { source })?;
    telemetry::initialise(&config).map_err(|source| RunError::Telemetry { source })?;
    let work_dir = env::current_dir().map_err(|source| RunError::WorkDir { source })?;
    let shutdown = SystemShutdownSignal::new().map_err(|source| RunError::Shutdown { source })?;

    let factory = ProcessServerFactory::new(Launcher::from_config(&config));
    let reporter: Arc<dyn LifecycleReporter> = Arc::new(StructuredLifecycleReporter::new());
    run_with(
        &config,
        factory,
        &shutdown,
        reporter,
        &work_dir,
    )
    .map(|_| ())
}

/// Launches the server, blocks on `shutdown`, then stops the server and
/// deletes the artefacts scheduled during the launch.
///
/// `shutdown` must already be listening when this is called; signals raised
/// during the launch are otherwise lost.
///
/// Scheduled deletions run even when waiting or stopping fails; the first
/// such failure is returned afterwards.
pub fn run_with<F, S>(
    config: &Config,
    factory: F,
    shutdown: &S,
    reporter: Arc<dyn LifecycleReporter>,
    work_dir: &Path,
) -> Result<CleanupReport, RunError>
where
    F: ServerFactory,
    S: ShutdownSignal + ?Sized,
{
    let pending = Arc::new(PendingDeletions::new());
    let registrar: Arc<dyn ExitRegistrar> = pending.clone();
    let manager = LifecycleManager::new(factory, registrar, reporter, work_dir);

    let running = manager.launch(&ServerConfig::from(config))?;
    let waited = shutdown.wait();
    let stopped = running.stop();
    let report = pending.run();
    info!(
        target: RUNTIME_TARGET,
        removed = report.removed,
        failed = report.failed,
        "exit cleanup finished"
    );

    waited.map_err(|source| RunError::Shutdown { source })?;
    stopped.map_err(|source| RunError::Stop { source })?;
    Ok(report)
}
