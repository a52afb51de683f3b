//! Termination signals that end a launcher run.
//!
//! Handlers are installed when [`SystemShutdownSignal`] is built, so a signal
//! arriving while the server is still starting is queued instead of killing
//! the launcher outright. [`ShutdownSignal::wait`] then returns as soon as it
//! is called and the server is stopped through its handle as usual.

use std::io;
use std::sync::{Mutex, PoisonError};

use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
use signal_hook::iterator::Signals;
use thiserror::Error;
use tracing::info;

const SHUTDOWN_TARGET: &str = "hsqldb_launcher::shutdown";

/// Signals that request a shutdown.
pub const SHUTDOWN_SIGNALS: [i32; 4] = [SIGTERM, SIGINT, SIGQUIT, SIGHUP];

/// Blocks the caller until the launcher should shut down.
pub trait ShutdownSignal: Send + Sync {
    /// Returns once shutdown was requested.
    fn wait(&self) -> Result<(), ShutdownError>;
}

/// Errors reported by shutdown listeners.
#[derive(Debug, Error)]
pub enum ShutdownError {
    /// Installing signal handlers failed.
    #[error("failed to install signal handlers: {source}")]
    Install {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

/// Listener for [`SHUTDOWN_SIGNALS`].
pub struct SystemShutdownSignal {
    signals: Mutex<Signals>,
}

impl SystemShutdownSignal {
    /// Installs the handlers; from here on the signals are captured.
    pub fn new() -> Result<Self, ShutdownError> {
        let signals =
            Signals::new(SHUTDOWN_SIGNALS).map_err(|source| ShutdownError::Install { source })?;
        Ok(Self {
            signals: Mutex::new(signals),
        })
    }
}

impl ShutdownSignal for SystemShutdownSignal {
    fn wait(&self) -> Result<(), ShutdownError> {
        let mut signals = self.signals.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(signal) = signals.forever().next() {
            info!(target: SHUTDOWN_TARGET, signal, "shutdown requested");
        }
        Ok(())
    }
}

impl std::fmt::Debug for SystemShutdownSignal {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("SystemShutdownSignal")
            .field("signals", &SHUTDOWN_SIGNALS)
            .finish()
    }
}
