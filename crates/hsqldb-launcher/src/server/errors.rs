//! Failures reported by a database server implementation.

use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

/// Errors reported while starting or stopping a server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The server process could not be spawned.
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        /// Program that failed to launch.
        program: String,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The server exited before accepting connections.
    #[error("server exited before accepting connections ({status})")]
    Exited {
        /// Exit status reported by the process.
        status: ExitStatus,
    },
    /// The server did not accept connections within the startup budget.
    #[error("server did not accept connections on port {port} within {timeout:?}")]
    StartupTimeout {
        /// Port that was polled.
        port: u16,
        /// Budget that elapsed.
        timeout: Duration,
    },
    /// Polling the server process failed.
    #[error("failed to monitor server process: {source}")]
    Monitor {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// `start` was called on a server that already started.
    #[error("server already started")]
    AlreadyStarted,
    /// `stop` was called on a server that never started.
    #[error("server not started")]
    NotStarted,
    /// The server could not be stopped.
    #[error("failed to stop server: {source}")]
    Stop {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}
