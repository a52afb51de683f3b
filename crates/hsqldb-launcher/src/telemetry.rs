//! Launcher logging.
//!
//! Everything the launcher reports, including the three status lines, is a
//! `tracing` event written to standard error. The subscriber is built from
//! the `log_filter` and `log_format` settings and installed at most once per
//! process.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing::Subscriber;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::{EnvFilter, fmt};

use hsqldb_config::{Config, LogFormat};

static INSTALLED: OnceCell<()> = OnceCell::new();

/// Proof that the launcher's subscriber is in place.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryHandle;

/// Errors raised while installing the launcher's subscriber.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// `log_filter` is not a valid filter directive.
    #[error("invalid log filter '{filter}': {source}")]
    Filter {
        /// Directive as configured.
        filter: String,
        /// Parser diagnostic.
        #[source]
        source: ParseError,
    },
    /// Another subscriber already owns the process.
    #[error("failed to install the log subscriber: {source}")]
    Subscriber {
        /// Error from `tracing`.
        #[source]
        source: SetGlobalDefaultError,
    },
}

/// Installs the launcher's subscriber on first use.
///
/// Later calls leave the installed subscriber alone, even when `config`
/// differs, and succeed with a new handle.
///
/// # Examples
///
/// ```
/// use hsqldb_config::Config;
///
/// let config = Config::default();
/// let first = hsqldb_launcher::initialise_telemetry(&config)?;
/// let again = hsqldb_launcher::initialise_telemetry(&config)?;
/// drop((first, again));
/// # Ok::<(), hsqldb_launcher::TelemetryError>(())
/// ```
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    INSTALLED
        .get_or_try_init(|| install(config))
        .map(|()| TelemetryHandle)
}

fn install(config: &Config) -> Result<(), TelemetryError> {
    let filter = parse_filter(config.log_filter())?;
    let writer = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_timer(UtcTime::rfc_3339());

    let subscriber: Box<dyn Subscriber + Send + Sync> = match config.log_format() {
        LogFormat::Compact => Box::new(writer.compact().finish()),
        LogFormat::Json => Box::new(writer.json().flatten_event(true).finish()),
    };
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|source| TelemetryError::Subscriber { source })
}

fn parse_filter(filter: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(filter).map_err(|source| TelemetryError::Filter {
        filter: filter.to_owned(),
        source,
    })
}
