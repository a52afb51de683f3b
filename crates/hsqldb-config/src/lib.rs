//! Shared configuration for the HSQLDB launcher.
//!
//! Values are layered by `ortho_config`: built-in defaults, then a TOML file
//! (`--config-path` or the discovered `.hsqldb.toml`), then `HSQLDB_*`
//! environment variables, then command-line flags. The resulting [`Config`]
//! carries the server settings consumed by the lifecycle manager alongside the
//! ambient settings for logging and for the JVM process that hosts the server.

mod defaults;
mod logging;

use std::ffi::OsString;
use std::sync::Arc;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::{OrthoConfig, OrthoError};
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_DB_NAME, DEFAULT_HSQLDB_JAR, DEFAULT_JAVA_BIN, DEFAULT_LOG_FILTER, DEFAULT_MODE,
    DEFAULT_STARTUP_TIMEOUT_MS, default_db_name, default_hsqldb_jar, default_java_bin,
    default_log_filter, default_log_filter_string, default_log_format, default_mode,
    default_silent, default_startup_timeout_ms,
};
pub use logging::LogFormat;

/// Boolean setting spelled as a valued option on the command line.
///
/// The derive turns a field typed literally as `bool` into a presence flag
/// whose absence still reports `false`, which would override the file and
/// environment layers. Fields of this type take `--flag true|false` instead
/// and contribute nothing to the command-line layer when omitted.
pub type Switch = bool;

/// Launcher configuration resolved from every configuration layer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "HSQLDB")]
pub struct Config {
    /// Server variant: `server` or `webserver`, matched case-insensitively.
    #[serde(default = "defaults::default_mode")]
    pub mode: String,
    /// Database name; may be a `/`-separated path.
    #[serde(default = "defaults::default_db_name")]
    pub db_name: String,
    /// Suppress per-query output from the server.
    #[serde(default = "defaults::default_silent")]
    pub silent: Switch,
    /// Emit JDBC trace messages.
    #[serde(default)]
    pub trace: Switch,
    /// Serve over TLS sockets.
    #[serde(default)]
    pub tls: Switch,
    /// Listening port; `0` keeps the variant's built-in default.
    #[serde(default)]
    pub port: u16,
    /// Use in-memory (`mem:`) storage instead of files (`file:`).
    #[serde(default)]
    pub is_transient: Switch,
    /// Remove files prefixed with the database name before starting.
    #[serde(default)]
    pub delete_on_entry: Switch,
    /// Remove the database artifact files when the launcher exits.
    #[serde(default)]
    pub delete_on_exit: Switch,
    /// `tracing` filter expression.
    #[serde(default = "defaults::default_log_filter_string")]
    pub log_filter: String,
    /// Log output format.
    #[serde(default = "defaults::default_log_format")]
    pub log_format: LogFormat,
    /// JVM launcher used to host the server.
    #[serde(default = "defaults::default_java_bin")]
    pub java_bin: String,
    /// Class path entry holding the HSQLDB server classes.
    #[serde(default = "defaults::default_hsqldb_jar")]
    pub hsqldb_jar: Utf8PathBuf,
    /// How long to wait for the server to accept connections.
    #[serde(default = "defaults::default_startup_timeout_ms")]
    pub startup_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            db_name: default_db_name(),
            silent: default_silent(),
            trace: false,
            tls: false,
            port: 0,
            is_transient: false,
            delete_on_entry: false,
            delete_on_exit: false,
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            java_bin: default_java_bin(),
            hsqldb_jar: default_hsqldb_jar(),
            startup_timeout_ms: default_startup_timeout_ms(),
        }
    }
}

impl Config {
    /// Loads configuration from an explicit argument list.
    ///
    /// The first item is treated as the program name.
    pub fn load_from_iter<I, T>(args: I) -> Result<Self, Arc<OrthoError>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as OrthoConfig>::load_from_iter(args)
    }

    /// Configured `tracing` filter.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Configured log format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// JVM launcher binary.
    #[must_use]
    pub fn java_bin(&self) -> &str {
        self.java_bin.as_str()
    }

    /// Jar passed to the JVM class path.
    #[must_use]
    pub fn hsqldb_jar(&self) -> &Utf8Path {
        self.hsqldb_jar.as_path()
    }

    /// Readiness budget for the server process.
    #[must_use]
    pub const fn startup_timeout(&self) -> Duration {
        Duration::from_millis(self.startup_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_match_plugin_defaults() {
        let config = Config::default();
        assert_eq!(config.mode, "server");
        assert_eq!(config.db_name, "test");
        assert!(config.silent);
        assert!(!config.trace);
        assert!(!config.tls);
        assert_eq!(config.port, 0);
        assert!(!config.is_transient);
        assert!(!config.delete_on_entry);
        assert!(!config.delete_on_exit);
    }

    #[rstest]
    fn startup_timeout_is_expressed_in_milliseconds() {
        let config = Config {
            startup_timeout_ms: 1_500,
            ..Config::default()
        };
        assert_eq!(config.startup_timeout(), Duration::from_millis(1_500));
    }

    #[rstest]
    #[case("json", LogFormat::Json)]
    #[case("COMPACT", LogFormat::Compact)]
    fn log_format_parses_case_insensitively(#[case] raw: &str, #[case] expected: LogFormat) {
        let parsed: LogFormat = raw.parse().expect("log format should parse");
        assert_eq!(parsed, expected);
    }
}
