use hsqldb_config::{Config, DEFAULT_DB_NAME, DEFAULT_MODE};

/// Inputs the lifecycle needs to launch one server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// `server` or `webserver`, matched case-insensitively.
    pub mode: String,
    /// Database name; may be a `/`-separated path.
    pub db_name: String,
    /// Suppress per-query output.
    pub silent: bool,
    /// Emit JDBC trace messages.
    pub trace: bool,
    /// Serve over TLS sockets.
    pub tls: bool,
    /// Listening port; `0` keeps the variant default.
    pub port: u16,
    /// Use in-memory storage.
    pub is_transient: bool,
    /// Delete files prefixed with `db_name` before starting.
    pub delete_on_entry: bool,
    /// Delete the database artefacts at exit.
    pub delete_on_exit: bool,
}

impl ServerConfig {
    /// Builds a config for `db_name` with every other field defaulted.
    #[must_use]
    pub fn named(db_name: impl Into<String>) -> Self {
        Self {
            db_name: db_name.into(),
            ..Self::default()
        }
    }

    /// Returns `true` when artefacts should be scheduled for exit deletion.
    #[must_use]
    pub const fn schedules_exit_cleanup(&self) -> bool {
        !self.is_transient && self.delete_on_exit
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            mode: DEFAULT_MODE.to_owned(),
            db_name: DEFAULT_DB_NAME.to_owned(),
            silent: true,
            trace: false,
            tls: false,
            port: 0,
            is_transient: false,
            delete_on_entry: false,
            delete_on_exit: false,
        }
    }
}

impl From<&Config> for ServerConfig {
    fn from(config: &Config) -> Self {
        Self {
            mode: config.mode.clone(),
            db_name: config.db_name.clone(),
            silent: config.silent,
            trace: config.trace,
            tls: config.tls,
            port: config.port,
            is_transient: config.is_transient,
            delete_on_entry: config.delete_on_entry,
            delete_on_exit: config.delete_on_exit,
        }
    }
}
