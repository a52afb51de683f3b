use camino::Utf8PathBuf;

/// Server variant started when no mode is configured.
pub const DEFAULT_MODE: &str = "server";

/// Database name used when none is configured.
pub const DEFAULT_DB_NAME: &str = "test";

/// Default log filter expression used by the launcher.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// JVM launcher invoked by the process-backed server.
pub const DEFAULT_JAVA_BIN: &str = "java";

/// Class path entry holding the HSQLDB server classes.
pub const DEFAULT_HSQLDB_JAR: &str = "hsqldb.jar";

/// Milliseconds the launcher waits for the server to accept connections.
pub const DEFAULT_STARTUP_TIMEOUT_MS: u64 = 30_000;

/// Owned default mode, used by serde when the field is absent.
pub fn default_mode() -> String {
    DEFAULT_MODE.to_owned()
}

/// Owned default database name, used by serde when the field is absent.
pub fn default_db_name() -> String {
    DEFAULT_DB_NAME.to_owned()
}

/// Servers run quietly unless asked otherwise.
pub const fn default_silent() -> bool {
    true
}

/// Default log filter expression used by the launcher.
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the launcher.
pub fn default_log_format() -> crate::logging::LogFormat {
    crate::logging::LogFormat::Compact
}

/// Owned default JVM launcher.
pub fn default_java_bin() -> String {
    DEFAULT_JAVA_BIN.to_owned()
}

/// Default location of the HSQLDB jar.
pub fn default_hsqldb_jar() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_HSQLDB_JAR)
}

/// Default readiness budget in milliseconds.
pub const fn default_startup_timeout_ms() -> u64 {
    DEFAULT_STARTUP_TIMEOUT_MS
}
