//! The seam between the lifecycle manager and the HSQLDB server.
//!
//! [`DatabaseServer`] is the contract the lifecycle drives; the engine behind
//! it is external. [`ServerFactory`] turns a configured mode into a server,
//! rejecting unknown modes before anything is constructed.

mod errors;
pub(crate) mod process;
mod variant;

pub use errors::ServerError;
pub use process::{Launcher, ProcessServer, ProcessServerFactory};
pub use variant::{ConfigurationError, ServerVariant};

/// Index of the only database slot the launcher uses.
pub const PRIMARY_SLOT: usize = 0;

/// Name and storage URL registered in a server database slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSlot {
    /// Name clients use to address the database.
    pub name: String,
    /// Storage URL (`mem:` or `file:`).
    pub path: String,
}

/// Settings applied to a server before it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Suppress per-query output.
    pub silent: bool,
    /// Emit JDBC trace messages.
    pub trace: bool,
    /// Serve over TLS sockets.
    pub tls: bool,
    /// Explicit port; `None` keeps the variant default.
    pub port: Option<u16>,
    /// Database registered in [`PRIMARY_SLOT`].
    pub database: DatabaseSlot,
}

impl ServerSettings {
    /// Port the server listens on for `variant`.
    #[must_use]
    pub fn effective_port(&self, variant: ServerVariant) -> u16 {
        self.port.unwrap_or_else(|| variant.default_port(self.tls))
    }
}

/// A database server the lifecycle can configure, start and stop.
pub trait DatabaseServer: Send {
    /// Variant this server was built as.
    fn variant(&self) -> ServerVariant;

    /// Applies the settings used by the next [`DatabaseServer::start`].
    fn configure(&mut self, settings: ServerSettings);

    /// Starts the server, returning once it accepts connections.
    fn start(&mut self) -> Result<(), ServerError>;

    /// Free-form description of the server state.
    fn state_descriptor(&self) -> String;

    /// Name currently registered in `slot`, as the server reports it.
    fn database_name(&self, slot: usize) -> Option<String>;

    /// Stops a started server.
    fn stop(&mut self) -> Result<(), ServerError>;
}

/// Builds servers for the configured mode.
pub trait ServerFactory {
    /// Server type produced by this factory.
    type Server: DatabaseServer;

    /// Builds an unconfigured server of the given variant.
    fn build(&self, variant: ServerVariant) -> Self::Server;

    /// Parses `mode` and builds the matching server.
    ///
    /// The mode is validated before any server is built.
    fn create(&self, mode: &str) -> Result<Self::Server, ConfigurationError> {
        let variant = mode.parse::<ServerVariant>()?;
        Ok(self.build(variant))
    }
}
