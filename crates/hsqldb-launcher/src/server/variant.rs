use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Flavour of HSQLDB network server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerVariant {
    /// Plain data-protocol server.
    Server,
    /// HTTP-fronted server.
    WebServer,
}

/// Mode strings accepted by [`ServerVariant::from_str`].
const VARIANTS: [(&str, ServerVariant); 2] = [
    ("server", ServerVariant::Server),
    ("webserver", ServerVariant::WebServer),
];

impl ServerVariant {
    /// Fully qualified main class of the variant.
    #[must_use]
    pub const fn main_class(self) -> &'static str {
        match self {
            Self::Server => "org.hsqldb.server.Server",
            Self::WebServer => "org.hsqldb.server.WebServer",
        }
    }

    /// Port the variant listens on when none is configured.
    #[must_use]
    pub const fn default_port(self, tls: bool) -> u16 {
        match (self, tls) {
            (Self::Server, false) => 9001,
            (Self::Server, true) => 554,
            (Self::WebServer, false) => 80,
            (Self::WebServer, true) => 443,
        }
    }

    /// Mode string selecting the variant.
    #[must_use]
    pub const fn mode(self) -> &'static str {
        match self {
            Self::Server => "server",
            Self::WebServer => "webserver",
        }
    }
}

impl fmt::Display for ServerVariant {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.mode())
    }
}

impl FromStr for ServerVariant {
    type Err = ConfigurationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        VARIANTS
            .iter()
            .find(|(mode, _)| mode.eq_ignore_ascii_case(value))
            .map(|(_, variant)| *variant)
            .ok_or_else(|| ConfigurationError::UnsupportedMode {
                mode: value.to_owned(),
            })
    }
}

/// Configuration mistakes that stop the launch before a server exists.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The configured mode names no known server variant.
    #[error("unsupported server mode [{mode}]; try 'server' instead")]
    UnsupportedMode {
        /// Mode exactly as configured.
        mode: String,
    },
}

impl ConfigurationError {
    /// Offending mode string.
    #[must_use]
    pub fn mode(&self) -> &str {
        match self {
            Self::UnsupportedMode { mode } => mode.as_str(),
        }
    }
}
