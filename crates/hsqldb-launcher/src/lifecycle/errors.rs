//! Error surface of the launch sequence.

use thiserror::Error;

use crate::server::{ConfigurationError, ServerError};

/// Errors that stop the launch sequence.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The configured mode names no server variant.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// The server reported a failure; passed through unchanged.
    #[error(transparent)]
    Server(#[from] ServerError),
}
