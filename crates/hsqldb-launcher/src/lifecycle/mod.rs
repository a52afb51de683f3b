//! Launch sequencing for the HSQLDB server.

mod config;
mod errors;
mod manager;
mod stage;

pub use config::ServerConfig;
pub use errors::LaunchError;
pub use manager::{LifecycleManager, RunningServer};
pub use stage::LifecycleStage;

pub(crate) const LIFECYCLE_TARGET: &str = "hsqldb_launcher::lifecycle";
