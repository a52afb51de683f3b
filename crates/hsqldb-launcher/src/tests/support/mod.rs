//! Test doubles and the scenario world for the lifecycle suites.

mod reporter;
mod server_factory;
mod world;

pub use reporter::{LifecycleEvent, RecordingLifecycleReporter};
pub use server_factory::RecordingServerFactory;
pub use world::{LauncherWorld, world};
