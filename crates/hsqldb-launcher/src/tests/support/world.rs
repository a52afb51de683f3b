//! Scenario world: a scratch working directory plus the recording
//! collaborators handed to the lifecycle manager.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use crate::cleanup::PendingDeletions;
use crate::lifecycle::{LaunchError, LifecycleManager, RunningServer, ServerConfig};

use super::reporter::RecordingLifecycleReporter;
use super::server_factory::{RecordingServer, RecordingServerFactory};

/// State shared by the steps of one scenario.
pub struct LauncherWorld {
    work_dir: TempDir,
    pub config: ServerConfig,
    pub factory: RecordingServerFactory,
    pub reporter: Arc<RecordingLifecycleReporter>,
    pub pending: Arc<PendingDeletions>,
    running: Option<RunningServer<RecordingServer>>,
    error: Option<LaunchError>,
}

impl LauncherWorld {
    /// Builds a world with a default configuration and an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            work_dir: TempDir::new().expect("create working directory"),
            config: ServerConfig::default(),
            factory: RecordingServerFactory::default(),
            reporter: Arc::new(RecordingLifecycleReporter::default()),
            pending: Arc::new(PendingDeletions::new()),
            running: None,
            error: None,
        }
    }

    /// Directory the lifecycle operates in.
    #[must_use]
    pub fn work_dir(&self) -> &Path {
        self.work_dir.path()
    }

    /// Creates an empty file, and its parents, relative to the working
    /// directory.
    pub fn create_file(&self, relative: &str) -> PathBuf {
        let path = self.work_dir().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent directories");
        }
        fs::write(&path, b"").expect("write file");
        path
    }

    /// Runs the launch sequence once.
    pub fn launch(&mut self) {
        if self.running.is_some() || self.error.is_some() {
            return;
        }
        let manager = LifecycleManager::new(
            self.factory.clone(),
            self.pending.clone(),
            self.reporter.clone(),
            self.work_dir(),
        );
        match manager.launch(&self.config) {
            Ok(running) => self.running = Some(running),
            Err(error) => self.error = Some(error),
        }
    }

    /// Handle of the started server, when the launch succeeded.
    #[must_use]
    pub fn running(&self) -> Option<&RunningServer<RecordingServer>> {
        self.running.as_ref()
    }

    /// Error returned by the launch, when it failed.
    #[must_use]
    pub fn error(&self) -> Option<&LaunchError> {
        self.error.as_ref()
    }

    /// Stops the started server.
    pub fn stop(&mut self) {
        let running = self.running.take().expect("server should be running");
        running.stop().expect("stop should succeed");
    }
}

impl Default for LauncherWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Default scenario world.
#[must_use]
pub fn world() -> RefCell<LauncherWorld> {
    RefCell::new(LauncherWorld::new())
}
