//! Recording [`ServerFactory`] whose servers never leave the process.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::server::{DatabaseServer, ServerError, ServerFactory, ServerSettings, ServerVariant};

#[derive(Debug, Default)]
struct FactoryState {
    built: Vec<ServerVariant>,
    configured: Vec<ServerSettings>,
    starts: usize,
    stops: usize,
    fail_start: bool,
    reported_name: Option<String>,
}

/// Factory sharing one recording state with every server it builds.
#[derive(Debug, Clone, Default)]
pub struct RecordingServerFactory {
    state: Arc<Mutex<FactoryState>>,
}

impl RecordingServerFactory {
    /// Makes every subsequent `start` fail.
    pub fn fail_start(&self) {
        self.lock().fail_start = true;
    }

    /// Makes servers report `name` for the primary slot after start.
    pub fn report_name(&self, name: &str) {
        self.lock().reported_name = Some(name.to_owned());
    }

    /// Variants built so far.
    pub fn built(&self) -> Vec<ServerVariant> {
        self.lock().built.clone()
    }

    /// Settings applied so far.
    pub fn configured(&self) -> Vec<ServerSettings> {
        self.lock().configured.clone()
    }

    /// Number of `start` calls.
    pub fn starts(&self) -> usize {
        self.lock().starts
    }

    /// Number of `stop` calls.
    pub fn stops(&self) -> usize {
        self.lock().stops
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FactoryState> {
        self.state.lock().expect("factory state mutex poisoned")
    }
}

impl ServerFactory for RecordingServerFactory {
    type Server = RecordingServer;

    fn build(&self, variant: ServerVariant) -> Self::Server {
        self.lock().built.push(variant);
        RecordingServer {
            variant,
            state: Arc::clone(&self.state),
            settings: None,
            running: false,
        }
    }
}

/// Server double that records each call in the factory state.
#[derive(Debug)]
pub struct RecordingServer {
    variant: ServerVariant,
    state: Arc<Mutex<FactoryState>>,
    settings: Option<ServerSettings>,
    running: bool,
}

impl RecordingServer {
    fn lock(&self) -> std::sync::MutexGuard<'_, FactoryState> {
        self.state.lock().expect("factory state mutex poisoned")
    }
}

impl DatabaseServer for RecordingServer {
    fn variant(&self) -> ServerVariant {
        self.variant
    }

    fn configure(&mut self, settings: ServerSettings) {
        self.lock().configured.push(settings.clone());
        self.settings = Some(settings);
    }

    fn start(&mut self) -> Result<(), ServerError> {
        let port = self.settings.as_ref().map_or(self.variant.default_port(false), |settings| {
            settings.effective_port(self.variant)
        });
        let mut state = self.lock();
        state.starts += 1;
        if state.fail_start {
            return Err(ServerError::StartupTimeout {
                port,
                timeout: Duration::from_millis(1),
            });
        }
        drop(state);
        self.running = true;
        Ok(())
    }

    fn state_descriptor(&self) -> String {
        if self.running {
            format!("ONLINE ({})", self.variant)
        } else {
            String::from("SHUTDOWN")
        }
    }

    fn database_name(&self, slot: usize) -> Option<String> {
        if slot != crate::server::PRIMARY_SLOT {
            return None;
        }
        let reported = self.lock().reported_name.clone();
        reported.or_else(|| {
            self.settings
                .as_ref()
                .map(|settings| settings.database.name.clone())
        })
    }

    fn stop(&mut self) -> Result<(), ServerError> {
        if !self.running {
            return Err(ServerError::NotStarted);
        }
        self.running = false;
        self.lock().stops += 1;
        Ok(())
    }
}
