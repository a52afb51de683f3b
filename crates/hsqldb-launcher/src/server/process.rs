//! Runs the HSQLDB server in a child JVM.

use std::ffi::OsString;
use std::io;
use std::net::{Ipv4Addr, SocketAddr, TcpStream};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use hsqldb_config::Config;
use tracing::{debug, info, warn};

use super::{
    DatabaseServer, PRIMARY_SLOT, ServerError, ServerFactory, ServerSettings, ServerVariant,
};

const PROCESS_TARGET: &str = "hsqldb_launcher::process";
const POLL_INTERVAL: Duration = Duration::from_millis(50);
const PROBE_TIMEOUT: Duration = Duration::from_millis(250);
const STOP_GRACE: Duration = Duration::from_secs(10);

/// How to launch the JVM hosting the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launcher {
    java_bin: OsString,
    class_path: PathBuf,
    startup_timeout: Duration,
}

impl Launcher {
    /// Builds a launcher from explicit parts.
    #[must_use]
    pub fn new(
        java_bin: impl Into<OsString>,
        class_path: impl Into<PathBuf>,
        startup_timeout: Duration,
    ) -> Self {
        Self {
            java_bin: java_bin.into(),
            class_path: class_path.into(),
            startup_timeout,
        }
    }

    /// Builds a launcher from the loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.java_bin(),
            config.hsqldb_jar().as_std_path(),
            config.startup_timeout(),
        )
    }
}

/// Factory producing [`ProcessServer`]s that share one [`Launcher`].
#[derive(Debug, Clone)]
pub struct ProcessServerFactory {
    launcher: Launcher,
}

impl ProcessServerFactory {
    /// Builds a factory over `launcher`.
    #[must_use]
    pub const fn new(launcher: Launcher) -> Self {
        Self { launcher }
    }
}

impl ServerFactory for ProcessServerFactory {
    type Server = ProcessServer;

    fn build(&self, variant: ServerVariant) -> Self::Server {
        ProcessServer::new(variant, self.launcher.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProcessState {
    Idle,
    Online { pid: u32, port: u16 },
    Stopped,
}

/// HSQLDB server hosted in a child JVM process.
#[derive(Debug)]
pub struct ProcessServer {
    variant: ServerVariant,
    launcher: Launcher,
    settings: Option<ServerSettings>,
    child: Option<Child>,
    state: ProcessState,
}

impl ProcessServer {
    /// Builds an unconfigured server.
    #[must_use]
    pub const fn new(variant: ServerVariant, launcher: Launcher) -> Self {
        Self {
            variant,
            launcher,
            settings: None,
            child: None,
            state: ProcessState::Idle,
        }
    }

    pub(crate) fn command(&self) -> Command {
        let mut command = Command::new(&self.launcher.java_bin);
        command
            .arg("-cp")
            .arg(&self.launcher.class_path)
            .arg(self.variant.main_class());
        if let Some(settings) = &self.settings {
            command
                .arg(format!("--database.{PRIMARY_SLOT}"))
                .arg(&settings.database.path)
                .arg(format!("--dbname.{PRIMARY_SLOT}"))
                .arg(&settings.database.name)
                .arg("--silent")
                .arg(settings.silent.to_string())
                .arg("--trace")
                .arg(settings.trace.to_string())
                .arg("--tls")
                .arg(settings.tls.to_string());
            if let Some(port) = settings.port {
                command.arg("--port").arg(port.to_string());
            }
        }
        command
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        command
    }

    fn port(&self) -> u16 {
        self.settings.as_ref().map_or_else(
            || self.variant.default_port(false),
            |settings| settings.effective_port(self.variant),
        )
    }

    fn wait_until_ready(&self, child: &mut Child, port: u16) -> Result<(), ServerError> {
        let address = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
        let timeout = self.launcher.startup_timeout;
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(status) = child
                .try_wait()
                .map_err(|source| ServerError::Monitor { source })?
            {
                return Err(ServerError::Exited { status });
            }
            if TcpStream::connect_timeout(&address, PROBE_TIMEOUT).is_ok() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(ServerError::StartupTimeout { port, timeout });
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl DatabaseServer for ProcessServer {
    fn variant(&self) -> ServerVariant {
        self.variant
    }

    fn configure(&mut self, settings: ServerSettings) {
        self.settings = Some(settings);
    }

    fn start(&mut self) -> Result<(), ServerError> {
        if self.child.is_some() || self.state != ProcessState::Idle {
            return Err(ServerError::AlreadyStarted);
        }
        let port = self.port();
        let mut child = self
            .command()
            .spawn()
            .map_err(|source| ServerError::Spawn {
                program: self.launcher.java_bin.to_string_lossy().into_owned(),
                source,
            })?;
        let pid = child.id();
        debug!(
            target: PROCESS_TARGET,
            pid,
            port,
            variant = %self.variant,
            "server process spawned; waiting for connections"
        );

        if let Err(error) = self.wait_until_ready(&mut child, port) {
            warn!(
                target: PROCESS_TARGET,
                pid,
                error = %error,
                "server failed to come online; killing process"
            );
            let _ = child.kill();
            let _ = child.wait();
            return Err(error);
        }

        info!(
            target: PROCESS_TARGET,
            pid,
            port,
            "server accepting connections"
        );
        self.child = Some(child);
        self.state = ProcessState::Online { pid, port };
        Ok(())
    }

    fn state_descriptor(&self) -> String {
        match self.state {
            ProcessState::Online { pid, port } => {
                format!("ONLINE ({} pid {pid}, port {port})", self.variant)
            }
            ProcessState::Idle | ProcessState::Stopped => String::from("SHUTDOWN"),
        }
    }

    fn database_name(&self, slot: usize) -> Option<String> {
        if slot != PRIMARY_SLOT {
            return None;
        }
        self.settings
            .as_ref()
            .map(|settings| settings.database.name.clone())
    }

    fn stop(&mut self) -> Result<(), ServerError> {
        let mut child = self.child.take().ok_or(ServerError::NotStarted)?;
        terminate(&mut child).map_err(|source| ServerError::Stop { source })?;
        self.state = ProcessState::Stopped;
        info!(
            target: PROCESS_TARGET,
            pid = child.id(),
            "server process stopped"
        );
        Ok(())
    }
}

impl Drop for ProcessServer {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take()
            && let Err(error) = terminate(&mut child)
        {
            warn!(
                target: PROCESS_TARGET,
                pid = child.id(),
                error = %error,
                "failed to stop server process"
            );
        }
    }
}

/// Asks the child to exit, escalating to a kill after [`STOP_GRACE`].
fn terminate(child: &mut Child) -> io::Result<()> {
    if child.try_wait()?.is_some() {
        return Ok(());
    }
    request_exit(child)?;
    let deadline = Instant::now() + STOP_GRACE;
    while Instant::now() < deadline {
        if child.try_wait()?.is_some() {
            return Ok(());
        }
        thread::sleep(POLL_INTERVAL);
    }
    child.kill()?;
    child.wait().map(|_| ())
}

#[cfg(unix)]
fn request_exit(child: &mut Child) -> io::Result<()> {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    match i32::try_from(child.id()) {
        Ok(raw) => kill(Pid::from_raw(raw), Signal::SIGTERM).map_err(io::Error::from),
        Err(_) => child.kill(),
    }
}

#[cfg(not(unix))]
fn request_exit(child: &mut Child) -> io::Result<()> {
    child.kill()
}
