use std::fmt;

/// Steps of the launch sequence, in the order they are reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleStage {
    /// Nothing has happened yet.
    Init,
    /// Stale files prefixed with the database name were removed.
    EntryCleanup,
    /// A server of the configured variant exists.
    Constructed,
    /// Settings and the primary database slot were applied.
    Configured,
    /// The server accepts connections.
    Started,
    /// Artefacts were registered for exit-time deletion.
    ExitCleanupScheduled,
    /// The server was stopped through its handle.
    Stopped,
}

impl fmt::Display for LifecycleStage {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Init => "init",
            Self::EntryCleanup => "entry_cleanup",
            Self::Constructed => "constructed",
            Self::Configured => "configured",
            Self::Started => "started",
            Self::ExitCleanupScheduled => "exit_cleanup_scheduled",
            Self::Stopped => "stopped",
        };
        formatter.write_str(label)
    }
}
