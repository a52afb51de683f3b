//! Derives the registered database name and connection URL from `db_name`.

/// Separator used to split path-like database names.
pub const PATH_SEPARATOR: char = '/';

/// Suffix appended to every connection URL.
pub const URL_PROPERTIES: &str = ";sql.enforce_strict_size=true";

/// Storage backing the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    /// In-memory storage; nothing is written to disk.
    Memory,
    /// File-backed storage next to the working directory.
    File,
}

impl StorageMode {
    /// Selects the storage mode for the transient flag.
    #[must_use]
    pub const fn from_transient(is_transient: bool) -> Self {
        if is_transient { Self::Memory } else { Self::File }
    }

    /// URL prefix understood by HSQLDB.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Memory => "mem:",
            Self::File => "file:",
        }
    }
}

/// Name and location handed to the server's primary database slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    name: String,
    storage: StorageMode,
    connection_url: String,
}

impl ResolvedIdentity {
    /// Name registered with the server (last path segment of `db_name`).
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Storage mode selected for the database.
    #[must_use]
    pub const fn storage(&self) -> StorageMode {
        self.storage
    }

    /// `mem:` or `file:`.
    #[must_use]
    pub const fn storage_prefix(&self) -> &'static str {
        self.storage.prefix()
    }

    /// Storage URL built from the unshortened `db_name`.
    #[must_use]
    pub fn connection_url(&self) -> &str {
        self.connection_url.as_str()
    }
}

/// Resolves the identity for a configured database name.
///
/// Only the registered name is shortened to the final path segment; the
/// connection URL keeps the name exactly as configured so file-backed
/// databases land under the configured directory.
///
/// # Examples
///
/// ```
/// use hsqldb_launcher::resolve;
///
/// let identity = resolve("data/testdb", false);
/// assert_eq!(identity.name(), "testdb");
/// assert_eq!(identity.connection_url(), "file:data/testdb;sql.enforce_strict_size=true");
/// ```
#[must_use]
pub fn resolve(db_name: &str, is_transient: bool) -> ResolvedIdentity {
    let name = match db_name.rfind(PATH_SEPARATOR) {
        Some(index) => db_name
            .get(index + PATH_SEPARATOR.len_utf8()..)
            .unwrap_or_default(),
        None => db_name,
    };
    let storage = StorageMode::from_transient(is_transient);
    let connection_url = format!("{}{db_name}{URL_PROPERTIES}", storage.prefix());
    ResolvedIdentity {
        name: name.to_owned(),
        storage,
        connection_url,
    }
}
