// src/db/mod.rs

//! Package database lookup
//!
//! Resolves a package name to its [`PackageRecord`] by scanning pacman
//! database sources: gzip-compressed tar archives for sync repositories
//! (`core.db`, `extra.db`, ...) and the per-package directory tree of the
//! local database. Decoded records are kept in a process-lifetime cache so a
//! name is never scanned for twice.
//!
//! Scanning is synchronous and blocking; archive and directory handles are
//! scoped to a single query call and released on every exit path.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use flate2::read::GzDecoder;
use parking_lot::RwLock;
use tar::Archive;
use tracing::debug;

use crate::error::{Error, Result};
use crate::record::PackageRecord;

/// Directory holding the sync database archives.
pub const SYNC_ROOT: &str = "/var/lib/pacman/sync";

/// Root of the local (installed packages) database.
pub const LOCAL_ROOT: &str = "/var/lib/pacman/local";

/// A single source of package records.
///
/// Both kinds store one entry per package under a
/// `<name>-<version>-<release>` path, with the record itself in a `desc`
/// blob beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Repository {
    /// A sync repository: a gzip-compressed tar archive
    Sync(PathBuf),
    /// The local database: a directory of per-package subdirectories
    Local(PathBuf),
}

impl Repository {
    pub fn sync(path: impl Into<PathBuf>) -> Self {
        Repository::Sync(path.into())
    }

    pub fn local(path: impl Into<PathBuf>) -> Self {
        Repository::Local(path.into())
    }

    pub fn path(&self) -> &Path {
        match self {
            Repository::Sync(path) | Repository::Local(path) => path,
        }
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Repository::Sync(path) => write!(f, "sync archive {}", path.display()),
            Repository::Local(path) => write!(f, "local database {}", path.display()),
        }
    }
}

/// A set of repositories searched in priority order, with a shared record
/// cache.
///
/// The cache maps package name to the first record decoded under that name
/// and is never evicted or invalidated; repeat queries return the same
/// [`Arc`] instance, so callers must treat records as read-only. Records
/// decoded incidentally while scanning for a different name are cached too,
/// warming later lookups.
pub struct Database {
    repositories: Vec<Repository>,
    cache: RwLock<HashMap<String, Arc<PackageRecord>>>,
}

impl Database {
    /// Create a database over an explicit repository list.
    ///
    /// Repositories are searched in the order given.
    pub fn new(repositories: Vec<Repository>) -> Self {
        Self {
            repositories,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The standard system search order: core, extra, multilib, then the
    /// local database.
    pub fn system() -> Self {
        let sync = Path::new(SYNC_ROOT);
        Self::new(vec![
            Repository::sync(sync.join("core.db")),
            Repository::sync(sync.join("extra.db")),
            Repository::sync(sync.join("multilib.db")),
            Repository::local(LOCAL_ROOT),
        ])
    }

    pub fn repositories(&self) -> &[Repository] {
        &self.repositories
    }

    /// Resolve a package name against all repositories in priority order.
    ///
    /// A repository whose source does not exist is skipped; any other I/O or
    /// decode error aborts the search. Exhausting every repository without
    /// an exact match yields [`Error::PackageNotFound`].
    pub fn query(&self, name: &str) -> Result<Arc<PackageRecord>> {
        for repository in &self.repositories {
            match self.query_in(name, repository) {
                Ok(Some(record)) => return Ok(record),
                Ok(None) => continue,
                Err(Error::Io(err)) if err.kind() == ErrorKind::NotFound => {
                    debug!("skipping absent {}", repository);
                    continue;
                }
                Err(err) => return Err(err),
            }
        }
        Err(Error::PackageNotFound(name.to_string()))
    }

    /// Resolve a package name against a single repository.
    ///
    /// Returns `Ok(None)` when the repository exists but holds no package of
    /// that name. Entries are matched by name prefix first; the record's own
    /// declared name is the authoritative filter before returning.
    pub fn query_in(
        &self,
        name: &str,
        repository: &Repository,
    ) -> Result<Option<Arc<PackageRecord>>> {
        if let Some(record) = self.cache.read().get(name) {
            debug!("cache hit for {}", name);
            return Ok(Some(record.clone()));
        }
        debug!("scanning {} for {}", repository, name);
        match repository {
            Repository::Sync(path) => self.scan_sync(name, path),
            Repository::Local(path) => self.scan_local(name, path),
        }
    }

    /// Stream a sync archive, decoding every `desc` entry whose path starts
    /// with the requested name.
    fn scan_sync(&self, name: &str, path: &Path) -> Result<Option<Arc<PackageRecord>>> {
        let file = File::open(path)?;
        let mut archive = Archive::new(GzDecoder::new(file));
        for entry in archive.entries()? {
            let mut entry = entry?;
            let entry_path = {
                let p = entry.path()?;
                p.to_string_lossy().into_owned()
            };
            if !entry_path.starts_with(name) || !entry_path.ends_with("/desc") {
                continue;
            }
            let mut blob = Vec::new();
            entry.read_to_end(&mut blob)?;
            if let Some(record) = self.remember(name, &blob)? {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    /// Walk the local database directory, decoding the `desc` file of every
    /// child whose name starts with the requested name.
    fn scan_local(&self, name: &str, path: &Path) -> Result<Option<Arc<PackageRecord>>> {
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            let child = entry.file_name().to_string_lossy().into_owned();
            if !child.starts_with(name) {
                continue;
            }
            let blob = match std::fs::read(entry.path().join("desc")) {
                Ok(blob) => blob,
                // Non-package children (e.g. ALPM_DB_VERSION) have no desc.
                Err(err)
                    if err.kind() == ErrorKind::NotFound
                        || err.kind() == ErrorKind::NotADirectory =>
                {
                    continue;
                }
                Err(err) => return Err(err.into()),
            };
            if let Some(record) = self.remember(name, &blob)? {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    /// Decode a candidate blob and cache it under its declared name.
    ///
    /// Prefix matching can admit near-name collisions, so every decoded
    /// record is cached even when it is not the one being searched for.
    /// Returns the record only on an exact declared-name match.
    fn remember(&self, wanted: &str, blob: &[u8]) -> Result<Option<Arc<PackageRecord>>> {
        let record = PackageRecord::decode(blob)?;
        if record.name.is_empty() {
            return Ok(None);
        }
        let record = Arc::new(record);
        self.cache
            .write()
            .insert(record.name.clone(), record.clone());
        if record.name == wanted {
            debug!("found {} {}", record.name, record.version);
            Ok(Some(record))
        } else {
            Ok(None)
        }
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::system()
    }
}
