// src/lib.rs

//! pacdb — reader for pacman package databases
//!
//! Round-trips the section-delimited `desc` metadata format used by pacman
//! sync and local databases, and resolves package names against those
//! databases.
//!
//! # Architecture
//!
//! - [`record`]: the codec. Decodes a description blob into a
//!   [`PackageRecord`] and re-encodes it byte-for-byte. Pure, no I/O.
//! - [`db`]: the locator. Scans sync archives (gzip tar) and the local
//!   database directory for a name, caching every record it decodes for the
//!   lifetime of the [`Database`] instance.
//!
//! # Example
//!
//! ```no_run
//! use pacdb::Database;
//!
//! let db = Database::system();
//! let pkg = db.query("xz")?;
//! println!("{} {}", pkg.name, pkg.version);
//! # Ok::<(), pacdb::Error>(())
//! ```

pub mod db;
mod error;
pub mod record;

pub use db::{Database, Repository, LOCAL_ROOT, SYNC_ROOT};
pub use error::{Error, Result};
pub use record::{
    Architecture, FormatError, Header, License, OptDependency, Packager, PackageRecord,
};
