// src/error.rs

//! Crate-level error and result types

use thiserror::Error;

use crate::record::FormatError;

/// Errors surfaced by database queries.
///
/// Decode and I/O failures always propagate; the only condition treated as
/// recoverable is a missing repository source during a multi-repository
/// search, which the locator detects via [`std::io::ErrorKind::NotFound`].
#[derive(Debug, Error)]
pub enum Error {
    /// A description blob failed to parse
    #[error("malformed package record: {0}")]
    Format(#[from] FormatError),

    /// A repository source could not be opened or read
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Every repository was searched without an exact name match
    #[error("could not find package: {0}")]
    PackageNotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
