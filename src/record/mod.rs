// src/record/mod.rs

//! Package description record codec
//!
//! Parses and serializes the section-delimited text format pacman uses for
//! package metadata (the `desc` blobs found in sync database archives and in
//! the local database directory). Each section is a `%HEADER%` line followed
//! by one or more body lines and a terminating blank line:
//!
//! ```text
//! %NAME%
//! xz
//!
//! %VERSION%
//! 5.8.1-1
//! ```
//!
//! The codec is pure: no I/O, no logging. Decoding is strict (unknown
//! headers, malformed values, and empty-bodied sections are hard errors) and
//! encoding is the exact inverse, so `encode(decode(x)) == x` byte-for-byte
//! for any well-formed input.

pub mod header;
pub mod types;

use std::fmt::Write as _;
use std::num::ParseIntError;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use strum::IntoEnumIterator;
use thiserror::Error;

pub use header::Header;
pub use types::{Architecture, License, OptDependency, Packager};

/// Length of the SHA-256 digest carried in the `%SHA256SUM%` section.
pub const SHA256_LEN: usize = 32;

/// Errors produced while decoding a description blob.
///
/// Every variant is fatal to the decode call; nothing is recovered or
/// silently skipped.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Input did not start with a `%HEADER%` line
    #[error("expected delimiter")]
    ExpectedDelimiter,
    /// Header token outside the closed set
    #[error("unknown header: {0}")]
    UnknownHeader(String),
    /// Section without at least one body line
    #[error("unexpected section length: {0:?}")]
    SectionLength(String),
    /// Non-numeric body in an integer-typed section
    #[error("invalid integer in {header} section: {source}")]
    InvalidInteger {
        header: Header,
        #[source]
        source: ParseIntError,
    },
    /// Digest body that is not valid hex
    #[error("invalid digest: {0}")]
    InvalidDigest(#[from] hex::FromHexError),
    /// Digest that decoded to fewer than 32 bytes
    #[error("digest is {0} bytes, expected {SHA256_LEN}")]
    DigestLength(usize),
    /// Build date outside the representable timestamp range
    #[error("timestamp out of range: {0}")]
    TimestampRange(i64),
    /// Optional dependency line that does not split into name and reason
    #[error("unexpected structure for opt dependency: {0}")]
    MalformedOptDependency(String),
    /// Description blob that is not UTF-8
    #[error("record is not valid utf-8")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// One package's metadata as stored in a pacman database.
///
/// Every field is independently optional; the zero value of a field means
/// the corresponding section was absent, and such fields are omitted again
/// on encode. List fields preserve source order, which is meaningful to
/// dependency resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageRecord {
    /// Package archive file name, e.g. `xz-5.8.1-1-x86_64.pkg.tar.zst`
    pub file_name: String,
    /// Package name
    pub name: String,
    /// Base package name (equal to `name` for split-less packages)
    pub base: String,
    /// Full version including pkgrel, e.g. `5.8.1-1`
    pub version: String,
    /// One-line description
    pub description: String,
    /// Compressed package size in bytes
    pub compressed_size: u64,
    /// Installed size in bytes
    pub installed_size: u64,
    /// SHA-256 digest of the package archive
    pub sha256sum: Option<[u8; SHA256_LEN]>,
    /// Detached PGP signature, base64
    pub pgp_signature: String,
    /// Upstream homepage
    pub url: String,
    /// License identifiers, unvalidated
    pub licenses: Vec<License>,
    /// Target architecture
    pub architecture: Option<Architecture>,
    /// When the package was built, second resolution
    pub build_date: Option<DateTime<Utc>>,
    /// Who built the package
    pub packager: Packager,
    /// Capabilities this package provides
    pub provides: Vec<String>,
    /// Runtime dependencies
    pub depends: Vec<String>,
    /// Build-time dependencies
    pub make_depends: Vec<String>,
    /// Optional dependencies with install reasons
    pub opt_depends: Vec<OptDependency>,
    /// Check-time (test) dependencies
    pub check_depends: Vec<String>,
}

impl PackageRecord {
    /// Decode a description blob into a record.
    ///
    /// The input is the full byte content of a single package's `desc` file,
    /// not a whole database archive. Empty input decodes to the zero record.
    pub fn decode(input: &[u8]) -> Result<Self, FormatError> {
        let text = std::str::from_utf8(input)?;
        let mut record = PackageRecord::default();
        for section in split_sections(text)? {
            record.apply_section(section)?;
        }
        Ok(record)
    }

    /// Encode a record back into description-blob bytes.
    ///
    /// Sections are emitted in wire order; fields holding their zero value
    /// are omitted entirely. A zero record encodes to zero bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = String::new();
        for header in Header::iter() {
            if let Some(body) = self.section_body(header) {
                // Writing to a String cannot fail.
                let _ = write!(out, "%{}%\n{}\n\n", header, body);
            }
        }
        out.into_bytes()
    }

    fn apply_section(&mut self, section: &str) -> Result<(), FormatError> {
        let lines: Vec<&str> = section.split('\n').collect();
        if lines.len() < 2 {
            return Err(FormatError::SectionLength(section.to_string()));
        }
        let token = lines[0].trim_matches('%');
        let header = Header::from_str(token)
            .map_err(|_| FormatError::UnknownHeader(token.to_string()))?;
        let body = &lines[1..];
        let data = body.join("\n");

        match header {
            Header::FileName => self.file_name = data,
            Header::Name => self.name = data,
            Header::Base => self.base = data,
            Header::Version => self.version = data,
            Header::Description => self.description = data,
            Header::PgpSignature => self.pgp_signature = data,
            Header::Url => self.url = data,
            Header::Architecture => self.architecture = Some(Architecture::from(data.as_str())),
            Header::CompressedSize => self.compressed_size = parse_u64(header, &data)?,
            Header::InstalledSize => self.installed_size = parse_u64(header, &data)?,
            Header::Sha256Sum => self.sha256sum = Some(parse_digest(&data)?),
            Header::BuildDate => {
                let seconds = data.parse::<i64>().map_err(|source| {
                    FormatError::InvalidInteger { header, source }
                })?;
                self.build_date = Some(
                    DateTime::from_timestamp(seconds, 0)
                        .ok_or(FormatError::TimestampRange(seconds))?,
                );
            }
            Header::Packager => self.packager = Packager::parse(&data),
            Header::License => self
                .licenses
                .extend(body.iter().map(|line| License::from(*line))),
            Header::Provides => self.provides.extend(body.iter().map(|s| s.to_string())),
            Header::Depends => self.depends.extend(body.iter().map(|s| s.to_string())),
            Header::MakeDepends => {
                self.make_depends.extend(body.iter().map(|s| s.to_string()))
            }
            Header::CheckDepends => {
                self.check_depends.extend(body.iter().map(|s| s.to_string()))
            }
            Header::OptDepends => {
                for line in body {
                    self.opt_depends.push(parse_opt_dependency(line)?);
                }
            }
        }
        Ok(())
    }

    /// Body text for one section, or `None` if the field holds its zero
    /// value and the section is omitted.
    fn section_body(&self, header: Header) -> Option<String> {
        match header {
            Header::FileName => non_empty(&self.file_name),
            Header::Name => non_empty(&self.name),
            Header::Base => non_empty(&self.base),
            Header::Version => non_empty(&self.version),
            Header::Description => non_empty(&self.description),
            Header::PgpSignature => non_empty(&self.pgp_signature),
            Header::Url => non_empty(&self.url),
            Header::CompressedSize => {
                (self.compressed_size != 0).then(|| self.compressed_size.to_string())
            }
            Header::InstalledSize => {
                (self.installed_size != 0).then(|| self.installed_size.to_string())
            }
            Header::Sha256Sum => self.sha256sum.as_ref().map(hex::encode),
            Header::Architecture => self.architecture.as_ref().map(ToString::to_string),
            Header::BuildDate => self.build_date.map(|t| t.timestamp().to_string()),
            Header::Packager => {
                (!self.packager.is_empty()).then(|| self.packager.to_string())
            }
            Header::License => join_lines(&self.licenses),
            Header::Provides => join_lines(&self.provides),
            Header::Depends => join_lines(&self.depends),
            Header::MakeDepends => join_lines(&self.make_depends),
            Header::OptDepends => join_lines(&self.opt_depends),
            Header::CheckDepends => join_lines(&self.check_depends),
        }
    }
}

/// Split a blob into `%HEADER%`-led sections.
///
/// Section boundaries are blank lines followed by a `%`; the terminating
/// blank line of the final section is stripped.
fn split_sections(text: &str) -> Result<Vec<&str>, FormatError> {
    if text.is_empty() {
        return Ok(Vec::new());
    }
    if !text.starts_with('%') {
        return Err(FormatError::ExpectedDelimiter);
    }
    let mut sections = Vec::new();
    let mut rest = text;
    loop {
        match rest.find("\n\n%") {
            Some(end) => {
                sections.push(&rest[..end]);
                rest = &rest[end + 2..];
            }
            None => {
                sections.push(rest.strip_suffix("\n\n").unwrap_or(rest));
                break;
            }
        }
    }
    Ok(sections)
}

fn parse_u64(header: Header, data: &str) -> Result<u64, FormatError> {
    data.parse::<u64>()
        .map_err(|source| FormatError::InvalidInteger { header, source })
}

fn parse_digest(data: &str) -> Result<[u8; SHA256_LEN], FormatError> {
    let decoded = hex::decode(data)?;
    if decoded.len() < SHA256_LEN {
        return Err(FormatError::DigestLength(decoded.len()));
    }
    let mut digest = [0u8; SHA256_LEN];
    digest.copy_from_slice(&decoded[..SHA256_LEN]);
    Ok(digest)
}

fn parse_opt_dependency(line: &str) -> Result<OptDependency, FormatError> {
    let parts: Vec<&str> = line.split(": ").collect();
    if parts.len() != 2 {
        return Err(FormatError::MalformedOptDependency(line.to_string()));
    }
    Ok(OptDependency::new(parts[0], parts[1]))
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

fn join_lines<T: std::fmt::Display>(items: &[T]) -> Option<String> {
    if items.is_empty() {
        return None;
    }
    Some(
        items
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n"),
    )
}
