// src/record/types.rs

//! Field value types with per-line display rules
//!
//! List-typed sections render one element per line, each element through its
//! own `Display` impl. The types here are the closed set of such elements:
//! licenses, architectures, optional dependencies, and the packager line.

use std::fmt;

/// Target architecture of a package.
///
/// The on-disk format does not validate this token, so unrecognized values
/// are preserved verbatim rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Architecture {
    /// 64-bit x86 (`x86_64`), the primary Arch Linux target
    X86_64,
    /// 64-bit ARM (`aarch64`)
    Aarch64,
    /// Architecture-independent packages (`any`)
    Any,
    /// Any other token, kept as-is
    Other(String),
}

impl Architecture {
    pub fn as_str(&self) -> &str {
        match self {
            Architecture::X86_64 => "x86_64",
            Architecture::Aarch64 => "aarch64",
            Architecture::Any => "any",
            Architecture::Other(s) => s,
        }
    }
}

impl From<&str> for Architecture {
    fn from(s: &str) -> Self {
        match s {
            "x86_64" => Architecture::X86_64,
            "aarch64" => Architecture::Aarch64,
            "any" => Architecture::Any,
            other => Architecture::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A license identifier, accepted as an unvalidated open token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct License(pub String);

impl License {
    pub fn new(s: impl Into<String>) -> Self {
        License(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for License {
    fn from(s: &str) -> Self {
        License(s.to_string())
    }
}

impl fmt::Display for License {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An optional dependency: a package name plus the reason to install it.
///
/// Wire form is `package: reason`. Decoding requires both parts; encoding
/// drops the separator when the reason is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptDependency {
    pub package: String,
    pub reason: String,
}

impl OptDependency {
    pub fn new(package: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for OptDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reason.is_empty() {
            f.write_str(&self.package)
        } else {
            write!(f, "{}: {}", self.package, self.reason)
        }
    }
}

/// Who built the package: a display name and an optional contact address.
///
/// Wire form is `Name <email>`, or just `Name` when no address is present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Packager {
    pub name: String,
    pub email: String,
}

impl Packager {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Split a packager line into name and email.
    ///
    /// Only a final whitespace-delimited token wrapped in angle brackets is
    /// treated as an email; otherwise the whole line is the name.
    pub fn parse(line: &str) -> Self {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if let Some(&last) = tokens.last()
            && last.len() >= 2
            && last.starts_with('<')
            && last.ends_with('>')
        {
            return Self {
                name: tokens[..tokens.len() - 1].join(" "),
                email: last[1..last.len() - 1].to_string(),
            };
        }
        Self {
            name: line.to_string(),
            email: String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty()
    }
}

impl fmt::Display for Packager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.email.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{} <{}>", self.name, self.email)
        }
    }
}
