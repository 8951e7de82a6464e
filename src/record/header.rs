// src/record/header.rs

//! The closed set of section headers in a package description blob.
//!
//! Headers appear on the wire as `%TOKEN%` lines. The variant order below is
//! the wire order: encoding walks the variants top to bottom, so a record
//! always serializes its sections in this sequence.

use strum_macros::{Display, EnumIter, EnumString};

/// A section header of the desc format.
///
/// The token set is closed: decoding a header outside this set is a hard
/// parse error, never ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
pub enum Header {
    #[strum(serialize = "FILENAME")]
    FileName,
    #[strum(serialize = "NAME")]
    Name,
    #[strum(serialize = "BASE")]
    Base,
    #[strum(serialize = "VERSION")]
    Version,
    #[strum(serialize = "DESC")]
    Description,
    #[strum(serialize = "CSIZE")]
    CompressedSize,
    #[strum(serialize = "ISIZE")]
    InstalledSize,
    #[strum(serialize = "SHA256SUM")]
    Sha256Sum,
    #[strum(serialize = "PGPSIG")]
    PgpSignature,
    #[strum(serialize = "URL")]
    Url,
    #[strum(serialize = "LICENSE")]
    License,
    #[strum(serialize = "ARCH")]
    Architecture,
    #[strum(serialize = "BUILDDATE")]
    BuildDate,
    #[strum(serialize = "PACKAGER")]
    Packager,
    #[strum(serialize = "PROVIDES")]
    Provides,
    #[strum(serialize = "DEPENDS")]
    Depends,
    #[strum(serialize = "MAKEDEPENDS")]
    MakeDepends,
    #[strum(serialize = "OPTDEPENDS")]
    OptDepends,
    #[strum(serialize = "CHECKDEPENDS")]
    CheckDepends,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_token_round_trip() {
        for header in Header::iter() {
            let token = header.to_string();
            assert_eq!(Header::from_str(&token).unwrap(), header);
        }
    }

    #[test]
    fn test_wire_order_starts_and_ends_correctly() {
        let all: Vec<Header> = Header::iter().collect();
        assert_eq!(all.len(), 19);
        assert_eq!(all[0], Header::FileName);
        assert_eq!(all[18], Header::CheckDepends);
    }

    #[test]
    fn test_unknown_token_rejected() {
        assert!(Header::from_str("BOGUS").is_err());
        // Case-sensitive: lowercase is not a valid token.
        assert!(Header::from_str("name").is_err());
    }
}
