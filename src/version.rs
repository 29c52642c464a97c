//! Contains the [`Version`] enum.
//!
//! Every mesh file starts with a signature line naming its version. The
//! signature strings are the [`Display`] form of the matching variant.

use std::{convert::Infallible, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// Version of the mesh format used when decoding or encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Version {
    /// Signature did not match any known version. Cannot be encoded.
    Unknown,
    /// Binary format.
    #[default]
    V2_00,
    /// Text format, positions stored at twice their size.
    V1_00,
    /// Text format.
    V1_01,
}

impl Version {
    /// All versions the codec can read and write.
    pub const KNOWN: [Version; 3] = [Version::V1_00, Version::V1_01, Version::V2_00];

    /// Returns the signature line (without newline) of this version.
    ///
    /// [`Version::Unknown`] yields a placeholder that matches no version.
    pub const fn signature(self) -> &'static str {
        match self {
            Version::V1_00 => "version 1.00",
            Version::V1_01 => "version 1.01",
            Version::V2_00 => "version 2.00",
            Version::Unknown => "version x.xx",
        }
    }

    /// Matches a signature line exactly, returning [`Version::Unknown`] if
    /// nothing matches.
    pub fn from_signature(s: &str) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|v| v.signature() == s)
            .unwrap_or(Version::Unknown)
    }

    pub const fn is_text(self) -> bool {
        matches!(self, Version::V1_00 | Version::V1_01)
    }

    pub const fn is_binary(self) -> bool {
        matches!(self, Version::V2_00)
    }

    /// Factor applied to positions when decoding. Encoding uses the reciprocal.
    pub const fn position_scale(self) -> f64 {
        match self {
            Version::V1_00 => 0.5,
            _ => 1.0,
        }
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.signature())
    }
}

impl FromStr for Version {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_signature(s))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_signature_matches_exactly() {
        for version in Version::KNOWN {
            assert_eq!(Version::from_signature(&version.to_string()), version);
        }
        assert_eq!(Version::from_signature("version 1.00 "), Version::Unknown);
        assert_eq!(Version::from_signature("Version 2.00"), Version::Unknown);
        assert_eq!(Version::from_signature("version x.xx"), Version::Unknown);
        assert_eq!(Version::from_signature(""), Version::Unknown);
    }

    #[test]
    fn test_default_is_binary() {
        assert_eq!(Version::default(), Version::V2_00);
        assert!(Version::default().is_binary());
        assert!(Version::V1_00.is_text() && Version::V1_01.is_text());
        assert!(!Version::Unknown.is_text() && !Version::Unknown.is_binary());
    }

    #[test]
    fn test_from_str() -> Result<(), Infallible> {
        assert_eq!("version 1.01".parse::<Version>()?, Version::V1_01);
        assert_eq!("garbage".parse::<Version>()?, Version::Unknown);
        Ok(())
    }
}
