//! Index classification.

use bitcode::{Decode, Encode};
use colfam_result::{Error, Result};

/// Whether an index is stored in its own table or colocated with its data.
///
/// Serialized to the catalog as a single 1-based discriminant byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub enum IndexType {
    /// Index rows live in a separate physical table.
    Global,
    /// Index rows are colocated with the data table's regions.
    Local,
}

impl IndexType {
    /// Serialized discriminant byte (1-based).
    #[inline]
    pub const fn discriminant(self) -> u8 {
        match self {
            IndexType::Global => 1,
            IndexType::Local => 2,
        }
    }

    /// Decode a persisted discriminant byte.
    ///
    /// Index type is identity-defining, so an out-of-range byte is fatal for
    /// the snapshot being loaded.
    pub fn from_discriminant(value: u8) -> Result<Self> {
        match value {
            1 => Ok(IndexType::Global),
            2 => Ok(IndexType::Local),
            _ => Err(Error::InvalidDiscriminant {
                kind: "index type",
                value,
            }),
        }
    }

    /// Parse a DDL token such as `"GLOBAL"` or `" local "`.
    pub fn from_token(token: &str) -> Result<Self> {
        match token.trim().to_ascii_uppercase().as_str() {
            "GLOBAL" => Ok(IndexType::Global),
            "LOCAL" => Ok(IndexType::Local),
            other => Err(Error::CatalogError(format!(
                "unknown index type token '{other}'"
            ))),
        }
    }

    /// Display name persisted as diagnostic metadata bytes.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            IndexType::Global => "GLOBAL",
            IndexType::Local => "LOCAL",
        }
    }

    /// UTF-8 bytes of [`IndexType::name`].
    #[inline]
    pub const fn metadata_bytes(self) -> &'static [u8] {
        self.name().as_bytes()
    }
}

impl Default for IndexType {
    fn default() -> Self {
        IndexType::Global
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discriminant_roundtrip() {
        for it in [IndexType::Global, IndexType::Local] {
            assert_eq!(IndexType::from_discriminant(it.discriminant()).unwrap(), it);
        }
    }

    #[test]
    fn out_of_range_discriminant_fails() {
        assert!(matches!(
            IndexType::from_discriminant(0),
            Err(Error::InvalidDiscriminant { .. })
        ));
        assert!(matches!(
            IndexType::from_discriminant(3),
            Err(Error::InvalidDiscriminant { .. })
        ));
    }

    #[test]
    fn token_parse() {
        assert_eq!(IndexType::from_token("GLOBAL").unwrap(), IndexType::Global);
        assert_eq!(IndexType::from_token(" local ").unwrap(), IndexType::Local);
        assert!(IndexType::from_token("covering").is_err());
    }
}
