//! Table identity classification.

use bitcode::{Decode, Encode};
use colfam_result::{Error, Result};

/// What kind of schema object a snapshot describes.
///
/// Serialized to the catalog as a single-letter token rather than a
/// discriminant byte; the tokens are part of the persisted format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub enum TableKind {
    /// A user data table.
    Table,
    /// A view over another table or view.
    View,
    /// An index table.
    Index,
    /// A system catalog table.
    System,
}

impl TableKind {
    /// Serialized single-letter token.
    #[inline]
    pub const fn token(self) -> &'static str {
        match self {
            TableKind::Table => "u",
            TableKind::View => "v",
            TableKind::Index => "i",
            TableKind::System => "s",
        }
    }

    /// Decode a persisted token.
    pub fn from_token(token: &str) -> Result<Self> {
        match token {
            "u" => Ok(TableKind::Table),
            "v" => Ok(TableKind::View),
            "i" => Ok(TableKind::Index),
            "s" => Ok(TableKind::System),
            other => Err(Error::CatalogError(format!(
                "unknown table kind token '{other}'"
            ))),
        }
    }

    #[inline]
    pub fn is_view(self) -> bool {
        self == TableKind::View
    }

    #[inline]
    pub fn is_index(self) -> bool {
        self == TableKind::Index
    }

    /// Whether this object hangs off a parent object in the catalog.
    #[inline]
    pub fn is_derived(self) -> bool {
        matches!(self, TableKind::View | TableKind::Index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_roundtrip() {
        for kind in [
            TableKind::Table,
            TableKind::View,
            TableKind::Index,
            TableKind::System,
        ] {
            assert_eq!(TableKind::from_token(kind.token()).unwrap(), kind);
        }
    }

    #[test]
    fn unknown_token_fails() {
        assert!(TableKind::from_token("x").is_err());
        assert!(TableKind::from_token("").is_err());
    }
}
