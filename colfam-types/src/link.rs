//! Catalog link classification between related schema objects.

use bitcode::{Decode, Encode};

/// Classification of a parent-child edge registered in the catalog.
///
/// Serialized to the catalog as a single 1-based discriminant byte. Unlike
/// the identity-defining registries, decoding tolerates unknown bytes:
/// [`LinkType::from_discriminant`] returns `None` rather than failing, so a
/// catalog load survives relationship rows written by a newer version.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub enum LinkType {
    /// Link from a table to one of its index tables.
    IndexTable,
    /// Link from a view to the physical table holding its rows.
    PhysicalTable,
    /// Link from a view to its parent view or table.
    ParentTable,
}

impl LinkType {
    /// Serialized discriminant byte (1-based).
    #[inline]
    pub const fn discriminant(self) -> u8 {
        match self {
            LinkType::IndexTable => 1,
            LinkType::PhysicalTable => 2,
            LinkType::ParentTable => 3,
        }
    }

    /// Decode a persisted discriminant byte, `None` if unrecognized.
    #[inline]
    pub const fn from_discriminant(value: u8) -> Option<Self> {
        match value {
            1 => Some(LinkType::IndexTable),
            2 => Some(LinkType::PhysicalTable),
            3 => Some(LinkType::ParentTable),
            _ => None,
        }
    }

    /// Display name persisted as diagnostic metadata bytes.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            LinkType::IndexTable => "INDEX_TABLE",
            LinkType::PhysicalTable => "PHYSICAL_TABLE",
            LinkType::ParentTable => "PARENT_TABLE",
        }
    }

    /// UTF-8 bytes of [`LinkType::name`].
    #[inline]
    pub const fn metadata_bytes(self) -> &'static [u8] {
        self.name().as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discriminant_roundtrip() {
        for lt in [
            LinkType::IndexTable,
            LinkType::PhysicalTable,
            LinkType::ParentTable,
        ] {
            assert_eq!(LinkType::from_discriminant(lt.discriminant()), Some(lt));
        }
    }

    #[test]
    fn unknown_discriminant_degrades_to_none() {
        assert_eq!(LinkType::from_discriminant(0), None);
        assert_eq!(LinkType::from_discriminant(4), None);
        assert_eq!(LinkType::from_discriminant(255), None);
    }
}
