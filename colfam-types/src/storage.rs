//! Physical cell layout selection.

use bitcode::{Decode, Encode};
use colfam_result::{Error, Result};

/// How a table's column values are laid out as cells in the store.
///
/// Selected once at table creation and immutable thereafter; changing the
/// layout requires a full physical rewrite. Serialized to the catalog as a
/// single 1-based discriminant byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub enum StorageScheme {
    /// One physical cell per column value.
    OneCellPerColumn,
    /// All of a family's column values packed into a single cell per row.
    OneCellPerFamily,
}

impl StorageScheme {
    /// Serialized discriminant byte (1-based).
    #[inline]
    pub const fn discriminant(self) -> u8 {
        match self {
            StorageScheme::OneCellPerColumn => 1,
            StorageScheme::OneCellPerFamily => 2,
        }
    }

    /// Decode a persisted discriminant byte.
    ///
    /// Storage scheme is identity-defining: a table cannot be read at all
    /// without knowing its cell layout, so an out-of-range byte aborts the
    /// snapshot load.
    pub fn from_discriminant(value: u8) -> Result<Self> {
        match value {
            1 => Ok(StorageScheme::OneCellPerColumn),
            2 => Ok(StorageScheme::OneCellPerFamily),
            _ => Err(Error::InvalidDiscriminant {
                kind: "storage scheme",
                value,
            }),
        }
    }

    /// Display name persisted as diagnostic metadata bytes.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            StorageScheme::OneCellPerColumn => "ONE_CELL_PER_COLUMN",
            StorageScheme::OneCellPerFamily => "ONE_CELL_PER_FAMILY",
        }
    }

    /// UTF-8 bytes of [`StorageScheme::name`].
    #[inline]
    pub const fn metadata_bytes(self) -> &'static [u8] {
        self.name().as_bytes()
    }
}
