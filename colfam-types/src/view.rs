//! View classification and effective-type folding.

use bitcode::{Decode, Encode};
use colfam_result::{Error, Result};

/// How a view relates to the rows of its physical table.
///
/// Serialized to the catalog as a single 1-based discriminant byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub enum ViewType {
    /// View mapped directly over a pre-existing physical table.
    Mapped,
    /// View whose definition prevents writes through it.
    ReadOnly,
    /// View that accepts writes routed to its physical table.
    Updatable,
}

impl ViewType {
    /// Serialized discriminant byte (1-based).
    #[inline]
    pub const fn discriminant(self) -> u8 {
        match self {
            ViewType::Mapped => 1,
            ViewType::ReadOnly => 2,
            ViewType::Updatable => 3,
        }
    }

    /// Decode a persisted discriminant byte.
    ///
    /// View type is identity-defining, so an out-of-range byte is fatal for
    /// the snapshot being loaded.
    pub fn from_discriminant(value: u8) -> Result<Self> {
        match value {
            1 => Ok(ViewType::Mapped),
            2 => Ok(ViewType::ReadOnly),
            3 => Ok(ViewType::Updatable),
            _ => Err(Error::InvalidDiscriminant {
                kind: "view type",
                value,
            }),
        }
    }

    /// Display name persisted as diagnostic metadata bytes.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            ViewType::Mapped => "MAPPED",
            ViewType::ReadOnly => "READ_ONLY",
            ViewType::Updatable => "UPDATABLE",
        }
    }

    /// UTF-8 bytes of [`ViewType::name`].
    #[inline]
    pub const fn metadata_bytes(self) -> &'static [u8] {
        self.name().as_bytes()
    }

    #[inline]
    pub fn is_read_only(self) -> bool {
        self != ViewType::Updatable
    }

    /// Fold another view type into this one.
    ///
    /// Used to compute a view's effective type across its parent chain:
    /// callers apply `combine` once per ancestor level. The rule is symmetric
    /// and identity on `None`, so application order does not matter.
    /// Updatability only survives when every level is updatable.
    pub fn combine(self, other: Option<ViewType>) -> ViewType {
        let Some(other) = other else {
            return self;
        };
        if self == ViewType::Updatable && other == ViewType::Updatable {
            ViewType::Updatable
        } else {
            ViewType::ReadOnly
        }
    }
}
