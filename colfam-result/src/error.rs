use std::fmt;
use thiserror::Error;

/// Unified error type for all colfam operations.
///
/// This enum encompasses every failure mode across the colfam stack, from
/// persisted-byte decoding up to snapshot admission. Each variant includes
/// context-specific information so callers can either present the error or
/// match on it for fine-grained handling.
///
/// # Thread Safety
///
/// `Error` implements `Send` and `Sync`, allowing errors to be safely passed
/// between threads. Schema snapshots are read concurrently, so lookup errors
/// routinely cross thread boundaries.
#[derive(Error, Debug)]
pub enum Error {
    /// A column family name or byte string did not resolve against the table.
    ///
    /// Returned by the family lookup operations on a table snapshot. The
    /// message carries the family name as requested (display form), not the
    /// canonical key.
    #[error("column family '{0}' not found")]
    FamilyNotFound(String),

    /// A column name, PK column name, or (family, qualifier) pair did not
    /// resolve against the table.
    ///
    /// This is a common error when statements reference dropped columns or
    /// when stale qualifier bytes from a previous schema generation are
    /// presented against a newer snapshot.
    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    /// A bare column name or qualifier resolved to more than one column.
    ///
    /// Bare (family-unqualified) names can match a column in several
    /// families. Callers should retry with a `family.column` qualified name.
    #[error("ambiguous column reference '{0}'")]
    AmbiguousColumn(String),

    /// An out-of-range discriminant byte was read for an identity-defining
    /// enum (view type, index type, storage scheme, qualifier encoding).
    ///
    /// This is fatal for the snapshot being loaded: it signals corrupt
    /// catalog data or rows written by a newer version. A table is unusable
    /// without a valid storage/encoding classification, so loaders must
    /// abort rather than guess.
    ///
    /// Note that link classification deliberately does NOT produce this
    /// error; unknown link bytes degrade to "no link" so a catalog load can
    /// tolerate forward-incompatible relationship rows.
    #[error("invalid {kind} discriminant: {value}")]
    InvalidDiscriminant {
        /// Which enum registry rejected the byte.
        kind: &'static str,
        /// The offending serialized byte.
        value: u8,
    },

    /// A codec operation was invoked on a qualifier width that has no
    /// implemented codec body.
    ///
    /// The one/two/three byte qualifier widths declare their bounds but
    /// deliberately have no encode/decode implementation. This error is
    /// distinct from [`Error::NotEncodeable`] so callers can choose a
    /// fallback scheme rather than silently truncate or corrupt data.
    #[error("qualifier encoding '{0}' has no codec implementation")]
    Unsupported(&'static str),

    /// A value cannot be represented by the selected qualifier encoding.
    ///
    /// Raised when a value falls outside the encoding's max-qualifier bound,
    /// or when a value of the wrong shape is presented (a name to a numeric
    /// encoding, a number to the non-encoded scheme).
    #[error("value not encodeable: {0}")]
    NotEncodeable(String),

    /// A snapshot build would violate a PK, NOT-NULL, or uniqueness rule.
    ///
    /// Surfaced to the DDL caller and never retried automatically. No
    /// snapshot is produced when this error is returned.
    #[error("Constraint Error: {0}")]
    ConstraintViolation(String),

    /// Catalog metadata error.
    ///
    /// Indicates corrupt or inconsistent persisted metadata: malformed
    /// qualifier bytes, serialized state that fails its own invariants, or
    /// disagreement between persisted parts of a snapshot.
    #[error("{0}")]
    CatalogError(String),

    /// Internal error indicating a bug or unexpected state.
    ///
    /// This error should never occur during normal operation. If you
    /// encounter it, it likely indicates a bug in colfam that should be
    /// reported with reproduction steps.
    #[error("An internal operation failed: {0}")]
    Internal(String),
}

impl Error {
    /// Create a catalog error from any displayable error.
    ///
    /// Convenience for wrapping decode/parse failures encountered while
    /// loading persisted metadata.
    #[inline]
    pub fn catalog<E: fmt::Display>(err: E) -> Self {
        Error::CatalogError(err.to_string())
    }

    /// Create a constraint violation from any displayable message.
    #[inline]
    pub fn constraint<E: fmt::Display>(msg: E) -> Self {
        Error::ConstraintViolation(msg.to_string())
    }
}
