//! Reserved values and initial constants for the schema model.
//!
//! This module centralizes the magic numbers shared by every reader and
//! writer of the catalog. Allocation and versioning invariants depend on
//! these exact values; changing any of them is a catalog format change.

// =============================================================================
// SEQUENCE NUMBERS
// =============================================================================

/// Sequence number assigned to a table's very first snapshot.
///
/// Every subsequent DDL operation increments the sequence by exactly one, so
/// readers can order snapshots of the same logical table.
pub const INITIAL_SEQUENCE_NUMBER: u64 = 0;

// =============================================================================
// ENCODED QUALIFIER ALLOCATION
// =============================================================================

/// First encoded qualifier number handed out for a column family.
///
/// Values below this are reserved for fixed system cells (empty cell,
/// per-family bookkeeping) so that user columns never collide with them.
/// A family's counter lazily initializes to this value on first access.
pub const ENCODED_QUALIFIER_INITIAL_VALUE: u32 = 11;

// =============================================================================
// COLUMN FAMILIES
// =============================================================================

/// Family used for columns declared without an explicit family.
pub const DEFAULT_COLUMN_FAMILY: &str = "0";

// =============================================================================
// INDEX STATE
// =============================================================================

/// Sentinel `index_disable_timestamp` meaning the index is enabled.
pub const INDEX_ENABLED_TIMESTAMP: u64 = 0;

// =============================================================================
// TABLE PROPERTY NAMES
// =============================================================================

/// DDL property name toggling the immutable-rows optimization.
pub const IMMUTABLE_ROWS_PROP_NAME: &str = "IMMUTABLE_ROWS";

/// Default for whether write-ahead logging is disabled on new tables.
pub const DEFAULT_DISABLE_WAL: bool = false;
