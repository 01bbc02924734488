//! Schema/catalog metadata model for a relational layer over a sparse
//! wide-column key-value store.
//!
//! This crate describes how a logical table (tables, views, indexes, columns,
//! column families) is represented physically, and how logical column
//! identifiers are compacted into short binary qualifiers. It is a pure data
//! and allocation model: row mutation building, SQL planning, the store
//! client, index maintenance, and catalog persistence all live elsewhere and
//! consume the contracts defined here.
//!
//! # Snapshots
//!
//! The central type is [`TableDescriptor`], an immutable snapshot of a
//! table's metadata as of a timestamp/sequence number. Snapshots are produced
//! exclusively by [`TableBuilder`]: creation yields sequence 0, and every
//! schema alteration builds a new, fully independent snapshot from the prior
//! one. Published snapshots are plain values; concurrent readers need no
//! synchronization. The only mutable state, the per-family
//! [`QualifierCounter`], is owned by the single in-progress build and carried
//! forward by deep copy, never by aliasing.

#![forbid(unsafe_code)]

pub mod builder;
pub mod column;
pub mod counter;
pub mod links;
pub mod name;
pub mod reserved;
pub mod table;
pub mod version;

pub use builder::{ColumnSpec, TableBuilder};
pub use column::{ColumnDescriptor, ColumnFamilyDescriptor, PrimaryKey, SortOrder};
pub use counter::{QualifierCounter, QualifierCounterState};
pub use links::RelationshipLinks;
pub use name::{ObjectName, TableKey, TableName};
pub use table::{TableDescriptor, TableIdentity, TableProperties, TableState};
pub use version::VersionInfo;
