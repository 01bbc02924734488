//! Persisted primitives shared across colfam crates.
//!
//! These types live in `colfam-types` so they can be reused without depending
//! on the schema-model crate. Everything here round-trips through the catalog
//! in a fixed binary form:
//!
//! - The enum registries ([`ViewType`], [`IndexType`], [`LinkType`],
//!   [`StorageScheme`], [`TableKind`]) each serialize to a single
//!   discriminant byte.
//! - The qualifier codec family ([`QualifierEncoding`]) turns logical column
//!   identity into the physical byte qualifier stored in the underlying
//!   wide-column store.
//!
//! Every registry is a closed set: adding a variant is a catalog format
//! change, and `from_discriminant` is an explicit fixed-table lookup rather
//! than any kind of variant scan.

#![forbid(unsafe_code)]

pub mod index;
pub mod link;
pub mod qualifier;
pub mod relation;
pub mod storage;
pub mod view;

pub use index::IndexType;
pub use link::LinkType;
pub use qualifier::{QualifierEncoding, QualifierValue};
pub use relation::TableKind;
pub use storage::StorageScheme;
pub use view::ViewType;
