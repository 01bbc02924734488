//! Error types and result definitions for the colfam schema model.
//!
//! This crate provides the unified error type ([`Error`]) and result type alias
//! ([`Result<T>`]) used throughout the colfam crates. All operations that could
//! fail return `Result<T>`, where the error variant carries enough context for
//! the caller to decide between recovery and propagation.
//!
//! # Error Philosophy
//!
//! colfam uses a single error enum ([`Error`]) rather than crate-specific error
//! types. This approach:
//! - Simplifies error handling across crate boundaries
//! - Allows errors to propagate naturally with the `?` operator
//! - Enables structured error matching for programmatic handling
//!
//! # Error Categories
//!
//! - **Lookup failures** ([`Error::FamilyNotFound`], [`Error::ColumnNotFound`],
//!   [`Error::AmbiguousColumn`]): name or qualifier resolution against a schema
//!   snapshot
//! - **Codec failures** ([`Error::InvalidDiscriminant`], [`Error::Unsupported`],
//!   [`Error::NotEncodeable`]): persisted enum bytes and qualifier encoding
//! - **Schema admission** ([`Error::ConstraintViolation`]): snapshot builds that
//!   would break PK/NOT-NULL/uniqueness rules
//! - **Catalog errors** ([`Error::CatalogError`]): corrupt or inconsistent
//!   persisted metadata
//! - **Internal errors** ([`Error::Internal`]): bugs or unexpected states

pub mod error;
pub mod result;

pub use error::Error;
pub use result::Result;
