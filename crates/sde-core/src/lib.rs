//! # sde-core — Foundational Types for the Structured Data Engine
//!
//! This crate is the leaf of the workspace. It defines the vocabulary every
//! other crate speaks: where a violation happened, why it happened, and how
//! loosely-typed scalars are turned into the semantic types a schema asks for.
//!
//! ## Key Design Principles
//!
//! 1. **Machine-distinguishable failures.** `StructureError` carries a
//!    [`Reason`] code and a [`FieldPath`]. Callers branch on the code, never
//!    on the message text.
//!
//! 2. **Two kinds of path.** [`FieldPath`] locates a violation and may index
//!    into sequences. [`DotPath`] addresses a value for get/set/delete and is
//!    made of mapping keys only.
//!
//! 3. **Coercions are data.** A schema names a [`CoercionId`]; the caller
//!    supplies a [`CoercionRegistry`] that maps ids to functions. Nothing is
//!    hard-wired into the validator.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `sde-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod coerce;
pub mod error;
pub mod path;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use coerce::{
    to_bool, to_float, to_int, to_unicode, to_url, to_utc_datetime, value_kind, CoerceFn,
    CoercionId, CoercionRegistry,
};
pub use error::{CoercionError, Reason, StructureError};
pub use path::{DotPath, FieldPath, Segment};
pub use temporal::UtcTimestamp;

/// The mapping type used for every object level of a raw value.
///
/// Key order is insertion order, so validated output keeps the order the
/// caller supplied.
pub type RawMap = serde_json::Map<String, serde_json::Value>;
