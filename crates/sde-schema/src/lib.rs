//! # sde-schema — Schemas and the Construct Pass
//!
//! Declarative schemas for loosely-typed nested data, and the recursive
//! validator/coercer that turns raw data into data guaranteed to conform.
//!
//! ## Schema Model (`schema`)
//!
//! [`Schema`] holds one [`Node`] per declared name: a coerced field, a nested
//! object (optionally with its own schema), or a list of fields, objects, or
//! anything. Schemas are plain values built in code with [`Schema::builder`].
//!
//! ## Schema Definitions (`definition`)
//!
//! [`SchemaDefinition`] is the serializable `fields` / `objects` / `lists` /
//! `required` / `structs` form, loadable from JSON or YAML and compiled into
//! a `Schema`. Configuration errors surface at compile time.
//!
//! ## Construct (`construct`)
//!
//! [`construct`] validates and coerces in a single depth-first pass. It
//! either returns a fully coerced value or the first [`StructureError`]
//! found, with its path and reason code.
//!
//! ## Crate Policy
//!
//! - Depends only on `sde-core` internally.
//! - No I/O except loading definition files on request.
//! - `construct` never mutates its input.

pub mod construct;
pub mod definition;
pub mod schema;

pub use construct::{construct, construct_definition, construct_object};
pub use definition::{FieldDefinition, ListDefinition, SchemaDefinition, SchemaLoadError};
pub use schema::{ListContents, Node, Schema, SchemaBuilder};

pub use sde_core::{CoercionRegistry, Reason, StructureError};
