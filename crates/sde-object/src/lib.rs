//! # sde-object — Structured Values
//!
//! A [`DataObj`] owns a nested mapping and reads and writes it by dot-path.
//! Its [`Model`] carries the schema the mapping must satisfy, the named
//! accessors it exposes, and the coercions the schema refers to.
//!
//! ## Path Operations (`ops`)
//!
//! `get` never fails on a missing path. `set` creates intermediate mappings
//! and replaces a non-mapping in the way. `delete` prunes every ancestor the
//! removal leaves empty, up to the first non-empty one.
//!
//! ## Views (`view`)
//!
//! Wrapping a nested mapping does not copy it. [`DataObjRef`] and
//! [`DataObjMut`] borrow the sub-mapping from the owning tree together with
//! the sub-schema in scope, so writes through a child view are writes to the
//! parent.
//!
//! ## Crate Policy
//!
//! - Validation runs only in [`DataObj::from_raw`] and [`DataObj::validate`].
//!   Path operations never validate.
//! - Single-threaded: a `DataObj` has no interior mutability.

pub mod accessor;
pub mod dataobj;
pub mod error;
pub mod model;
pub mod ops;
pub mod view;

pub use accessor::{Accessor, Accessors, Wrap};
pub use dataobj::DataObj;
pub use error::DataObjError;
pub use model::Model;
pub use view::{DataObjMut, DataObjRef, Property, PropertyMut};
