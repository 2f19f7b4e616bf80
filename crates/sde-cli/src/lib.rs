//! # sde-cli — Structured Data Engine Command-Line Interface
//!
//! Provides the `sde` binary, a thin front end over `sde-schema` and
//! `sde-object` for checking documents against schema files.
//!
//! ## Subcommands
//!
//! - `sde validate`: Construct a document against a schema and print the
//!   coerced result.
//! - `sde get`: Validate, then print the value at a dot-path.
//! - `sde check-schema`: Load and compile a schema definition.
//!
//! ```bash
//! sde validate --schema record.yaml doc.json --pretty
//! sde get --schema record.yaml doc.json objy.one
//! sde check-schema record.yaml
//! ```
//!
//! ## Exit Codes
//!
//! - `0`: success.
//! - `1`: the document or schema was rejected, or a path was not found.
//! - `2`: usage or IO error.
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers live here and take a
//!   writer so they can be tested without capturing stdout.
//! - Handlers return `anyhow::Result<u8>`. `Err` is reserved for usage and
//!   IO failures; a rejected document is `Ok(1)`.

pub mod check_schema;
pub mod document;
pub mod get;
pub mod validate;

/// Exit code for a rejected document, rejected schema, or missing path.
pub const EXIT_REJECTED: u8 = 1;

/// Exit code for usage and IO errors.
pub const EXIT_USAGE: u8 = 2;
