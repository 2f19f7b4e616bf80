//! # Check-Schema Subcommand
//!
//! Loads and compiles a schema definition without validating anything
//! against it. A definition that does not parse or does not compile is
//! rejected (exit 1); a file that cannot be read is an IO error.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use sde_schema::{SchemaDefinition, SchemaLoadError};

use crate::EXIT_REJECTED;

/// Arguments for the check-schema subcommand.
#[derive(Args, Debug)]
pub struct CheckSchemaArgs {
    /// Schema definition file (JSON or YAML).
    pub schema: PathBuf,
}

/// Execute the check-schema subcommand against stdout.
pub fn run_check_schema(args: &CheckSchemaArgs) -> Result<u8> {
    check_schema_to(args, &mut std::io::stdout().lock())
}

/// Execute the check-schema subcommand, writing output to `out`.
pub fn check_schema_to<W: Write>(args: &CheckSchemaArgs, out: &mut W) -> Result<u8> {
    let compiled = SchemaDefinition::from_path(&args.schema)
        .and_then(|def| def.compile().map_err(SchemaLoadError::from));
    match compiled {
        Ok(schema) => {
            let required = schema.required().count();
            writeln!(
                out,
                "ok: {} ({} declared names, {required} required)",
                args.schema.display(),
                schema.len()
            )?;
            Ok(0)
        }
        Err(e @ SchemaLoadError::Io { .. }) => Err(e.into()),
        Err(e) => {
            writeln!(out, "invalid: {e}")?;
            tracing::info!(schema = %args.schema.display(), "schema rejected");
            Ok(EXIT_REJECTED)
        }
    }
}
