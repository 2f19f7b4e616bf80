//! # Validate Subcommand
//!
//! Runs the construct pass over one document and prints the coerced result.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use sde_schema::{construct, CoercionRegistry};

use crate::document::{load_document, load_schema, render};
use crate::EXIT_REJECTED;

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema definition file (JSON or YAML).
    #[arg(long)]
    pub schema: PathBuf,

    /// Document to validate (JSON or YAML).
    pub document: PathBuf,

    /// Indent the printed document.
    #[arg(long)]
    pub pretty: bool,
}

/// Execute the validate subcommand against stdout.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    validate_to(args, &mut std::io::stdout().lock())
}

/// Execute the validate subcommand, writing output to `out`.
pub fn validate_to<W: Write>(args: &ValidateArgs, out: &mut W) -> Result<u8> {
    let schema = load_schema(&args.schema)?;
    let raw = load_document(&args.document)?;

    match construct(&raw, &schema, &CoercionRegistry::with_defaults()) {
        Ok(value) => {
            writeln!(out, "{}", render(&value, args.pretty)?)?;
            tracing::info!(document = %args.document.display(), "document valid");
            Ok(0)
        }
        Err(e) => {
            writeln!(out, "invalid: {e}")?;
            tracing::info!(
                document = %args.document.display(),
                reason = %e.reason(),
                path = %e.path(),
                "document rejected"
            );
            Ok(EXIT_REJECTED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const SCHEMA: &str = r#"
fields:
  one: {coerce: unicode}
objects: [four]
lists:
  seven: {contains: field, coerce: integer}
required: [one]
structs:
  four:
    fields:
      alpha: {coerce: integer}
"#;

    fn args(dir: &Path, doc: &str, pretty: bool) -> ValidateArgs {
        let schema = dir.join("schema.yaml");
        std::fs::write(&schema, SCHEMA).unwrap();
        let document = dir.join("doc.json");
        std::fs::write(&document, doc).unwrap();
        ValidateArgs {
            schema,
            document,
            pretty,
        }
    }

    #[test]
    fn valid_document_prints_coerced_json() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(dir.path(), r#"{"one": "hi", "four": {"alpha": "4"}, "seven": ["1", "2"]}"#, false);
        let mut out = Vec::new();
        assert_eq!(validate_to(&args, &mut out).unwrap(), 0);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"one\":\"hi\",\"four\":{\"alpha\":4},\"seven\":[1,2]}\n"
        );
    }

    #[test]
    fn invalid_document_reports_reason_and_path() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(dir.path(), r#"{"one": "hi", "seven": ["1", "x"]}"#, false);
        let mut out = Vec::new();
        assert_eq!(validate_to(&args, &mut out).unwrap(), EXIT_REJECTED);
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("invalid: coercion_failed at seven[1]"), "{text}");
    }

    #[test]
    fn missing_schema_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(dir.path(), "{}", false);
        args.schema = dir.path().join("absent.yaml");
        assert!(validate_to(&args, &mut Vec::new()).is_err());
    }
}
