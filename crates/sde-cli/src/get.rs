//! # Get Subcommand
//!
//! Validates a document, then prints the value found at a dot-path. Strings
//! are printed bare; everything else is printed as JSON.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde_json::Value;

use sde_core::DotPath;
use sde_object::{DataObj, DataObjError, Model};

use crate::document::{load_document, load_schema, render};
use crate::EXIT_REJECTED;

/// Arguments for the get subcommand.
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Schema definition file (JSON or YAML).
    #[arg(long)]
    pub schema: PathBuf,

    /// Document to read (JSON or YAML).
    pub document: PathBuf,

    /// Dot-separated path to the value, e.g. `objy.one`.
    pub path: String,

    /// Indent structured values.
    #[arg(long)]
    pub pretty: bool,
}

/// Execute the get subcommand against stdout.
pub fn run_get(args: &GetArgs) -> Result<u8> {
    get_to(args, &mut std::io::stdout().lock())
}

/// Execute the get subcommand, writing output to `out`.
pub fn get_to<W: Write>(args: &GetArgs, out: &mut W) -> Result<u8> {
    let model = Model::new(load_schema(&args.schema)?).shared();
    let raw = load_document(&args.document)?;

    let obj = match DataObj::from_raw(raw, model) {
        Ok(obj) => obj,
        Err(DataObjError::Structure(e)) => {
            writeln!(out, "invalid: {e}")?;
            return Ok(EXIT_REJECTED);
        }
        Err(e) => return Err(e.into()),
    };

    let path = DotPath::parse(&args.path);
    match obj.get(&path) {
        Some(Value::String(s)) => writeln!(out, "{s}")?,
        Some(value) => writeln!(out, "{}", render(value, args.pretty)?)?,
        None => {
            writeln!(out, "not found: {path}")?;
            tracing::debug!(path = %path, "path absent");
            return Ok(EXIT_REJECTED);
        }
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(dir: &std::path::Path, path: &str) -> GetArgs {
        let schema = dir.join("schema.json");
        std::fs::write(
            &schema,
            r#"{"fields": {"n": {"coerce": "integer"}}, "objects": ["objy"]}"#,
        )
        .unwrap();
        let document = dir.join("doc.yaml");
        std::fs::write(&document, "n: \"1,024\"\nobjy:\n  one: first\n  deep: {x: [1, 2]}\n").unwrap();
        GetArgs {
            schema,
            document,
            path: path.to_string(),
            pretty: false,
        }
    }

    fn output(args: &GetArgs) -> (u8, String) {
        let mut out = Vec::new();
        let code = get_to(args, &mut out).unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    #[test]
    fn prints_string_bare() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(output(&args(dir.path(), "objy.one")), (0, "first\n".to_string()));
    }

    #[test]
    fn prints_coerced_and_structured_values_as_json() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(output(&args(dir.path(), "n")), (0, "1024\n".to_string()));
        assert_eq!(
            output(&args(dir.path(), "objy.deep")),
            (0, "{\"x\":[1,2]}\n".to_string())
        );
    }

    #[test]
    fn absent_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let (code, text) = output(&args(dir.path(), "objy.missing.leaf"));
        assert_eq!(code, EXIT_REJECTED);
        assert_eq!(text, "not found: objy.missing.leaf\n");
    }

    #[test]
    fn invalid_document_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(dir.path(), "n");
        std::fs::write(&args.document, "n: 1\nextra: true\n").unwrap();
        let (code, text) = output(&args);
        assert_eq!(code, EXIT_REJECTED);
        assert!(text.starts_with("invalid: disallowed_field at extra"), "{text}");
    }
}
