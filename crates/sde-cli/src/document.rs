//! # Document and Schema Loading
//!
//! Files are parsed by extension: `.yaml`/`.yml` as YAML, anything else as
//! JSON.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use sde_schema::{Schema, SchemaDefinition};

/// Read a document file into a JSON value.
pub fn load_document(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read document: {}", path.display()))?;
    if is_yaml(path) {
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse YAML document: {}", path.display()))
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON document: {}", path.display()))
    }
}

/// Read and compile a schema definition file.
pub fn load_schema(path: &Path) -> Result<Schema> {
    let schema = SchemaDefinition::load(path)
        .with_context(|| format!("failed to load schema: {}", path.display()))?;
    tracing::debug!(schema = %path.display(), names = schema.len(), "schema loaded");
    Ok(schema)
}

/// Render a value as JSON, compact or indented.
pub fn render(value: &Value, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    )
}
