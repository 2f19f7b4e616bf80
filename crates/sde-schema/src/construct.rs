//! # Construct — Validate and Coerce in One Pass
//!
//! `construct` walks a raw value depth-first against a [`Schema`] and builds
//! a new value in which every declared field is coerced and every nested
//! structure is either validated against its sub-schema or passed through.
//!
//! ## Rules, per mapping level
//!
//! 1. Every key must be declared; otherwise `disallowed_field`.
//! 2. Every required name must be present; otherwise `missing_required`.
//! 3. Fields are coerced through the registry; failure is `coercion_failed`.
//! 4. Objects must be mappings (`expected_object`) and are validated when a
//!    sub-schema is attached.
//! 5. Lists must be sequences (`expected_list`); elements are coerced,
//!    validated as mappings, or passed through per [`ListContents`].
//!
//! A key whose value is `null` counts as absent: it is dropped from the
//! output and does not satisfy a requirement.
//!
//! The first violation aborts the whole pass. There is no partial result.

use serde_json::Value;

use sde_core::{value_kind, CoercionId, CoercionRegistry, FieldPath, RawMap, Reason, StructureError};

use crate::definition::SchemaDefinition;
use crate::schema::{ListContents, Node, Schema};

/// Validate `raw` against `schema`, coercing leaf values.
///
/// # Errors
///
/// Returns the first `StructureError` encountered. `raw` itself must be a
/// mapping; anything else is `expected_object` at the root.
pub fn construct(
    raw: &Value,
    schema: &Schema,
    coercions: &CoercionRegistry,
) -> Result<Value, StructureError> {
    let root = FieldPath::root();
    let map = expect_object(raw, &root)?;
    construct_object(map, schema, coercions, &root).map(Value::Object)
}

/// Compile `definition` and construct `raw` against the result.
pub fn construct_definition(
    raw: &Value,
    definition: &SchemaDefinition,
    coercions: &CoercionRegistry,
) -> Result<Value, StructureError> {
    let schema = definition.compile()?;
    construct(raw, &schema, coercions)
}

/// Validate one mapping level. `path` is where this mapping sits in the
/// enclosing value, used to locate errors.
pub fn construct_object(
    raw: &RawMap,
    schema: &Schema,
    coercions: &CoercionRegistry,
    path: &FieldPath,
) -> Result<RawMap, StructureError> {
    for key in raw.keys() {
        if !schema.declares(key) {
            return Err(reject(
                Reason::DisallowedField,
                path.join_key(key.as_str()),
                format!("field '{key}' is not permitted here"),
            ));
        }
    }

    for name in schema.required() {
        if raw.get(name).map_or(true, Value::is_null) {
            return Err(reject(
                Reason::MissingRequired,
                path.join_key(name),
                format!("required field '{name}' is missing"),
            ));
        }
    }

    let mut out = RawMap::new();
    for (key, value) in raw {
        if value.is_null() {
            continue;
        }
        let Some(node) = schema.node(key) else {
            continue;
        };
        let here = path.join_key(key.as_str());
        let constructed = match node {
            Node::Field { coerce } => coerce_scalar(value, coerce, coercions, &here)?,
            Node::Object { schema } => construct_nested(value, schema.as_ref(), coercions, &here)?,
            Node::List(contents) => construct_list(value, contents, coercions, &here)?,
        };
        out.insert(key.clone(), constructed);
    }
    Ok(out)
}

fn coerce_scalar(
    value: &Value,
    coerce: &CoercionId,
    coercions: &CoercionRegistry,
    path: &FieldPath,
) -> Result<Value, StructureError> {
    coercions.apply(coerce, value).map_err(|e| {
        let err = StructureError::coercion(path.clone(), &e);
        tracing::debug!(path = %path, reason = %err.reason(), coerce = %coerce, "rejected raw value");
        err
    })
}

fn construct_nested(
    value: &Value,
    schema: Option<&Schema>,
    coercions: &CoercionRegistry,
    path: &FieldPath,
) -> Result<Value, StructureError> {
    let map = expect_object(value, path)?;
    match schema {
        Some(schema) => construct_object(map, schema, coercions, path).map(Value::Object),
        None => {
            tracing::trace!(path = %path, "unvalidated object passed through");
            Ok(value.clone())
        }
    }
}

fn construct_list(
    value: &Value,
    contents: &ListContents,
    coercions: &CoercionRegistry,
    path: &FieldPath,
) -> Result<Value, StructureError> {
    let items = value.as_array().ok_or_else(|| {
        reject(
            Reason::ExpectedList,
            path.clone(),
            format!("expected list, found {}", value_kind(value)),
        )
    })?;

    let constructed = match contents {
        ListContents::Field { coerce } => items
            .iter()
            .enumerate()
            .map(|(i, item)| coerce_scalar(item, coerce, coercions, &path.join_index(i)))
            .collect::<Result<Vec<_>, _>>()?,
        ListContents::Object { schema } => items
            .iter()
            .enumerate()
            .map(|(i, item)| construct_nested(item, schema.as_ref(), coercions, &path.join_index(i)))
            .collect::<Result<Vec<_>, _>>()?,
        ListContents::Whatever => {
            tracing::trace!(path = %path, "unchecked list passed through");
            items.clone()
        }
    };
    Ok(Value::Array(constructed))
}

fn expect_object<'a>(value: &'a Value, path: &FieldPath) -> Result<&'a RawMap, StructureError> {
    value.as_object().ok_or_else(|| {
        reject(
            Reason::ExpectedObject,
            path.clone(),
            format!("expected object, found {}", value_kind(value)),
        )
    })
}

fn reject(reason: Reason, path: FieldPath, detail: String) -> StructureError {
    tracing::debug!(path = %path, reason = %reason, "rejected raw value");
    StructureError::new(reason, path, detail)
}
