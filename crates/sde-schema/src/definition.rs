//! # Schema Definitions
//!
//! The data form of a schema: the `fields` / `objects` / `lists` /
//! `required` / `structs` layout that schemas are written in when they live
//! outside Rust code, as JSON or YAML.
//!
//! A [`SchemaDefinition`] is compiled into a [`Schema`] before use.
//! Compilation is where configuration mistakes surface:
//!
//! - an unknown list `contains` directive, or `contains: field` without a
//!   `coerce`, is `bad_list_contains_directive`;
//! - a name declared in more than one category is `conflicting_declaration`;
//! - a misspelled top-level key is rejected at load time because the
//!   definition denies unknown fields.
//!
//! ```yaml
//! fields:
//!   title: { coerce: unicode }
//! objects: [objy]
//! lists:
//!   listy: { contains: object }
//! required: [title]
//! structs:
//!   objy:
//!     fields:
//!       one: { coerce: unicode }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use sde_core::{CoercionId, FieldPath, Reason, StructureError};

use crate::schema::{ListContents, Node, Schema, SchemaBuilder};

/// `contains` directive for a list of scalars.
pub const CONTAINS_FIELD: &str = "field";
/// `contains` directive for a list of mappings.
pub const CONTAINS_OBJECT: &str = "object";
/// `contains` directive for an unchecked list.
pub const CONTAINS_WHATEVER: &str = "whatever";

/// Serializable description of one schema level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDefinition {
    /// Leaf fields and their coercions.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, FieldDefinition>,
    /// Names that must be nested mappings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub objects: Vec<String>,
    /// List fields and what they contain.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub lists: BTreeMap<String, ListDefinition>,
    /// Names that must be present.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// Sub-schemas for objects and lists of objects, by name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub structs: BTreeMap<String, SchemaDefinition>,
}

/// A leaf field declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDefinition {
    /// Coercion id applied to the value.
    pub coerce: CoercionId,
}

/// A list declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListDefinition {
    /// One of `field`, `object`, `whatever`.
    pub contains: String,
    /// Coercion for `contains: field`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coerce: Option<CoercionId>,
}

/// Error loading a schema definition from text or a file.
#[derive(Error, Debug)]
pub enum SchemaLoadError {
    /// The text is not valid JSON or not a valid definition.
    #[error("invalid JSON schema definition: {0}")]
    Json(#[from] serde_json::Error),

    /// The text is not valid YAML or not a valid definition.
    #[error("invalid YAML schema definition: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The definition parsed but does not compile.
    #[error("schema definition does not compile: {0}")]
    Compile(#[from] StructureError),

    /// IO error reading the definition file.
    #[error("cannot read schema definition '{path}': {source}")]
    Io {
        /// File that could not be read.
        path: String,
        /// Underlying IO error.
        source: std::io::Error,
    },
}

impl SchemaDefinition {
    /// Parse a definition from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, SchemaLoadError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse a definition from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, SchemaLoadError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Read a definition from a file. `.yaml`/`.yml` files are parsed as
    /// YAML, anything else as JSON.
    pub fn from_path(path: &Path) -> Result<Self, SchemaLoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| SchemaLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext {
            "yaml" | "yml" => Self::from_yaml_str(&content),
            _ => Self::from_json_str(&content),
        }
    }

    /// Read and compile a definition file in one step.
    pub fn load(path: &Path) -> Result<Schema, SchemaLoadError> {
        Ok(Self::from_path(path)?.compile()?)
    }

    /// Compile this definition into a [`Schema`].
    ///
    /// # Errors
    ///
    /// Returns a `StructureError` with `bad_list_contains_directive` or
    /// `conflicting_declaration`, located at the offending name.
    pub fn compile(&self) -> Result<Schema, StructureError> {
        self.compile_at(&FieldPath::root())
    }

    fn compile_at(&self, path: &FieldPath) -> Result<Schema, StructureError> {
        self.check_conflicts(path)?;

        let mut builder = Schema::builder();

        for (name, field) in &self.fields {
            builder = builder.field(name.as_str(), field.coerce.clone());
        }

        for name in &self.objects {
            builder = match self.sub_schema(name, path)? {
                Some(schema) => builder.object_with(name.as_str(), schema),
                None => builder.object(name.as_str()),
            };
        }

        for (name, list) in &self.lists {
            builder = self.compile_list(builder, name, list, path)?;
        }

        for name in &self.required {
            builder = builder.required(name.as_str());
        }

        let schema = builder.build();

        for name in self.structs.keys() {
            let attached = matches!(
                schema.node(name),
                Some(Node::Object { .. } | Node::List(ListContents::Object { .. }))
            );
            if !attached {
                tracing::warn!(
                    path = %path.join_key(name.as_str()),
                    "structs entry does not name an object or a list of objects; ignored"
                );
            }
        }

        Ok(schema)
    }

    fn compile_list(
        &self,
        builder: SchemaBuilder,
        name: &str,
        list: &ListDefinition,
        path: &FieldPath,
    ) -> Result<SchemaBuilder, StructureError> {
        match list.contains.as_str() {
            CONTAINS_FIELD => match &list.coerce {
                Some(coerce) => Ok(builder.list_of_fields(name, coerce.clone())),
                None => Err(StructureError::new(
                    Reason::BadListContainsDirective,
                    path.join_key(name),
                    "a list that contains fields must declare a coerce",
                )),
            },
            CONTAINS_OBJECT => Ok(match self.sub_schema(name, path)? {
                Some(schema) => builder.list_of_objects_with(name, schema),
                None => builder.list_of_objects(name),
            }),
            CONTAINS_WHATEVER => Ok(builder.list_of_anything(name)),
            other => Err(StructureError::new(
                Reason::BadListContainsDirective,
                path.join_key(name),
                format!(
                    "unknown contains directive {other:?}; expected one of \
                     {CONTAINS_FIELD:?}, {CONTAINS_OBJECT:?}, {CONTAINS_WHATEVER:?}"
                ),
            )),
        }
    }

    fn sub_schema(&self, name: &str, path: &FieldPath) -> Result<Option<Schema>, StructureError> {
        self.structs
            .get(name)
            .map(|def| def.compile_at(&path.join_key(name)))
            .transpose()
    }

    fn check_conflicts(&self, path: &FieldPath) -> Result<(), StructureError> {
        let conflict = |name: &str, first: &str, second: &str| {
            StructureError::new(
                Reason::ConflictingDeclaration,
                path.join_key(name),
                format!("declared as both {first} and {second}"),
            )
        };

        for name in &self.objects {
            if self.fields.contains_key(name) {
                return Err(conflict(name, "field", "object"));
            }
            if self.lists.contains_key(name) {
                return Err(conflict(name, "object", "list"));
            }
        }
        for name in self.lists.keys() {
            if self.fields.contains_key(name) {
                return Err(conflict(name, "field", "list"));
            }
        }
        Ok(())
    }
}
