//! # Schema Model
//!
//! A [`Schema`] describes one nesting level: which names may appear, what
//! kind of structure each name denotes, and which names are required.
//!
//! Each declared name maps to exactly one [`Node`]. Because a name is a key
//! in a single map, it cannot be both a field and an object, so the
//! "one name, one kind" rule holds by construction. Validation matches
//! exhaustively on `Node` and [`ListContents`]; a new kind of list content
//! is a compile-time change to every consumer.

use std::collections::{BTreeMap, BTreeSet};

use sde_core::{CoercionId, DotPath};

/// What a declared name denotes at one schema level.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A leaf scalar, coerced with the named coercion.
    Field {
        /// Coercion applied to the raw scalar.
        coerce: CoercionId,
    },
    /// A nested mapping. Without a sub-schema its content passes through
    /// unvalidated.
    Object {
        /// Schema for the mapping's content, if any.
        schema: Option<Schema>,
    },
    /// A sequence whose elements are handled per [`ListContents`].
    List(ListContents),
}

impl Node {
    /// Short name of this node kind, for messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Field { .. } => "field",
            Self::Object { .. } => "object",
            Self::List(_) => "list",
        }
    }
}

/// What the elements of a declared list are.
#[derive(Debug, Clone, PartialEq)]
pub enum ListContents {
    /// Every element is a scalar coerced with the named coercion.
    Field {
        /// Coercion applied to each element.
        coerce: CoercionId,
    },
    /// Every element is a mapping, validated against the schema if present.
    Object {
        /// Schema for each element, if any.
        schema: Option<Schema>,
    },
    /// Elements pass through with no check at all.
    Whatever,
}

/// Structure of one nesting level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    nodes: BTreeMap<String, Node>,
    required: BTreeSet<String>,
}

impl Schema {
    /// Start building a schema.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// The declaration for `name`, if any.
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    /// All declarations, in name order.
    pub fn nodes(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.nodes.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Names that must be present, in name order.
    pub fn required(&self) -> impl Iterator<Item = &str> {
        self.required.iter().map(String::as_str)
    }

    /// Returns true if `name` must be present.
    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(name)
    }

    /// Returns true if `name` is declared in any category.
    pub fn declares(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// The coercion declared for a field, if `name` is a field.
    pub fn field_coercion(&self, name: &str) -> Option<&CoercionId> {
        match self.nodes.get(name) {
            Some(Node::Field { coerce }) => Some(coerce),
            _ => None,
        }
    }

    /// The sub-schema attached to an object, or to the elements of a list
    /// of objects, named `name`.
    pub fn child(&self, name: &str) -> Option<&Schema> {
        match self.nodes.get(name)? {
            Node::Object { schema } => schema.as_ref(),
            Node::List(ListContents::Object { schema }) => schema.as_ref(),
            Node::Field { .. } | Node::List(_) => None,
        }
    }

    /// Follow [`child`](Self::child) along every segment of `path`.
    pub fn resolve(&self, path: &DotPath) -> Option<&Schema> {
        path.segments()
            .iter()
            .try_fold(self, |schema, segment| schema.child(segment))
    }

    /// Number of declared names.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if nothing is declared. Such a schema only accepts `{}`.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Incremental construction of a [`Schema`].
///
/// Declaring a name a second time replaces the earlier declaration.
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    fn declare(mut self, name: impl Into<String>, node: Node) -> Self {
        self.schema.nodes.insert(name.into(), node);
        self
    }

    /// Declare a leaf field.
    pub fn field(self, name: impl Into<String>, coerce: impl Into<CoercionId>) -> Self {
        self.declare(
            name,
            Node::Field {
                coerce: coerce.into(),
            },
        )
    }

    /// Declare an object whose content is not validated.
    pub fn object(self, name: impl Into<String>) -> Self {
        self.declare(name, Node::Object { schema: None })
    }

    /// Declare an object validated against `schema`.
    pub fn object_with(self, name: impl Into<String>, schema: Schema) -> Self {
        self.declare(
            name,
            Node::Object {
                schema: Some(schema),
            },
        )
    }

    /// Declare a list of scalars, each coerced.
    pub fn list_of_fields(self, name: impl Into<String>, coerce: impl Into<CoercionId>) -> Self {
        self.declare(
            name,
            Node::List(ListContents::Field {
                coerce: coerce.into(),
            }),
        )
    }

    /// Declare a list of mappings whose content is not validated.
    pub fn list_of_objects(self, name: impl Into<String>) -> Self {
        self.declare(name, Node::List(ListContents::Object { schema: None }))
    }

    /// Declare a list of mappings, each validated against `schema`.
    pub fn list_of_objects_with(self, name: impl Into<String>, schema: Schema) -> Self {
        self.declare(
            name,
            Node::List(ListContents::Object {
                schema: Some(schema),
            }),
        )
    }

    /// Declare a list whose elements are not checked.
    pub fn list_of_anything(self, name: impl Into<String>) -> Self {
        self.declare(name, Node::List(ListContents::Whatever))
    }

    /// Mark a name as required.
    pub fn required(mut self, name: impl Into<String>) -> Self {
        self.schema.required.insert(name.into());
        self
    }

    /// Finish the schema.
    pub fn build(self) -> Schema {
        self.schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Schema {
        let four = Schema::builder().field("alpha", "integer").build();
        let nine = Schema::builder().field("beta", "integer").build();
        Schema::builder()
            .field("one", "unicode")
            .object("three")
            .object_with("four", four)
            .list_of_anything("six")
            .list_of_fields("seven", "integer")
            .list_of_objects("eight")
            .list_of_objects_with("nine", nine)
            .required("one")
            .build()
    }

    #[test]
    fn test_node_lookup() {
        let schema = sample();
        assert_eq!(schema.len(), 7);
        assert_eq!(schema.node("one").map(Node::kind), Some("field"));
        assert_eq!(schema.node("four").map(Node::kind), Some("object"));
        assert_eq!(schema.node("seven").map(Node::kind), Some("list"));
        assert!(schema.node("two").is_none());
        assert!(schema.declares("eight"));
    }

    #[test]
    fn test_required() {
        let schema = sample();
        assert!(schema.is_required("one"));
        assert!(!schema.is_required("three"));
        assert_eq!(schema.required().collect::<Vec<_>>(), ["one"]);
    }

    #[test]
    fn test_field_coercion() {
        let schema = sample();
        assert_eq!(schema.field_coercion("one").map(CoercionId::as_str), Some("unicode"));
        assert!(schema.field_coercion("four").is_none());
    }

    #[test]
    fn test_child_schemas() {
        let schema = sample();
        assert!(schema.child("four").is_some_and(|s| s.declares("alpha")));
        assert!(schema.child("nine").is_some_and(|s| s.declares("beta")));
        assert!(schema.child("three").is_none());
        assert!(schema.child("eight").is_none());
        assert!(schema.child("one").is_none());
        assert!(schema.child("missing").is_none());
    }

    #[test]
    fn test_resolve_nested() {
        let leaf = Schema::builder().field("x", "unicode").build();
        let mid = Schema::builder().object_with("b", leaf).build();
        let top = Schema::builder().list_of_objects_with("a", mid).build();
        let resolved = top.resolve(&DotPath::parse("a.b")).unwrap();
        assert!(resolved.declares("x"));
        assert!(top.resolve(&DotPath::parse("a.c")).is_none());
    }

    #[test]
    fn test_redeclaration_replaces() {
        let schema = Schema::builder()
            .field("name", "unicode")
            .object("name")
            .build();
        assert_eq!(schema.len(), 1);
        assert_eq!(schema.node("name"), Some(&Node::Object { schema: None }));
    }
}
