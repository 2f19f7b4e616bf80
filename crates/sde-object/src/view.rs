//! # Borrowed Views
//!
//! [`DataObjRef`] and [`DataObjMut`] are structured views over one mapping
//! inside a larger tree. They borrow that mapping from whoever owns the
//! tree, so a change made through a `DataObjMut` is a change to the owner's
//! data. Views are created on demand and are never cached.
//!
//! Each view carries the sub-schema in scope for its mapping (if the owner's
//! schema declares one for that path) and the owner's coercion registry, so
//! `set_field` on a nested view coerces the same way the owner would.

use serde_json::Value;

use sde_core::{value_kind, CoercionId, CoercionRegistry, DotPath, FieldPath, RawMap, Reason, StructureError};
use sde_schema::Schema;

use crate::error::DataObjError;
use crate::ops;

/// Schema and coercions in effect for a view.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Scope<'a> {
    pub(crate) schema: Option<&'a Schema>,
    pub(crate) coercions: &'a CoercionRegistry,
}

impl<'a> Scope<'a> {
    fn descend(&self, path: &DotPath) -> Scope<'a> {
        Scope {
            schema: self.schema.and_then(|s| s.resolve(path)),
            coercions: self.coercions,
        }
    }

    fn coerce_field(&self, name: &str, value: Value) -> Result<Value, DataObjError> {
        match self.schema.and_then(|s| s.field_coercion(name)) {
            Some(coerce) => self.coerce(&DotPath::single(name), value, coerce),
            None => Ok(value),
        }
    }

    fn coerce(&self, path: &DotPath, value: Value, coerce: &CoercionId) -> Result<Value, DataObjError> {
        self.coercions
            .apply(coerce, &value)
            .map_err(|source| DataObjError::Coercion {
                path: path.clone(),
                source,
            })
    }
}

/// What a wrapping accessor or `wrap` call resolved to.
#[derive(Debug)]
pub enum Property<'a> {
    /// The stored value, unwrapped.
    Raw(&'a Value),
    /// A mapping, as a view.
    Object(DataObjRef<'a>),
    /// A list of mappings, one view per element.
    List(Vec<DataObjRef<'a>>),
}

/// Mutable counterpart of [`Property`].
#[derive(Debug)]
pub enum PropertyMut<'a> {
    /// The stored value, unwrapped.
    Raw(&'a mut Value),
    /// A mapping, as a view.
    Object(DataObjMut<'a>),
    /// A list of mappings, one view per element.
    List(Vec<DataObjMut<'a>>),
}

/// Read-only structured view over a borrowed mapping.
#[derive(Debug, Clone, Copy)]
pub struct DataObjRef<'a> {
    data: &'a RawMap,
    scope: Scope<'a>,
}

impl<'a> DataObjRef<'a> {
    pub(crate) fn new(data: &'a RawMap, scope: Scope<'a>) -> Self {
        Self { data, scope }
    }

    /// The mapping this view covers.
    pub fn data(&self) -> &'a RawMap {
        self.data
    }

    /// Schema in scope for this mapping, if any.
    pub fn schema(&self) -> Option<&'a Schema> {
        self.scope.schema
    }

    /// Value at a dot-path, or `None` if any segment is missing.
    pub fn get(&self, path: impl Into<DotPath>) -> Option<&'a Value> {
        ops::get(self.data, &path.into())
    }

    /// Value under one key, taken literally.
    pub fn get_field(&self, name: &str) -> Option<&'a Value> {
        self.data.get(name)
    }

    /// Returns true if a value exists at the path.
    pub fn contains(&self, path: impl Into<DotPath>) -> bool {
        self.get(path).is_some()
    }

    /// The mapping at `path` as a view.
    ///
    /// # Errors
    ///
    /// `expected_object` if something other than a mapping is there.
    pub fn object(&self, path: impl Into<DotPath>) -> Result<Option<DataObjRef<'a>>, StructureError> {
        let path = path.into();
        let scope = self.scope.descend(&path);
        match ops::get(self.data, &path) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(DataObjRef::new(map, scope))),
            Some(other) => Err(expected(Reason::ExpectedObject, FieldPath::from(&path), other)),
        }
    }

    /// The list of mappings at `path`, one view per element.
    ///
    /// # Errors
    ///
    /// `expected_list` if something other than a list is there, and
    /// `expected_object` for an element that is not a mapping.
    pub fn list(&self, path: impl Into<DotPath>) -> Result<Option<Vec<DataObjRef<'a>>>, StructureError> {
        let path = path.into();
        let scope = self.scope.descend(&path);
        match ops::get(self.data, &path) {
            None => Ok(None),
            Some(Value::Array(items)) => wrap_items(items, scope, &path).map(Some),
            Some(other) => Err(expected(Reason::ExpectedList, FieldPath::from(&path), other)),
        }
    }

    /// Wrap whatever is at `path` according to its shape.
    pub fn wrap(&self, path: impl Into<DotPath>) -> Result<Option<Property<'a>>, StructureError> {
        let path = path.into();
        let scope = self.scope.descend(&path);
        ops::get(self.data, &path)
            .map(|value| wrap_value(value, scope, &path))
            .transpose()
    }

    /// Number of top-level keys.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// An owned copy of the mapping.
    pub fn to_value(&self) -> Value {
        Value::Object(self.data.clone())
    }
}

/// Mutable structured view over a borrowed mapping.
#[derive(Debug)]
pub struct DataObjMut<'a> {
    data: &'a mut RawMap,
    scope: Scope<'a>,
}

impl<'a> DataObjMut<'a> {
    pub(crate) fn new(data: &'a mut RawMap, scope: Scope<'a>) -> Self {
        Self { data, scope }
    }

    /// Reborrow as a read-only view.
    pub fn as_view(&self) -> DataObjRef<'_> {
        DataObjRef::new(self.data, self.scope)
    }

    /// The mapping this view covers.
    pub fn data(&self) -> &RawMap {
        self.data
    }

    /// Value at a dot-path, or `None` if any segment is missing.
    pub fn get(&self, path: impl Into<DotPath>) -> Option<&Value> {
        ops::get(self.data, &path.into())
    }

    /// Mutable value at a dot-path.
    pub fn get_mut(&mut self, path: impl Into<DotPath>) -> Option<&mut Value> {
        ops::get_mut(self.data, &path.into())
    }

    /// Set the value at a dot-path, creating intermediate mappings. A
    /// non-mapping in the way is replaced. Returns the previous value.
    pub fn set(&mut self, path: impl Into<DotPath>, value: impl Into<Value>) -> Option<Value> {
        ops::set(self.data, &path.into(), value.into())
    }

    /// Set one key, coercing with the schema's declared coercion for that
    /// field if there is one.
    pub fn set_field(&mut self, name: &str, value: impl Into<Value>) -> Result<(), DataObjError> {
        let coerced = self.scope.coerce_field(name, value.into())?;
        self.data.insert(name.to_string(), coerced);
        Ok(())
    }

    /// Set a dot-path after applying an explicit coercion.
    pub fn set_coerced(
        &mut self,
        path: impl Into<DotPath>,
        value: impl Into<Value>,
        coerce: &CoercionId,
    ) -> Result<(), DataObjError> {
        let path = path.into();
        let coerced = self.scope.coerce(&path, value.into(), coerce)?;
        ops::set(self.data, &path, coerced);
        Ok(())
    }

    /// Append to the list at a dot-path, creating it if needed.
    pub fn add_to_list(&mut self, path: impl Into<DotPath>, value: impl Into<Value>) {
        ops::append(self.data, &path.into(), value.into());
    }

    /// Remove the value at a dot-path and prune emptied ancestors.
    pub fn delete(&mut self, path: impl Into<DotPath>) -> Option<Value> {
        ops::delete(self.data, &path.into())
    }

    /// The mapping at `path` as a mutable view.
    pub fn object_mut(&mut self, path: impl Into<DotPath>) -> Result<Option<DataObjMut<'_>>, StructureError> {
        let path = path.into();
        let scope = self.scope.descend(&path);
        match ops::get_mut(self.data, &path) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(DataObjMut::new(map, scope))),
            Some(other) => Err(expected(Reason::ExpectedObject, FieldPath::from(&path), other)),
        }
    }

    /// The list of mappings at `path`, one mutable view per element.
    pub fn list_mut(&mut self, path: impl Into<DotPath>) -> Result<Option<Vec<DataObjMut<'_>>>, StructureError> {
        let path = path.into();
        let scope = self.scope.descend(&path);
        match ops::get_mut(self.data, &path) {
            None => Ok(None),
            Some(Value::Array(items)) => wrap_items_mut(items, scope, &path).map(Some),
            Some(other) => Err(expected(Reason::ExpectedList, FieldPath::from(&path), other)),
        }
    }

    /// Consume the view, wrapping whatever is at `path` by its shape for the
    /// full lifetime of the borrow.
    pub fn into_wrap(self, path: impl Into<DotPath>) -> Result<Option<PropertyMut<'a>>, StructureError> {
        let path = path.into();
        let scope = self.scope.descend(&path);
        ops::get_mut(self.data, &path)
            .map(|value| wrap_value_mut(value, scope, &path))
            .transpose()
    }

    /// Consume the view, returning the raw value at `path`.
    pub fn into_raw(self, path: impl Into<DotPath>) -> Option<&'a mut Value> {
        ops::get_mut(self.data, &path.into())
    }
}

pub(crate) fn wrap_value<'a>(
    value: &'a Value,
    scope: Scope<'a>,
    path: &DotPath,
) -> Result<Property<'a>, StructureError> {
    match value {
        Value::Object(map) => Ok(Property::Object(DataObjRef::new(map, scope))),
        Value::Array(items) => wrap_items(items, scope, path).map(Property::List),
        other => Err(expected(Reason::ExpectedObject, FieldPath::from(path), other)),
    }
}

pub(crate) fn wrap_value_mut<'a>(
    value: &'a mut Value,
    scope: Scope<'a>,
    path: &DotPath,
) -> Result<PropertyMut<'a>, StructureError> {
    match value {
        Value::Object(map) => Ok(PropertyMut::Object(DataObjMut::new(map, scope))),
        Value::Array(items) => wrap_items_mut(items, scope, path).map(PropertyMut::List),
        other => Err(expected(Reason::ExpectedObject, FieldPath::from(&*path), other)),
    }
}

fn wrap_items<'a>(
    items: &'a [Value],
    scope: Scope<'a>,
    path: &DotPath,
) -> Result<Vec<DataObjRef<'a>>, StructureError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(map) => Ok(DataObjRef::new(map, scope)),
            other => Err(expected(Reason::ExpectedObject, FieldPath::from(path).index(i), other)),
        })
        .collect()
}

fn wrap_items_mut<'a>(
    items: &'a mut [Value],
    scope: Scope<'a>,
    path: &DotPath,
) -> Result<Vec<DataObjMut<'a>>, StructureError> {
    items
        .iter_mut()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(map) => Ok(DataObjMut::new(map, scope)),
            other => Err(expected(Reason::ExpectedObject, FieldPath::from(path).index(i), other)),
        })
        .collect()
}

fn expected(reason: Reason, path: FieldPath, found: &Value) -> StructureError {
    let wanted = match reason {
        Reason::ExpectedList => "list",
        _ => "object",
    };
    StructureError::new(
        reason,
        path,
        format!("expected {wanted}, found {}", value_kind(found)),
    )
}
