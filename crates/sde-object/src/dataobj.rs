//! # DataObj
//!
//! The owning structured value. A [`DataObj`] holds one mapping plus the
//! shared [`Model`] describing it, and exposes path operations, named
//! accessors, and explicit re-validation over that mapping.
//!
//! ## Lifecycle
//!
//! - [`DataObj::from_raw`] validates immediately. The result is either a
//!   fully coerced record or a `StructureError`; there is no half-built state.
//! - [`DataObj::new`] starts empty for incremental build-up. Nothing is
//!   checked until the caller invokes [`DataObj::validate`].
//! - `get`, `set`, and `delete` never trigger validation.

use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::Value;

use sde_core::{value_kind, CoercionId, DotPath, FieldPath, RawMap, Reason, StructureError};
use sde_schema::{construct_object, Schema};

use crate::accessor::{Accessor, Wrap};
use crate::error::DataObjError;
use crate::model::Model;
use crate::ops;
use crate::view::{wrap_value, wrap_value_mut, DataObjMut, DataObjRef, Property, PropertyMut, Scope};

/// An owned mapping plus the model it is read and written through.
#[derive(Debug, Clone)]
pub struct DataObj {
    data: RawMap,
    model: Arc<Model>,
}

impl DataObj {
    /// An empty record in build-up mode.
    pub fn new(model: Arc<Model>) -> Self {
        Self {
            data: RawMap::new(),
            model,
        }
    }

    /// Wrap `raw`, validating it against the model's schema if it has one.
    ///
    /// # Errors
    ///
    /// `expected_object` if `raw` is not a mapping, otherwise whatever the
    /// construct pass reports.
    pub fn from_raw(raw: Value, model: Arc<Model>) -> Result<Self, DataObjError> {
        let data = match raw {
            Value::Object(map) => map,
            other => {
                return Err(StructureError::new(
                    Reason::ExpectedObject,
                    FieldPath::root(),
                    format!("expected object, found {}", value_kind(&other)),
                )
                .into())
            }
        };
        let mut obj = Self { data, model };
        obj.validate()?;
        Ok(obj)
    }

    /// A record with no schema and no accessors.
    pub fn bare() -> Self {
        Self::new(Arc::new(Model::schemaless()))
    }

    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.model.schema()
    }

    /// Read-only view over the whole record.
    pub fn as_view(&self) -> DataObjRef<'_> {
        DataObjRef::new(
            &self.data,
            Scope {
                schema: self.model.schema(),
                coercions: self.model.coercions(),
            },
        )
    }

    /// Mutable view over the whole record.
    pub fn as_view_mut(&mut self) -> DataObjMut<'_> {
        DataObjMut::new(
            &mut self.data,
            Scope {
                schema: self.model.schema(),
                coercions: self.model.coercions(),
            },
        )
    }

    /// Value at a dot-path. Missing is `None`, never an error.
    pub fn get(&self, path: impl Into<DotPath>) -> Option<&Value> {
        ops::get(&self.data, &path.into())
    }

    pub fn get_mut(&mut self, path: impl Into<DotPath>) -> Option<&mut Value> {
        ops::get_mut(&mut self.data, &path.into())
    }

    /// Set the value at a dot-path, creating intermediate mappings.
    /// Returns the previous value.
    pub fn set(&mut self, path: impl Into<DotPath>, value: impl Into<Value>) -> Option<Value> {
        ops::set(&mut self.data, &path.into(), value.into())
    }

    /// Remove the value at a dot-path, pruning ancestors it leaves empty.
    pub fn delete(&mut self, path: impl Into<DotPath>) -> Option<Value> {
        ops::delete(&mut self.data, &path.into())
    }

    pub fn contains(&self, path: impl Into<DotPath>) -> bool {
        self.get(path).is_some()
    }

    /// Value under a single top-level key.
    pub fn get_field(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    /// Set a single top-level key, applying the schema's coercion for it.
    pub fn set_field(&mut self, name: &str, value: impl Into<Value>) -> Result<(), DataObjError> {
        self.as_view_mut().set_field(name, value)
    }

    /// Set a dot-path after applying the coercion registered as `coerce`.
    pub fn set_coerced(
        &mut self,
        path: impl Into<DotPath>,
        value: impl Into<Value>,
        coerce: &CoercionId,
    ) -> Result<(), DataObjError> {
        self.as_view_mut().set_coerced(path, value, coerce)
    }

    /// Append to the list at a dot-path.
    pub fn add_to_list(&mut self, path: impl Into<DotPath>, value: impl Into<Value>) {
        ops::append(&mut self.data, &path.into(), value.into());
    }

    /// Resolve a named accessor. `Ok(None)` means nothing is stored there.
    ///
    /// # Errors
    ///
    /// `UnknownAccessor` for an unbound name; a `StructureError` when a
    /// wrapping accessor finds a value it cannot wrap.
    pub fn property(&self, name: &str) -> Result<Option<Property<'_>>, DataObjError> {
        let accessor = self.accessor(name)?;
        let Some(value) = ops::get(&self.data, &accessor.path) else {
            return Ok(None);
        };
        match accessor.wrap {
            Wrap::Raw => Ok(Some(Property::Raw(value))),
            Wrap::DataObj => {
                let scope = Scope {
                    schema: self.model.schema().and_then(|s| s.resolve(&accessor.path)),
                    coercions: self.model.coercions(),
                };
                Ok(Some(wrap_value(value, scope, &accessor.path)?))
            }
        }
    }

    /// Mutable counterpart of [`property`](Self::property).
    pub fn property_mut(&mut self, name: &str) -> Result<Option<PropertyMut<'_>>, DataObjError> {
        let accessor = self
            .model
            .accessors()
            .get(name)
            .ok_or_else(|| DataObjError::UnknownAccessor(name.to_string()))?;
        let Some(value) = ops::get_mut(&mut self.data, &accessor.path) else {
            return Ok(None);
        };
        match accessor.wrap {
            Wrap::Raw => Ok(Some(PropertyMut::Raw(value))),
            Wrap::DataObj => {
                let scope = Scope {
                    schema: self.model.schema().and_then(|s| s.resolve(&accessor.path)),
                    coercions: self.model.coercions(),
                };
                Ok(Some(wrap_value_mut(value, scope, &accessor.path)?))
            }
        }
    }

    /// Store `value` at the path a named accessor is bound to.
    pub fn set_property(&mut self, name: &str, value: impl Into<Value>) -> Result<Option<Value>, DataObjError> {
        let path = self.accessor(name)?.path.clone();
        Ok(self.set(path, value))
    }

    fn accessor(&self, name: &str) -> Result<&Accessor, DataObjError> {
        self.model
            .accessors()
            .get(name)
            .ok_or_else(|| DataObjError::UnknownAccessor(name.to_string()))
    }

    /// Run the construct pass over the current data. On success the data is
    /// replaced by the coerced result; on failure it is left untouched.
    pub fn validate(&mut self) -> Result<(), StructureError> {
        if let Some(schema) = self.model.schema() {
            let constructed =
                construct_object(&self.data, schema, self.model.coercions(), &FieldPath::root())?;
            self.data = constructed;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &RawMap {
        &self.data
    }

    pub fn into_data(self) -> RawMap {
        self.data
    }

    pub fn to_json(&self) -> Result<String, DataObjError> {
        Ok(serde_json::to_string(&self.data)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, DataObjError> {
        Ok(serde_json::to_string_pretty(&self.data)?)
    }
}

impl Default for DataObj {
    fn default() -> Self {
        Self::bare()
    }
}

impl Serialize for DataObj {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.data.serialize(serializer)
    }
}

impl From<DataObj> for Value {
    fn from(obj: DataObj) -> Self {
        Value::Object(obj.data)
    }
}
