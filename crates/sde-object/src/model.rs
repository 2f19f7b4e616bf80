//! # Record Models
//!
//! A [`Model`] is everything a [`DataObj`](crate::DataObj) needs besides its
//! data: the schema it conforms to, the accessor bindings it exposes, and the
//! coercions its schema refers to. Models are immutable and shared between
//! instances through an `Arc`.

use std::sync::Arc;

use sde_core::CoercionRegistry;
use sde_schema::Schema;

use crate::accessor::Accessors;

/// Schema, accessor bindings, and coercions for one record type.
#[derive(Debug, Clone)]
pub struct Model {
    schema: Option<Schema>,
    accessors: Accessors,
    coercions: CoercionRegistry,
}

impl Model {
    /// A model validated against `schema`, using the default coercions.
    pub fn new(schema: Schema) -> Self {
        Self {
            schema: Some(schema),
            accessors: Accessors::new(),
            coercions: CoercionRegistry::with_defaults(),
        }
    }

    /// A model with no schema. Any mapping is accepted as is.
    pub fn schemaless() -> Self {
        Self {
            schema: None,
            accessors: Accessors::new(),
            coercions: CoercionRegistry::with_defaults(),
        }
    }

    /// Replace the accessor bindings.
    pub fn with_accessors(mut self, accessors: Accessors) -> Self {
        self.accessors = accessors;
        self
    }

    /// Replace the coercion registry.
    pub fn with_coercions(mut self, coercions: CoercionRegistry) -> Self {
        self.coercions = coercions;
        self
    }

    /// Wrap in an `Arc` for sharing between instances.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    pub fn accessors(&self) -> &Accessors {
        &self.accessors
    }

    pub fn coercions(&self) -> &CoercionRegistry {
        &self.coercions
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::schemaless()
    }
}
