//! # Accessor Bindings
//!
//! A record type names the parts of its data it exposes: `the_name` reads
//! `name`, `wrap_obj` reads `objy` as a structured value, and so on. An
//! [`Accessors`] table holds those bindings as plain data, each a dot-path
//! plus a [`Wrap`] policy.

use std::collections::BTreeMap;

use sde_core::DotPath;

/// How an accessor hands back the value at its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wrap {
    /// The raw value, as stored.
    Raw,
    /// A structured view: a mapping becomes one view, a list of mappings
    /// becomes one view per element.
    DataObj,
}

/// One binding: where the value lives and how to return it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessor {
    /// Location of the value.
    pub path: DotPath,
    /// Return policy.
    pub wrap: Wrap,
}

/// Named accessor bindings for one record type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accessors {
    bindings: BTreeMap<String, Accessor>,
}

impl Accessors {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to the raw value at `path`.
    pub fn raw(self, name: impl Into<String>, path: impl Into<DotPath>) -> Self {
        self.with(name, path, Wrap::Raw)
    }

    /// Bind `name` to a structured view of the value at `path`.
    pub fn wrapped(self, name: impl Into<String>, path: impl Into<DotPath>) -> Self {
        self.with(name, path, Wrap::DataObj)
    }

    /// Bind `name` with an explicit policy.
    pub fn with(mut self, name: impl Into<String>, path: impl Into<DotPath>, wrap: Wrap) -> Self {
        self.bind(name, path, wrap);
        self
    }

    /// Add or replace a binding in place.
    pub fn bind(&mut self, name: impl Into<String>, path: impl Into<DotPath>, wrap: Wrap) {
        self.bindings.insert(
            name.into(),
            Accessor {
                path: path.into(),
                wrap,
            },
        );
    }

    /// The binding for `name`.
    pub fn get(&self, name: &str) -> Option<&Accessor> {
        self.bindings.get(name)
    }

    /// Bound names, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns true if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bindings() {
        let accessors = Accessors::new()
            .raw("the_name", "name")
            .wrapped("wrap_obj", "objy")
            .raw("deep", "a.b.c");
        assert_eq!(accessors.len(), 3);
        let deep = accessors.get("deep").unwrap();
        assert_eq!(deep.path.segments(), ["a", "b", "c"]);
        assert_eq!(deep.wrap, Wrap::Raw);
        assert_eq!(accessors.get("wrap_obj").unwrap().wrap, Wrap::DataObj);
        assert!(accessors.get("missing").is_none());
        assert_eq!(accessors.names().collect::<Vec<_>>(), ["deep", "the_name", "wrap_obj"]);
    }

    #[test]
    fn test_rebind_replaces() {
        let mut accessors = Accessors::new().raw("x", "one");
        accessors.bind("x", "two", Wrap::DataObj);
        assert_eq!(accessors.len(), 1);
        let x = accessors.get("x").unwrap();
        assert_eq!(x.path.to_string(), "two");
        assert_eq!(x.wrap, Wrap::DataObj);
    }
}
