//! # Path Operations
//!
//! Get, set, append, and delete over nested mappings, addressed by
//! [`DotPath`]. These are the primitives every wrapper and view delegates to.
//!
//! ## Resolution Policy
//!
//! - `get` treats a missing segment, or a non-mapping where a mapping is
//!   needed, as absence. It never fails.
//! - `set` and `append` create missing intermediate mappings. A non-mapping
//!   found at an intermediate segment is replaced by a fresh mapping: the
//!   newly set path wins.
//! - `delete` removes the leaf, then removes every ancestor mapping the
//!   removal left empty, stopping at the first non-empty one. The root
//!   mapping itself is never removed.

use serde_json::Value;

use sde_core::{value_kind, DotPath, RawMap};

/// The value at `path`, if every segment resolves.
pub fn get<'a>(root: &'a RawMap, path: &DotPath) -> Option<&'a Value> {
    let (parents, leaf) = path.split_leaf();
    let mut current = root;
    for segment in parents {
        current = current.get(segment)?.as_object()?;
    }
    current.get(leaf)
}

/// Mutable access to the value at `path`, if every segment resolves.
pub fn get_mut<'a>(root: &'a mut RawMap, path: &DotPath) -> Option<&'a mut Value> {
    let (parents, leaf) = path.split_leaf();
    let mut current = root;
    for segment in parents {
        current = current.get_mut(segment)?.as_object_mut()?;
    }
    current.get_mut(leaf)
}

/// Set the value at `path`, creating intermediate mappings as needed.
/// Returns the value previously at `path`, if any.
pub fn set(root: &mut RawMap, path: &DotPath, value: Value) -> Option<Value> {
    let (parents, leaf) = path.split_leaf();
    let parent = ensure_parents(root, parents)?;
    parent.insert(leaf.to_string(), value)
}

/// Append `value` to the list at `path`. An absent or non-list value at
/// `path` is replaced by a one-element list.
pub fn append(root: &mut RawMap, path: &DotPath, value: Value) {
    let (parents, leaf) = path.split_leaf();
    let Some(parent) = ensure_parents(root, parents) else {
        return;
    };
    match parent.get_mut(leaf) {
        Some(Value::Array(items)) => items.push(value),
        Some(other) => {
            tracing::trace!(path = %path, found = value_kind(other), "replacing non-list on append");
            *other = Value::Array(vec![value]);
        }
        None => {
            parent.insert(leaf.to_string(), Value::Array(vec![value]));
        }
    }
}

/// Remove the value at `path` and prune ancestors left empty.
/// Returns the removed value, or `None` if nothing was at `path`.
pub fn delete(root: &mut RawMap, path: &DotPath) -> Option<Value> {
    delete_in(root, path.segments())
}

fn delete_in(map: &mut RawMap, segments: &[String]) -> Option<Value> {
    match segments {
        [] => None,
        [leaf] => map.shift_remove(leaf),
        [head, rest @ ..] => {
            let child = map.get_mut(head)?.as_object_mut()?;
            let removed = delete_in(child, rest)?;
            if child.is_empty() {
                tracing::trace!(segment = %head, "pruning empty mapping");
                map.shift_remove(head);
            }
            Some(removed)
        }
    }
}

/// Walk `parents` from `root`, creating or replacing mappings so that every
/// segment resolves, and return the innermost mapping.
fn ensure_parents<'a>(root: &'a mut RawMap, parents: &[String]) -> Option<&'a mut RawMap> {
    let mut current = root;
    for segment in parents {
        let slot = current
            .entry(segment.as_str())
            .or_insert_with(|| Value::Object(RawMap::new()));
        if !slot.is_object() {
            tracing::trace!(
                segment = %segment,
                found = value_kind(slot),
                "replacing non-mapping on set path"
            );
            *slot = Value::Object(RawMap::new());
        }
        current = slot.as_object_mut()?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> RawMap {
        match value {
            Value::Object(map) => map,
            other => panic!("fixture must be an object, got {other}"),
        }
    }

    fn p(path: &str) -> DotPath {
        DotPath::parse(path)
    }

    #[test]
    fn test_get_nested() {
        let data = map(json!({"one": {"two": {"three": 3}}}));
        assert_eq!(get(&data, &p("one.two.three")), Some(&json!(3)));
        assert_eq!(get(&data, &p("one.two")), Some(&json!({"three": 3})));
    }

    #[test]
    fn test_get_missing_is_none() {
        let data = map(json!({"one": {"two": "leaf"}}));
        assert_eq!(get(&data, &p("nope")), None);
        assert_eq!(get(&data, &p("one.nope")), None);
        assert_eq!(get(&data, &p("one.two.three")), None);
        assert_eq!(get(&RawMap::new(), &p("")), None);
    }

    #[test]
    fn test_set_builds_intermediates() {
        let mut data = RawMap::new();
        set(&mut data, &p("one.two"), json!("value"));
        set(&mut data, &p("one.three.four.five"), json!("value"));
        assert_eq!(
            Value::Object(data),
            json!({"one": {"two": "value", "three": {"four": {"five": "value"}}}})
        );
    }

    #[test]
    fn test_set_returns_previous() {
        let mut data = map(json!({"a": 1}));
        assert_eq!(set(&mut data, &p("a"), json!(2)), Some(json!(1)));
        assert_eq!(set(&mut data, &p("b"), json!(3)), None);
    }

    #[test]
    fn test_set_replaces_blocking_scalar() {
        let mut data = map(json!({"one": "scalar"}));
        set(&mut data, &p("one.two"), json!(2));
        assert_eq!(Value::Object(data), json!({"one": {"two": 2}}));
    }

    #[test]
    fn test_set_replaces_blocking_list() {
        let mut data = map(json!({"one": [1, 2]}));
        set(&mut data, &p("one.two"), json!(2));
        assert_eq!(Value::Object(data), json!({"one": {"two": 2}}));
    }

    #[test]
    fn test_delete_with_prune() {
        let mut data = RawMap::new();
        set(&mut data, &p("one.two"), json!("value"));
        set(&mut data, &p("one.three.four.five"), json!("value"));
        let removed = delete(&mut data, &p("one.three.four.five"));
        assert_eq!(removed, Some(json!("value")));
        assert_eq!(Value::Object(data), json!({"one": {"two": "value"}}));
    }

    #[test]
    fn test_delete_prunes_to_root() {
        let mut data = map(json!({"a": {"b": {"c": 1}}}));
        delete(&mut data, &p("a.b.c"));
        assert!(data.is_empty());
    }

    #[test]
    fn test_delete_stops_at_first_non_empty() {
        let mut data = map(json!({"a": {"keep": 1, "b": {"c": {"d": 1}}}}));
        delete(&mut data, &p("a.b.c.d"));
        assert_eq!(Value::Object(data), json!({"a": {"keep": 1}}));
    }

    #[test]
    fn test_delete_missing_changes_nothing() {
        let mut data = map(json!({"a": {}, "b": {"c": 1}}));
        assert_eq!(delete(&mut data, &p("b.x")), None);
        assert_eq!(delete(&mut data, &p("a.x.y")), None);
        // an already-empty mapping not on a successful delete path is left alone
        assert_eq!(Value::Object(data), json!({"a": {}, "b": {"c": 1}}));
    }

    #[test]
    fn test_delete_leaf_mapping_entirely() {
        let mut data = map(json!({"a": {"b": {"c": 1}}, "z": 0}));
        assert_eq!(delete(&mut data, &p("a.b")), Some(json!({"c": 1})));
        assert_eq!(Value::Object(data), json!({"z": 0}));
    }

    #[test]
    fn test_delete_keeps_sibling_order() {
        let mut data = map(json!({"x": 1, "y": 2, "z": 3}));
        delete(&mut data, &p("x"));
        let keys: Vec<&str> = data.keys().map(String::as_str).collect();
        assert_eq!(keys, ["y", "z"]);
    }

    #[test]
    fn test_append() {
        let mut data = RawMap::new();
        append(&mut data, &p("tags"), json!("a"));
        append(&mut data, &p("tags"), json!("b"));
        append(&mut data, &p("deep.list"), json!(1));
        assert_eq!(
            Value::Object(data.clone()),
            json!({"tags": ["a", "b"], "deep": {"list": [1]}})
        );
        set(&mut data, &p("scalar"), json!("x"));
        append(&mut data, &p("scalar"), json!("y"));
        assert_eq!(get(&data, &p("scalar")), Some(&json!(["y"])));
    }

    #[test]
    fn test_get_mut() {
        let mut data = map(json!({"a": {"b": 1}}));
        if let Some(v) = get_mut(&mut data, &p("a.b")) {
            *v = json!(2);
        }
        assert_eq!(get(&data, &p("a.b")), Some(&json!(2)));
        assert!(get_mut(&mut data, &p("a.c")).is_none());
    }
}
