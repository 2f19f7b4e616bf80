//! # Coercion Library
//!
//! A coercion turns one loosely-typed scalar into the semantic type a schema
//! declares for it, or fails with a [`CoercionError`]. Schemas refer to
//! coercions by [`CoercionId`]; callers hand the validator a
//! [`CoercionRegistry`] that resolves ids to functions.
//!
//! ## Idempotence
//!
//! Every coercion in this module accepts its own output and returns it
//! unchanged. Re-validating an already validated value therefore yields the
//! same value.
//!
//! ## Conventional ids
//!
//! [`CoercionRegistry::with_defaults`] registers:
//!
//! | id            | function              |
//! |---------------|-----------------------|
//! | `unicode`     | [`to_unicode`]        |
//! | `integer`     | [`to_int`]            |
//! | `float`       | [`to_float`]          |
//! | `bool`        | [`to_bool`]           |
//! | `utcdatetime` | [`to_utc_datetime`]   |
//! | `url`         | [`to_url`]            |

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::CoercionError;
use crate::temporal::UtcTimestamp;

/// A shareable coercion function.
pub type CoerceFn = Arc<dyn Fn(&Value) -> Result<Value, CoercionError> + Send + Sync>;

/// Name under which a coercion is registered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoercionId(String);

impl CoercionId {
    pub const UNICODE: &'static str = "unicode";
    pub const INTEGER: &'static str = "integer";
    pub const FLOAT: &'static str = "float";
    pub const BOOL: &'static str = "bool";
    pub const UTC_DATETIME: &'static str = "utcdatetime";
    pub const URL: &'static str = "url";

    /// Create an id from any string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CoercionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CoercionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for CoercionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mapping from coercion id to coercion function.
///
/// Cloning is cheap: functions are reference counted.
#[derive(Clone, Default)]
pub struct CoercionRegistry {
    coercions: HashMap<CoercionId, CoerceFn>,
}

impl CoercionRegistry {
    /// An empty registry. Every lookup fails until something is registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the library coercions under their conventional ids.
    pub fn with_defaults() -> Self {
        Self::new()
            .with(CoercionId::UNICODE, to_unicode)
            .with(CoercionId::INTEGER, to_int)
            .with(CoercionId::FLOAT, to_float)
            .with(CoercionId::BOOL, to_bool)
            .with(CoercionId::UTC_DATETIME, to_utc_datetime)
            .with(CoercionId::URL, to_url)
    }

    /// Register `f` under `id`, returning the function it replaced, if any.
    pub fn register<F>(&mut self, id: impl Into<CoercionId>, f: F) -> Option<CoerceFn>
    where
        F: Fn(&Value) -> Result<Value, CoercionError> + Send + Sync + 'static,
    {
        self.coercions.insert(id.into(), Arc::new(f))
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<F>(mut self, id: impl Into<CoercionId>, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, CoercionError> + Send + Sync + 'static,
    {
        self.register(id, f);
        self
    }

    /// Look up a coercion.
    pub fn get(&self, id: &CoercionId) -> Option<&CoerceFn> {
        self.coercions.get(id)
    }

    /// Returns true if `id` is registered.
    pub fn contains(&self, id: &CoercionId) -> bool {
        self.coercions.contains_key(id)
    }

    /// Apply the coercion registered under `id` to `value`.
    ///
    /// # Errors
    ///
    /// Returns `CoercionError::Unregistered` for an unknown id, or whatever
    /// the coercion itself reports.
    pub fn apply(&self, id: &CoercionId, value: &Value) -> Result<Value, CoercionError> {
        let f = self
            .get(id)
            .ok_or_else(|| CoercionError::Unregistered(id.to_string()))?;
        f(value)
    }

    /// Registered ids, sorted alphabetically.
    pub fn ids(&self) -> Vec<&CoercionId> {
        let mut ids: Vec<&CoercionId> = self.coercions.keys().collect();
        ids.sort();
        ids
    }

    /// Number of registered coercions.
    pub fn len(&self) -> usize {
        self.coercions.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.coercions.is_empty()
    }
}

impl fmt::Debug for CoercionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoercionRegistry")
            .field("ids", &self.ids())
            .finish()
    }
}

/// Name of a value's JSON kind, for messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn unsupported(target: &'static str, value: &Value) -> CoercionError {
    CoercionError::UnsupportedType {
        target,
        found: value_kind(value),
    }
}

fn unparseable(target: &'static str, input: impl Into<String>, reason: impl Into<String>) -> CoercionError {
    CoercionError::Unparseable {
        target,
        input: input.into(),
        reason: reason.into(),
    }
}

/// Text coercion.
///
/// Strings pass through; numbers and booleans become their text form.
pub fn to_unicode(value: &Value) -> Result<Value, CoercionError> {
    match value {
        Value::String(_) => Ok(value.clone()),
        Value::Number(n) => Ok(Value::String(n.to_string())),
        Value::Bool(b) => Ok(Value::String(b.to_string())),
        other => Err(unsupported("unicode", other)),
    }
}

/// Integer coercion.
///
/// Accepts integers, floats (truncated toward zero), and decimal text.
/// Text is stripped of surrounding whitespace, non-ASCII characters (stray
/// currency marks) and thousands separators before parsing. Results must fit
/// in an i64 or a u64.
pub fn to_int(value: &Value) -> Result<Value, CoercionError> {
    const TARGET: &str = "integer";
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(value.clone()),
        Value::Number(n) => match n.as_f64() {
            Some(f) => float_to_int(f).ok_or_else(|| unparseable(TARGET, n.to_string(), "out of range")),
            None => Err(unparseable(TARGET, n.to_string(), "not representable")),
        },
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| c.is_ascii() && *c != ',')
                .collect();
            let cleaned = cleaned.trim();
            if let Ok(i) = cleaned.parse::<i64>() {
                return Ok(Value::Number(Number::from(i)));
            }
            if let Ok(u) = cleaned.parse::<u64>() {
                return Ok(Value::Number(Number::from(u)));
            }
            match cleaned.parse::<f64>() {
                Ok(f) => float_to_int(f).ok_or_else(|| unparseable(TARGET, s.as_str(), "out of range")),
                Err(e) => Err(unparseable(TARGET, s.as_str(), e.to_string())),
            }
        }
        other => Err(unsupported(TARGET, other)),
    }
}

fn float_to_int(f: f64) -> Option<Value> {
    if !f.is_finite() {
        return None;
    }
    // 2^63 and 2^64 are exact in f64; both bounds are exclusive.
    const I64_END: f64 = 9_223_372_036_854_775_808.0;
    const U64_END: f64 = 18_446_744_073_709_551_616.0;
    let truncated = f.trunc();
    if (-I64_END..I64_END).contains(&truncated) {
        Some(Value::Number(Number::from(truncated as i64)))
    } else if (I64_END..U64_END).contains(&truncated) {
        Some(Value::Number(Number::from(truncated as u64)))
    } else {
        None
    }
}

/// Floating point coercion. Non-finite results are rejected.
pub fn to_float(value: &Value) -> Result<Value, CoercionError> {
    const TARGET: &str = "float";
    let f = match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| unparseable(TARGET, n.to_string(), "not representable"))?,
        Value::String(s) => {
            let cleaned: String = s.chars().filter(|c| *c != ',').collect();
            cleaned
                .trim()
                .parse::<f64>()
                .map_err(|e| unparseable(TARGET, s.as_str(), e.to_string()))?
        }
        other => return Err(unsupported(TARGET, other)),
    };
    Number::from_f64(f)
        .map(Value::Number)
        .ok_or_else(|| unparseable(TARGET, f.to_string(), "not finite"))
}

/// Boolean coercion.
///
/// Accepts booleans, the integers 0 and 1, and the case-insensitive words
/// `true`/`false`, `yes`/`no`, `t`/`f`, `y`/`n`, `1`/`0`.
pub fn to_bool(value: &Value) -> Result<Value, CoercionError> {
    const TARGET: &str = "bool";
    match value {
        Value::Bool(_) => Ok(value.clone()),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Ok(Value::Bool(false)),
            Some(1) => Ok(Value::Bool(true)),
            _ => Err(unparseable(TARGET, n.to_string(), "only 0 and 1 are boolean")),
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "t" | "y" | "1" => Ok(Value::Bool(true)),
            "false" | "no" | "f" | "n" | "0" => Ok(Value::Bool(false)),
            _ => Err(unparseable(TARGET, s.as_str(), "not a recognised boolean word")),
        },
        other => Err(unsupported(TARGET, other)),
    }
}

/// Timestamp coercion to `YYYY-MM-DDTHH:MM:SSZ`. See [`UtcTimestamp::parse`].
pub fn to_utc_datetime(value: &Value) -> Result<Value, CoercionError> {
    match value {
        Value::String(s) => Ok(Value::String(UtcTimestamp::parse(s)?.to_iso8601())),
        other => Err(unsupported("utcdatetime", other)),
    }
}

/// URL coercion. Accepts absolute `http`/`https` URLs with a host and returns
/// the trimmed text.
pub fn to_url(value: &Value) -> Result<Value, CoercionError> {
    const TARGET: &str = "url";
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            let parsed =
                url::Url::parse(trimmed).map_err(|e| unparseable(TARGET, s.as_str(), e.to_string()))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(unparseable(TARGET, s.as_str(), "scheme must be http or https"));
            }
            if parsed.host_str().map_or(true, str::is_empty) {
                return Err(unparseable(TARGET, s.as_str(), "missing host"));
            }
            Ok(Value::String(trimmed.to_string()))
        }
        other => Err(unsupported(TARGET, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unicode_passthrough_and_stringify() {
        assert_eq!(to_unicode(&json!("hello")).unwrap(), json!("hello"));
        assert_eq!(to_unicode(&json!(42)).unwrap(), json!("42"));
        assert_eq!(to_unicode(&json!(true)).unwrap(), json!("true"));
    }

    #[test]
    fn test_unicode_rejects_containers_and_null() {
        assert!(to_unicode(&json!(null)).is_err());
        assert!(to_unicode(&json!([1])).is_err());
        assert!(matches!(
            to_unicode(&json!({"a": 1})),
            Err(CoercionError::UnsupportedType { target: "unicode", found: "object" })
        ));
    }

    #[test]
    fn test_int_from_text() {
        assert_eq!(to_int(&json!("4")).unwrap(), json!(4));
        assert_eq!(to_int(&json!(" 12 ")).unwrap(), json!(12));
        assert_eq!(to_int(&json!("-7")).unwrap(), json!(-7));
        assert_eq!(to_int(&json!("1,000")).unwrap(), json!(1000));
        assert_eq!(to_int(&json!("\u{00a3}250")).unwrap(), json!(250));
        assert_eq!(to_int(&json!("4.0")).unwrap(), json!(4));
        assert_eq!(to_int(&json!("4.7")).unwrap(), json!(4));
    }

    #[test]
    fn test_int_from_numbers() {
        assert_eq!(to_int(&json!(9)).unwrap(), json!(9));
        assert_eq!(to_int(&json!(9.0)).unwrap(), json!(9));
        assert_eq!(to_int(&json!(u64::MAX)).unwrap(), json!(u64::MAX));
        assert_eq!(to_int(&json!(4.7)).unwrap(), json!(4));
        assert_eq!(to_int(&json!(-4.7)).unwrap(), json!(-4));
    }

    #[test]
    fn test_int_from_floats_at_range_edges() {
        assert_eq!(to_int(&json!(-9223372036854775808.0)).unwrap(), json!(i64::MIN));
        assert_eq!(
            to_int(&json!(9223372036854775808.0)).unwrap(),
            json!(9_223_372_036_854_775_808_u64)
        );
        assert_eq!(
            to_int(&json!("9223372036854775808.5")).unwrap(),
            json!(9_223_372_036_854_775_808_u64)
        );
        // floats and text agree across the u64 range
        assert_eq!(to_int(&json!(1.0e19)).unwrap(), json!(10_000_000_000_000_000_000_u64));
        assert_eq!(to_int(&json!("10000000000000000000")).unwrap(), json!(10_000_000_000_000_000_000_u64));

        for out_of_range in [json!(1.9e19), json!(-9.3e18), json!("1.9e19")] {
            let err = to_int(&out_of_range).unwrap_err();
            assert!(matches!(err, CoercionError::Unparseable { target: "integer", .. }), "{out_of_range}");
        }
    }

    #[test]
    fn test_int_rejects_words() {
        for word in ["a", "b", "walton-upon-thames", ""] {
            let err = to_int(&json!(word)).unwrap_err();
            assert!(matches!(err, CoercionError::Unparseable { target: "integer", .. }));
        }
        assert!(to_int(&json!(true)).is_err());
        assert!(to_int(&json!(null)).is_err());
    }

    #[test]
    fn test_float() {
        assert_eq!(to_float(&json!("2.5")).unwrap(), json!(2.5));
        assert_eq!(to_float(&json!(3)).unwrap(), json!(3.0));
        assert!(to_float(&json!("NaN")).is_err());
        assert!(to_float(&json!("inf")).is_err());
        assert!(to_float(&json!("abc")).is_err());
    }

    #[test]
    fn test_bool() {
        assert_eq!(to_bool(&json!("Yes")).unwrap(), json!(true));
        assert_eq!(to_bool(&json!("false")).unwrap(), json!(false));
        assert_eq!(to_bool(&json!(1)).unwrap(), json!(true));
        assert_eq!(to_bool(&json!(0)).unwrap(), json!(false));
        assert!(to_bool(&json!(2)).is_err());
        assert!(to_bool(&json!("maybe")).is_err());
    }

    #[test]
    fn test_utc_datetime() {
        assert_eq!(
            to_utc_datetime(&json!("2026-01-15T17:00:00+05:00")).unwrap(),
            json!("2026-01-15T12:00:00Z")
        );
        assert_eq!(to_utc_datetime(&json!("2026-01-15")).unwrap(), json!("2026-01-15T00:00:00Z"));
        assert!(to_utc_datetime(&json!(20260115)).is_err());
    }

    #[test]
    fn test_url() {
        assert_eq!(
            to_url(&json!(" https://example.org/path ")).unwrap(),
            json!("https://example.org/path")
        );
        assert!(to_url(&json!("ftp://example.org")).is_err());
        assert!(to_url(&json!("not a url")).is_err());
        assert!(to_url(&json!(5)).is_err());
    }

    #[test]
    fn test_library_coercions_are_idempotent() {
        let cases: Vec<(fn(&Value) -> Result<Value, CoercionError>, Value)> = vec![
            (to_unicode, json!(17)),
            (to_int, json!("1,234.9")),
            (to_float, json!("7")),
            (to_bool, json!("no")),
            (to_utc_datetime, json!("2026-02-03T04:05:06.789-01:00")),
            (to_url, json!("http://example.com ")),
        ];
        for (f, input) in cases {
            let once = f(&input).unwrap();
            let twice = f(&once).unwrap();
            assert_eq!(once, twice, "not idempotent for {input}");
        }
    }

    #[test]
    fn test_registry_defaults() {
        let registry = CoercionRegistry::with_defaults();
        assert_eq!(registry.len(), 6);
        let ids: Vec<&str> = registry.ids().into_iter().map(CoercionId::as_str).collect();
        assert_eq!(ids, ["bool", "float", "integer", "unicode", "url", "utcdatetime"]);
        let out = registry.apply(&"integer".into(), &json!("4")).unwrap();
        assert_eq!(out, json!(4));
    }

    #[test]
    fn test_registry_unregistered() {
        let registry = CoercionRegistry::new();
        assert!(registry.is_empty());
        let err = registry.apply(&"unicode".into(), &json!("x")).unwrap_err();
        assert_eq!(err, CoercionError::Unregistered("unicode".to_string()));
    }

    #[test]
    fn test_registry_custom_coercion_replaces() {
        let mut registry = CoercionRegistry::with_defaults();
        let previous = registry.register("unicode", |v: &Value| match v {
            Value::String(s) => Ok(Value::String(s.to_uppercase())),
            other => Err(CoercionError::UnsupportedType {
                target: "shout",
                found: value_kind(other),
            }),
        });
        assert!(previous.is_some());
        let out = registry.apply(&"unicode".into(), &json!("quiet")).unwrap();
        assert_eq!(out, json!("QUIET"));
    }

    #[test]
    fn test_registry_debug_lists_ids() {
        let registry = CoercionRegistry::new().with("integer", to_int);
        assert_eq!(format!("{registry:?}"), r#"CoercionRegistry { ids: [CoercionId("integer")] }"#);
    }
}
