//! # Paths
//!
//! Two path types address locations in a raw value tree:
//!
//! - [`FieldPath`] locates a structural violation. It is built up by the
//!   validator as it descends and may contain sequence indices, rendered as
//!   `listy[0].three`.
//! - [`DotPath`] addresses a value for get/set/delete. It is parsed from a
//!   dot-separated string (`one.three.four`) and contains mapping keys only.
//!   A `DotPath` always has at least one segment.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A mapping key.
    Key(String),
    /// A sequence index.
    Index(usize),
}

/// Location of a value inside a raw value tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<Segment>);

impl FieldPath {
    /// The empty path, denoting the top-level value.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Extend this path with a mapping key.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.0.push(Segment::Key(key.into()));
        self
    }

    /// Extend this path with a sequence index.
    pub fn index(mut self, index: usize) -> Self {
        self.0.push(Segment::Index(index));
        self
    }

    /// A new path one key below this one.
    pub fn join_key(&self, key: impl Into<String>) -> Self {
        self.clone().key(key)
    }

    /// A new path one index below this one.
    pub fn join_index(&self, index: usize) -> Self {
        self.clone().index(index)
    }

    /// Returns true for the top-level path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The segments of this path, outermost first.
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(root)");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Key(key) if i == 0 => write!(f, "{key}")?,
                Segment::Key(key) => write!(f, ".{key}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl From<&DotPath> for FieldPath {
    fn from(path: &DotPath) -> Self {
        Self(path.segments().iter().cloned().map(Segment::Key).collect())
    }
}

/// A dot-separated address into nested mappings.
///
/// Parsing never fails: every `.` separates two segments, so `"a..b"` has an
/// empty middle key and `""` is the single empty key. This mirrors how the
/// paths are written by callers and keeps get/set/delete error-free.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DotPath(Vec<String>);

impl DotPath {
    /// Parse a dot-separated path.
    pub fn parse(path: &str) -> Self {
        Self(path.split('.').map(str::to_string).collect())
    }

    /// Build a path from explicit segments. Returns `None` for no segments.
    pub fn from_segments(segments: Vec<String>) -> Option<Self> {
        if segments.is_empty() {
            None
        } else {
            Some(Self(segments))
        }
    }

    /// A path with exactly one segment, taken literally (dots included).
    pub fn single(key: impl Into<String>) -> Self {
        Self(vec![key.into()])
    }

    /// The key segments, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments (always at least one).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The intermediate segments and the leaf key.
    pub fn split_leaf(&self) -> (&[String], &str) {
        match self.0.split_last() {
            Some((leaf, parents)) => (parents, leaf.as_str()),
            None => (&[], ""),
        }
    }
}

impl FromStr for DotPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for DotPath {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for DotPath {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<&DotPath> for DotPath {
    fn from(path: &DotPath) -> Self {
        path.clone()
    }
}

impl fmt::Display for DotPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}
