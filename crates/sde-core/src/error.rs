//! # Error Types — Structural Violations
//!
//! Defines the errors produced while validating and coercing raw data.
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - A single structural error kind, [`StructureError`], always carries the
//!   path of the violation and a [`Reason`] code.
//! - Coercion functions report [`CoercionError`]; the validator lifts it into
//!   a `StructureError` with [`Reason::CoercionFailed`] and the current path.

use std::fmt;

use thiserror::Error;

use crate::path::FieldPath;

/// Machine-distinguishable reason for a structural violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reason {
    /// A key is present that the schema does not declare at this level.
    DisallowedField,
    /// A name listed as required is absent.
    MissingRequired,
    /// A coercion function rejected a value, or was not registered.
    CoercionFailed,
    /// A declared object (or object list element) is not a mapping.
    ExpectedObject,
    /// A declared list is not a sequence.
    ExpectedList,
    /// A list declares a `contains` directive the engine does not know.
    BadListContainsDirective,
    /// A schema definition declares one name as more than one kind.
    ConflictingDeclaration,
}

impl Reason {
    /// The snake_case code for this reason.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DisallowedField => "disallowed_field",
            Self::MissingRequired => "missing_required",
            Self::CoercionFailed => "coercion_failed",
            Self::ExpectedObject => "expected_object",
            Self::ExpectedList => "expected_list",
            Self::BadListContainsDirective => "bad_list_contains_directive",
            Self::ConflictingDeclaration => "conflicting_declaration",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A structural violation found while validating a raw value.
///
/// Validation aborts on the first violation, so one error describes the
/// whole failure.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{reason} at {path}: {detail}")]
pub struct StructureError {
    path: FieldPath,
    reason: Reason,
    detail: String,
}

impl StructureError {
    /// Create a structural error at `path`.
    pub fn new(reason: Reason, path: FieldPath, detail: impl Into<String>) -> Self {
        Self {
            path,
            reason,
            detail: detail.into(),
        }
    }

    /// Lift a coercion failure into a structural error at `path`.
    pub fn coercion(path: FieldPath, source: &CoercionError) -> Self {
        Self::new(Reason::CoercionFailed, path, source.to_string())
    }

    /// The reason code.
    pub fn reason(&self) -> Reason {
        self.reason
    }

    /// The location of the violation in the raw value.
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Human-readable explanation.
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

/// Error produced by a coercion function.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoercionError {
    /// The value's JSON type cannot be converted to the target type at all.
    #[error("cannot coerce {found} to {target}")]
    UnsupportedType {
        /// Name of the target semantic type.
        target: &'static str,
        /// JSON kind of the offending value.
        found: &'static str,
    },

    /// The value has a convertible type but its content does not parse.
    #[error("cannot parse {input:?} as {target}: {reason}")]
    Unparseable {
        /// Name of the target semantic type.
        target: &'static str,
        /// The offending input rendered as text.
        input: String,
        /// Why the parse failed.
        reason: String,
    },

    /// A schema referenced a coercion id the registry does not hold.
    #[error("no coercion registered under '{0}'")]
    Unregistered(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_codes() {
        assert_eq!(Reason::DisallowedField.code(), "disallowed_field");
        assert_eq!(Reason::MissingRequired.code(), "missing_required");
        assert_eq!(Reason::CoercionFailed.code(), "coercion_failed");
        assert_eq!(Reason::ExpectedObject.code(), "expected_object");
        assert_eq!(Reason::ExpectedList.code(), "expected_list");
        assert_eq!(
            Reason::BadListContainsDirective.code(),
            "bad_list_contains_directive"
        );
        assert_eq!(Reason::ConflictingDeclaration.to_string(), "conflicting_declaration");
    }

    #[test]
    fn test_structure_error_display() {
        let path = FieldPath::root().key("nine").index(0).key("beta");
        let err = StructureError::new(Reason::CoercionFailed, path, "not a number");
        let display = err.to_string();
        assert_eq!(display, "coercion_failed at nine[0].beta: not a number");
    }

    #[test]
    fn test_structure_error_at_root() {
        let err = StructureError::new(Reason::ExpectedObject, FieldPath::root(), "got string");
        assert!(err.to_string().contains("(root)"));
        assert!(err.path().is_root());
    }

    #[test]
    fn test_coercion_lift_keeps_message() {
        let source = CoercionError::UnsupportedType {
            target: "integer",
            found: "array",
        };
        let err = StructureError::coercion(FieldPath::root().key("seven"), &source);
        assert_eq!(err.reason(), Reason::CoercionFailed);
        assert!(err.detail().contains("cannot coerce array to integer"));
    }
}
