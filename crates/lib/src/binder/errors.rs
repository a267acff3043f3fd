//! Error types for JSON binding operations.

use thiserror::Error;

use crate::scalar::ScalarError;

/// Structured per-call conversion errors raised while reading or updating a
/// JSON document against a settings type.
///
/// Missing keys, unknown keys, and foreign keys are *not* errors — tolerance
/// of those is part of the binding contract. These variants only cover tokens
/// whose runtime shape contradicts the field they are bound to.
#[non_exhaustive]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BindError {
    /// A JSON value's shape does not match the field's shape
    #[error("field `{field}` expects a JSON {expected}, found {actual}")]
    ShapeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// A scalar token failed to decode into the field's native type
    #[error("field `{field}`: {source}")]
    Scalar {
        field: String,
        source: ScalarError,
    },
}

impl BindError {
    /// The settings field the error is attached to.
    pub fn field(&self) -> &str {
        match self {
            BindError::ShapeMismatch { field, .. } | BindError::Scalar { field, .. } => field,
        }
    }
}

impl From<BindError> for crate::Error {
    fn from(err: BindError) -> Self {
        crate::Error::Bind(err)
    }
}
