//! Error types for scalar codec operations.
//!
//! This module defines structured error types for the conversions the scalar
//! codec performs: JSON token decoding, default-literal coercion, and range
//! checks on narrowing numeric conversions.

use thiserror::Error;

/// Structured error types for scalar conversions.
///
/// These surface in two places: wrapped into a registration-time
/// configuration error when a declared default literal cannot be coerced,
/// and wrapped into a per-call conversion error when a JSON token does not
/// match the field's native type.
#[non_exhaustive]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScalarError {
    /// A JSON token's runtime shape does not match the expected scalar type
    #[error("expected {expected}, found JSON {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: String,
    },

    /// A default literal cannot be coerced into the field's native type
    #[error("cannot coerce default {literal} into {target}: {reason}")]
    InvalidLiteral {
        target: &'static str,
        literal: String,
        reason: String,
    },

    /// A null default was declared for a non-nullable scalar
    #[error("null default declared for non-nullable {target}")]
    NullDefault { target: &'static str },

    /// A numeric value does not fit the target type
    #[error("value {value} is out of range for {target}")]
    OutOfRange {
        target: &'static str,
        value: String,
    },

    /// Text that fails the target type's parse (date, duration, URI, ...)
    #[error("invalid {target} text `{value}`: {reason}")]
    ParseFailed {
        target: &'static str,
        value: String,
        reason: String,
    },
}

impl ScalarError {
    /// Check if this error is a JSON token shape mismatch.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, ScalarError::TypeMismatch { .. })
    }

    /// Check if this error comes from default-literal coercion.
    pub fn is_literal_error(&self) -> bool {
        matches!(
            self,
            ScalarError::InvalidLiteral { .. } | ScalarError::NullDefault { .. }
        )
    }
}
