//! Error types for settings type registration.

use thiserror::Error;

/// Structured registration-time errors for settings types.
///
/// A settings type is validated exactly once, when its metadata is first
/// built. All problems found during that build are aggregated into a single
/// error value so the full list surfaces together, the first time an instance
/// of the type is constructed.
#[non_exhaustive]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// The type's schema table has one or more invalid field declarations
    #[error("settings type `{type_name}` has invalid fields: {}", .problems.join("; "))]
    InvalidSettingsType {
        type_name: &'static str,
        problems: Vec<String>,
    },
}

impl SchemaError {
    /// The individual field problems collected during the metadata build.
    pub fn problems(&self) -> &[String] {
        match self {
            SchemaError::InvalidSettingsType { problems, .. } => problems,
        }
    }
}

impl From<SchemaError> for crate::Error {
    fn from(err: SchemaError) -> Self {
        crate::Error::Schema(err)
    }
}
