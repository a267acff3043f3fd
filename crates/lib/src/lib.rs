//!
//! Settrix: strongly-typed settings with uniform defaults, comparison,
//! copying, and order-preserving JSON binding.
//!
//! ## Core Concepts
//!
//! Settrix is built around a small set of pieces:
//!
//! * **Settings types (`schema::Settings`)**: plain Rust structs that declare a per-type
//!   schema table describing every field, its JSON name, and its default value.
//! * **Field descriptors (`schema::FieldDescriptor`)**: one compiled accessor per field,
//!   classified into a closed set of shapes (scalar, nested settings, collection).
//! * **Type metadata (`registry::TypeMetadata`)**: the immutable, lazily built, per-type
//!   registry of field descriptors plus the aggregated validation outcome. Built at most
//!   once per type, safely under concurrent first access.
//! * **Operations (`ops`)**: reset to defaults, structural equivalence, deep assignment,
//!   and deep copy, all expressed as folds over a type's descriptors.
//! * **JSON binding (`binder`)**: tolerant reads (a partial merge that ignores unknown
//!   keys) and writes that preserve a hand-edited document's key order while appending
//!   missing fields deterministically.
//!
//! ## Usage
//!
//! ```
//! use settrix::{SettingsExt, settings_schema};
//!
//! #[derive(Debug, Default)]
//! struct AppSettings {
//!     name: String,
//!     level: i64,
//! }
//!
//! settings_schema! {
//!     AppSettings {
//!         scalar name as "Name" = "Joe",
//!         scalar level as "Level" = 5,
//!     }
//! }
//!
//! let mut settings = AppSettings::construct()?;
//! assert_eq!(settings.name, "Joe");
//! assert_eq!(settings.level, 5);
//!
//! let doc = serde_json::json!({ "Level": 9 });
//! settings.apply_json(doc.as_object().unwrap())?;
//! assert_eq!(settings.name, "Joe");
//! assert_eq!(settings.level, 9);
//! # Ok::<(), settrix::Error>(())
//! ```

pub mod binder;
pub mod file;
mod macros;
pub mod ops;
pub mod registry;
pub mod scalar;
pub mod schema;

/// Re-export the commonly used entry points for easier access.
pub use ops::SettingsExt;
pub use registry::metadata_for;
pub use scalar::{Literal, ScalarValue};
pub use schema::{FieldKind, Schema, Settings};

/// The JSON document model consumed and produced by the binder.
///
/// Re-exported so that the `settings_enum!` and `settings_schema!` macros (and
/// downstream code) can name `serde_json` types without a separate dependency.
pub use serde_json;

/// Result type used throughout the Settrix library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Settrix library.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON text error: {0}")]
    Json(#[from] serde_json::Error),

    /// Structured registration-time errors from the schema module
    #[error(transparent)]
    Schema(schema::SchemaError),

    /// Structured per-call conversion errors from the binder module
    #[error(transparent)]
    Bind(binder::BindError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Io(_) => "io",
            Error::Json(_) => "json",
            Error::Schema(_) => "schema",
            Error::Bind(_) => "binder",
        }
    }

    /// Check if this error is a registration-time configuration error
    /// (an unusable settings type).
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Schema(_))
    }

    /// Check if this error is a per-call conversion error (a JSON token whose
    /// runtime shape does not match the field's expected shape).
    pub fn is_conversion(&self) -> bool {
        matches!(self, Error::Bind(_))
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}
