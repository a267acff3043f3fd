//! Type-generic settings operations.
//!
//! Everything here is a fold over a type's field descriptors: construction,
//! reset to defaults, structural equivalence, deep assignment, and deep copy.
//! The [`SettingsExt`] blanket trait re-exposes the same operations as
//! methods on every settings type.
//!
//! All operations validate the type's metadata first, so an unusable type
//! (see [`SchemaError`](crate::schema::SchemaError)) fails the same way no
//! matter which operation touches it first.

use serde_json::{Map, Value};

use crate::{Result, binder, registry::metadata_for, schema::Settings};

/// Constructs a fresh instance with every field at its default value.
///
/// Nested fields hold fresh, fully constructed instances of their own; the
/// first construction of a type whose schema is invalid fails with the
/// aggregated configuration error.
pub fn construct<T: Settings>() -> Result<T> {
    let metadata = metadata_for::<T>().ensure_valid()?;
    let mut instance = T::default();
    for field in metadata.fields() {
        field.initialize(&mut instance);
    }
    for field in metadata.fields() {
        field.reset(&mut instance)?;
    }
    Ok(instance)
}

/// Resets every field of an instance to its default value.
///
/// Nested instances are reset recursively in place, never replaced;
/// collections are cleared in place. Idempotent.
pub fn reset<T: Settings>(instance: &mut T) -> Result<()> {
    let metadata = metadata_for::<T>().ensure_valid()?;
    for field in metadata.fields() {
        field.reset(instance)?;
    }
    Ok(())
}

/// Checks whether two instances hold structurally equivalent values.
pub fn equivalent<T: Settings>(a: &T, b: &T) -> Result<bool> {
    let metadata = metadata_for::<T>().ensure_valid()?;
    for field in metadata.fields() {
        if !field.equivalent(a, b)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Copies every field value from `source` into `target`.
///
/// Nested instances are copied field-by-field into the existing instances at
/// `target`; collection elements are deep copies, so later mutation of either
/// side never shows through the other.
pub fn assign<T: Settings>(target: &mut T, source: &T) -> Result<()> {
    let metadata = metadata_for::<T>().ensure_valid()?;
    for field in metadata.fields() {
        field.assign(target, source)?;
    }
    Ok(())
}

/// Creates a new instance holding a deep copy of `source`'s values.
pub fn create_copy<T: Settings>(source: &T) -> Result<T> {
    let mut copy = construct::<T>()?;
    assign(&mut copy, source)?;
    Ok(copy)
}

/// The settings operations, as methods on every settings type.
///
/// ```
/// use settrix::{SettingsExt, settings_schema};
///
/// #[derive(Debug, Default)]
/// struct Prefs {
///     greeting: String,
/// }
///
/// settings_schema! {
///     Prefs {
///         scalar greeting = "Hello",
///     }
/// }
///
/// let a = Prefs::construct()?;
/// let mut b = a.create_copy()?;
/// assert!(a.is_equivalent_to(&b)?);
/// b.greeting = "Hola".to_string();
/// assert!(!a.is_equivalent_to(&b)?);
/// b.reset_values()?;
/// assert_eq!(b.greeting, "Hello");
/// # Ok::<(), settrix::Error>(())
/// ```
pub trait SettingsExt: Settings {
    /// See [`construct`].
    fn construct() -> Result<Self> {
        construct()
    }

    /// See [`reset`].
    fn reset_values(&mut self) -> Result<&mut Self> {
        reset(self)?;
        Ok(self)
    }

    /// See [`equivalent`].
    fn is_equivalent_to(&self, other: &Self) -> Result<bool> {
        equivalent(self, other)
    }

    /// See [`assign`].
    fn assign_from(&mut self, source: &Self) -> Result<&mut Self> {
        assign(self, source)?;
        Ok(self)
    }

    /// See [`create_copy`].
    fn create_copy(&self) -> Result<Self> {
        create_copy(self)
    }

    /// See [`binder::apply_json`].
    fn apply_json(&mut self, doc: &Map<String, Value>) -> Result<&mut Self> {
        binder::apply_json(self, doc)?;
        Ok(self)
    }

    /// See [`binder::to_json`].
    fn to_json(&self) -> Result<Value> {
        binder::to_json(self)
    }

    /// See [`binder::update_json`].
    fn update_json(&self, doc: &mut Map<String, Value>) -> Result<()> {
        binder::update_json(self, doc)
    }
}

impl<T: Settings> SettingsExt for T {}
