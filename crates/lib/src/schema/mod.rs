//! Settings type declarations: the `Settings` trait, the fluent schema
//! builder, and the compiled per-field descriptors.
//!
//! A settings type declares its field table once, in [`Settings::schema`],
//! typically through the [`settings_schema!`](crate::settings_schema) macro.
//! Each entry compiles into a [`FieldDescriptor`]: the field's name, its
//! resolved JSON name, and a shape-specific binding from the closed set
//! {scalar, nested, collection}. Every higher layer (reset, equivalence,
//! copying, JSON binding) drives instances purely through these descriptors —
//! there is no per-type special-casing anywhere above this module.
//!
//! # Declaring a type
//!
//! ```
//! use settrix::{Literal, Schema, Settings};
//!
//! #[derive(Debug, Default)]
//! struct Connection {
//!     host: String,
//!     port: i64,
//! }
//!
//! impl Settings for Connection {
//!     fn schema() -> Schema<Self> {
//!         Schema::new()
//!             .scalar("host", |s: &Self| &s.host, |s: &mut Self| &mut s.host)
//!             .default_literal(Literal::Str("localhost"))
//!             .scalar("port", |s: &Self| &s.port, |s: &mut Self| &mut s.port)
//!             .default_literal(Literal::Int(5432))
//!             .json_name("Port")
//!     }
//! }
//! ```

use serde_json::Value;

use crate::{
    Result, binder,
    scalar::{Literal, ScalarValue},
};

mod errors;
mod field;

pub use errors::SchemaError;
pub use field::Sequence;

use field::{
    CollectionField, NestedBinding, NestedField, ScalarBinding, ScalarField, ScalarSeqBinding,
    SettingsSeqBinding,
};

/// A strongly-typed settings type.
///
/// Implementors are plain structs whose every field is declared in the schema
/// table as one of the supported shapes. `Default` supplies the raw zero-value
/// instance; declared defaults are applied by
/// [`construct`](crate::ops::construct) / [`reset`](crate::ops::reset) through
/// the type's metadata.
pub trait Settings: Default + Sized + 'static {
    /// The declaration-ordered field table for this type.
    ///
    /// Called exactly once, when the type's metadata is first built.
    fn schema() -> Schema<Self>;
}

/// The classification of a field into one of the three supported shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A primitive, string, date/time, duration, URI, enum, or nullable form
    Scalar,
    /// Another settings type, owned by value
    Nested,
    /// An ordered sequence of scalars or of nested settings
    Collection,
}

/// The shape-specific compiled binding of one field.
///
/// A closed variant: every operation matches exhaustively, so no shape can be
/// silently unhandled.
pub(crate) enum FieldShape<T> {
    Scalar(Box<dyn ScalarField<T>>),
    Nested(Box<dyn NestedField<T>>),
    Collection(Box<dyn CollectionField<T>>),
}

/// One compiled field of a settings type: name, resolved JSON name, and the
/// shape binding. Immutable once the owning type's metadata is built.
pub struct FieldDescriptor<T> {
    name: &'static str,
    json_name: Option<&'static str>,
    shape: FieldShape<T>,
    problem: Option<String>,
}

impl<T> FieldDescriptor<T> {
    /// The field's declared name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The name used for this field in JSON documents: the declared override,
    /// or the field name itself.
    pub fn json_name(&self) -> &'static str {
        self.json_name.unwrap_or(self.name)
    }

    /// The field's shape classification.
    pub fn kind(&self) -> FieldKind {
        match &self.shape {
            FieldShape::Scalar(_) => FieldKind::Scalar,
            FieldShape::Nested(_) => FieldKind::Nested,
            FieldShape::Collection(_) => FieldKind::Collection,
        }
    }

    /// Registration-time problems with this field, if any.
    pub(crate) fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if let Some(problem) = &self.problem {
            problems.push(problem.clone());
        }
        match &self.shape {
            FieldShape::Scalar(binding) => {
                if !binding.has_default() {
                    problems.push(format!(
                        "scalar type {} has no zero value; declare a default",
                        binding.kind_name()
                    ));
                }
            }
            FieldShape::Nested(binding) => {
                if let Some(problem) = binding.validate() {
                    problems.push(problem);
                }
            }
            FieldShape::Collection(binding) => {
                if let Some(problem) = binding.validate() {
                    problems.push(problem);
                }
            }
        }
        problems
    }

    /// Installs a fresh nested instance or empty container. Called once, at
    /// instance construction; scalars need no initialization.
    pub(crate) fn initialize(&self, target: &mut T) {
        match &self.shape {
            FieldShape::Scalar(_) => {}
            FieldShape::Nested(binding) => binding.initialize(target),
            FieldShape::Collection(binding) => binding.initialize(target),
        }
    }

    /// Resets the field to its default: scalars to the resolved default,
    /// nested instances recursively in place, collections cleared in place.
    pub(crate) fn reset(&self, target: &mut T) -> Result<()> {
        match &self.shape {
            FieldShape::Scalar(binding) => {
                binding.reset(target);
                Ok(())
            }
            FieldShape::Nested(binding) => binding.reset(target),
            FieldShape::Collection(binding) => {
                binding.clear(target);
                Ok(())
            }
        }
    }

    /// Copies the field's value from `source` into `target`, recursing into
    /// nested instances rather than replacing them.
    pub(crate) fn assign(&self, target: &mut T, source: &T) -> Result<()> {
        match &self.shape {
            FieldShape::Scalar(binding) => {
                binding.assign(source, target);
                Ok(())
            }
            FieldShape::Nested(binding) => binding.assign(source, target),
            FieldShape::Collection(binding) => binding.assign(source, target),
        }
    }

    /// Structural equivalence of the field's value in two instances.
    pub(crate) fn equivalent(&self, a: &T, b: &T) -> Result<bool> {
        match &self.shape {
            FieldShape::Scalar(binding) => Ok(binding.equivalent(a, b)),
            FieldShape::Nested(binding) => binding.equivalent(a, b),
            FieldShape::Collection(binding) => binding.equivalent(a, b),
        }
    }

    /// Reads the field from a JSON token, enforcing the token's shape.
    pub(crate) fn read_json(&self, target: &mut T, value: &Value) -> Result<()> {
        match &self.shape {
            FieldShape::Scalar(binding) => {
                binding
                    .read_json(target, value)
                    .map_err(|source| binder::BindError::Scalar {
                        field: self.name.to_string(),
                        source,
                    })?;
                Ok(())
            }
            FieldShape::Nested(binding) => match value {
                Value::Object(doc) => binding.read_object(target, doc),
                other => Err(binder::shape_mismatch(self.name, "object", other).into()),
            },
            FieldShape::Collection(binding) => match value {
                Value::Array(items) => binding.read_array(self.name, target, items),
                other => Err(binder::shape_mismatch(self.name, "array", other).into()),
            },
        }
    }

    /// Serializes the field with no prior JSON value to reuse.
    pub(crate) fn write_json_new(&self, source: &T) -> Result<Value> {
        match &self.shape {
            FieldShape::Scalar(binding) => Ok(binding.write_json(source)),
            FieldShape::Nested(binding) => binding.write_new(source),
            FieldShape::Collection(binding) => binding.write_new(source),
        }
    }

    /// Refreshes an existing JSON value in place, preserving nested key order
    /// and reusing array positions where shapes allow.
    pub(crate) fn update_json(&self, source: &T, existing: &mut Value) -> Result<()> {
        match &self.shape {
            FieldShape::Scalar(binding) => {
                *existing = binding.write_json(source);
                Ok(())
            }
            FieldShape::Nested(binding) => match existing {
                Value::Object(doc) => binding.update_object(source, doc),
                other => {
                    *other = binding.write_new(source)?;
                    Ok(())
                }
            },
            FieldShape::Collection(binding) => match existing {
                Value::Array(items) => binding.update_array(source, items),
                other => {
                    *other = binding.write_new(source)?;
                    Ok(())
                }
            },
        }
    }
}

/// The declaration-ordered field table of a settings type.
///
/// Built fluently; each shape method appends a field, and the modifiers
/// [`json_name`](Schema::json_name) / [`default_literal`](Schema::default_literal)
/// refine the most recently added one. Declaration misuse (a default on a
/// nested field, an uncoercible literal) is recorded against the field and
/// aggregated into the type's registration error rather than panicking.
pub struct Schema<T> {
    pub(crate) fields: Vec<FieldDescriptor<T>>,
}

impl<T: 'static> Default for Schema<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Schema<T> {
    /// Creates an empty schema table.
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    fn push(mut self, name: &'static str, shape: FieldShape<T>) -> Self {
        self.fields.push(FieldDescriptor {
            name,
            json_name: None,
            shape,
            problem: None,
        });
        self
    }

    /// Declares a scalar field.
    pub fn scalar<V: ScalarValue>(
        self,
        name: &'static str,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
    ) -> Self {
        self.push(
            name,
            FieldShape::Scalar(Box::new(ScalarBinding::new(get, get_mut))),
        )
    }

    /// Declares a nested settings field.
    pub fn nested<S: Settings>(
        self,
        name: &'static str,
        get: fn(&T) -> &S,
        get_mut: fn(&mut T) -> &mut S,
    ) -> Self {
        self.push(
            name,
            FieldShape::Nested(Box::new(NestedBinding::new(get, get_mut))),
        )
    }

    /// Declares a collection-of-scalars field.
    pub fn scalar_list<C>(
        self,
        name: &'static str,
        get: fn(&T) -> &C,
        get_mut: fn(&mut T) -> &mut C,
    ) -> Self
    where
        C: Sequence,
        C::Elem: ScalarValue,
    {
        self.push(
            name,
            FieldShape::Collection(Box::new(ScalarSeqBinding::new(get, get_mut))),
        )
    }

    /// Declares a collection-of-settings field.
    pub fn settings_list<C>(
        self,
        name: &'static str,
        get: fn(&T) -> &C,
        get_mut: fn(&mut T) -> &mut C,
    ) -> Self
    where
        C: Sequence,
        C::Elem: Settings,
    {
        self.push(
            name,
            FieldShape::Collection(Box::new(SettingsSeqBinding::new(get, get_mut))),
        )
    }

    /// Overrides the JSON name of the most recently declared field.
    pub fn json_name(mut self, json_name: &'static str) -> Self {
        if let Some(field) = self.fields.last_mut() {
            field.json_name = Some(json_name);
        }
        self
    }

    /// Declares the default literal of the most recently declared field.
    ///
    /// The literal is coerced into the field's native type immediately, so
    /// coercion failures are caught once, at metadata build time.
    pub fn default_literal(mut self, literal: Literal) -> Self {
        if let Some(field) = self.fields.last_mut() {
            match &mut field.shape {
                FieldShape::Scalar(binding) => {
                    if let Err(err) = binding.set_default_literal(&literal) {
                        field.problem = Some(err.to_string());
                    }
                }
                FieldShape::Nested(_) | FieldShape::Collection(_) => {
                    field.problem =
                        Some("only scalar fields may declare a default value".to_string());
                }
            }
        }
        self
    }
}
