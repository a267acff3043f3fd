//! Shape-specific field bindings.
//!
//! Each settings field compiles down to one binding: a pair of plain `fn`
//! pointer accessors plus the shape-specific behavior behind one of three
//! object-safe traits. The bindings are built once per type, live inside the
//! type's metadata, and are driven exclusively through
//! [`FieldDescriptor`](super::FieldDescriptor).

use std::collections::VecDeque;

use serde_json::{Map, Value};

use crate::{
    binder,
    scalar::{Literal, ScalarError, ScalarValue},
};

/// An ordered-sequence container usable as a collection field.
///
/// The concrete field type picks the container; `Vec` and `VecDeque` are
/// supported out of the box.
pub trait Sequence: Default + 'static {
    type Elem;

    fn len(&self) -> usize;
    fn clear(&mut self);
    fn push(&mut self, item: Self::Elem);
    fn get(&self, index: usize) -> Option<&Self::Elem>;

    /// Removes and returns every element, front to back.
    fn take_all(&mut self) -> Vec<Self::Elem>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: 'static> Sequence for Vec<E> {
    type Elem = E;

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn clear(&mut self) {
        Vec::clear(self)
    }

    fn push(&mut self, item: E) {
        Vec::push(self, item)
    }

    fn get(&self, index: usize) -> Option<&E> {
        self.as_slice().get(index)
    }

    fn take_all(&mut self) -> Vec<E> {
        std::mem::take(self)
    }
}

impl<E: 'static> Sequence for VecDeque<E> {
    type Elem = E;

    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn clear(&mut self) {
        VecDeque::clear(self)
    }

    fn push(&mut self, item: E) {
        self.push_back(item)
    }

    fn get(&self, index: usize) -> Option<&E> {
        VecDeque::get(self, index)
    }

    fn take_all(&mut self) -> Vec<E> {
        self.drain(..).collect()
    }
}

/// Compiled behavior of a scalar field.
pub(crate) trait ScalarField<T>: Send + Sync {
    /// The codec's name for the native type, for diagnostics.
    fn kind_name(&self) -> &'static str;

    /// Replaces the resolved default with a coerced literal.
    fn set_default_literal(&mut self, literal: &Literal) -> Result<(), ScalarError>;

    /// Whether a resolved default exists (declared, or the type's zero).
    fn has_default(&self) -> bool;

    fn reset(&self, target: &mut T);
    fn assign(&self, source: &T, target: &mut T);
    fn equivalent(&self, a: &T, b: &T) -> bool;
    fn read_json(&self, target: &mut T, value: &Value) -> Result<(), ScalarError>;
    fn write_json(&self, source: &T) -> Value;
}

pub(crate) struct ScalarBinding<T, V> {
    get: fn(&T) -> &V,
    get_mut: fn(&mut T) -> &mut V,
    default: Option<V>,
}

impl<T, V: ScalarValue> ScalarBinding<T, V> {
    pub(crate) fn new(get: fn(&T) -> &V, get_mut: fn(&mut T) -> &mut V) -> Self {
        Self {
            get,
            get_mut,
            default: V::zero(),
        }
    }
}

impl<T, V: ScalarValue> ScalarField<T> for ScalarBinding<T, V> {
    fn kind_name(&self) -> &'static str {
        V::scalar_kind()
    }

    fn set_default_literal(&mut self, literal: &Literal) -> Result<(), ScalarError> {
        self.default = Some(V::from_literal(literal)?);
        Ok(())
    }

    fn has_default(&self) -> bool {
        self.default.is_some()
    }

    fn reset(&self, target: &mut T) {
        // Unreachable without a default: the metadata build rejects the type.
        if let Some(default) = &self.default {
            *(self.get_mut)(target) = default.clone();
        }
    }

    fn assign(&self, source: &T, target: &mut T) {
        *(self.get_mut)(target) = (self.get)(source).clone();
    }

    fn equivalent(&self, a: &T, b: &T) -> bool {
        (self.get)(a) == (self.get)(b)
    }

    fn read_json(&self, target: &mut T, value: &Value) -> Result<(), ScalarError> {
        *(self.get_mut)(target) = V::from_json(value)?;
        Ok(())
    }

    fn write_json(&self, source: &T) -> Value {
        (self.get)(source).to_json()
    }
}

/// Compiled behavior of a nested settings field.
///
/// All operations act on the nested instance in place; the instance installed
/// at construction is never replaced afterwards, so external references to it
/// stay valid across `reset`, `assign`, and JSON reads.
pub(crate) trait NestedField<T>: Send + Sync {
    fn initialize(&self, target: &mut T);

    /// Registration-time check of the nested type itself.
    fn validate(&self) -> Option<String>;

    fn reset(&self, target: &mut T) -> crate::Result<()>;
    fn assign(&self, source: &T, target: &mut T) -> crate::Result<()>;
    fn equivalent(&self, a: &T, b: &T) -> crate::Result<bool>;
    fn read_object(&self, target: &mut T, doc: &Map<String, Value>) -> crate::Result<()>;
    fn write_new(&self, source: &T) -> crate::Result<Value>;
    fn update_object(&self, source: &T, doc: &mut Map<String, Value>) -> crate::Result<()>;
}

pub(crate) struct NestedBinding<T, S> {
    get: fn(&T) -> &S,
    get_mut: fn(&mut T) -> &mut S,
}

impl<T, S: super::Settings> NestedBinding<T, S> {
    pub(crate) fn new(get: fn(&T) -> &S, get_mut: fn(&mut T) -> &mut S) -> Self {
        Self { get, get_mut }
    }
}

impl<T, S: super::Settings> NestedField<T> for NestedBinding<T, S> {
    fn initialize(&self, target: &mut T) {
        *(self.get_mut)(target) = S::default();
    }

    fn validate(&self) -> Option<String> {
        crate::registry::metadata_for::<S>()
            .error()
            .map(|e| format!("nested settings type is not usable ({e})"))
    }

    fn reset(&self, target: &mut T) -> crate::Result<()> {
        crate::ops::reset((self.get_mut)(target))
    }

    fn assign(&self, source: &T, target: &mut T) -> crate::Result<()> {
        crate::ops::assign((self.get_mut)(target), (self.get)(source))
    }

    fn equivalent(&self, a: &T, b: &T) -> crate::Result<bool> {
        crate::ops::equivalent((self.get)(a), (self.get)(b))
    }

    fn read_object(&self, target: &mut T, doc: &Map<String, Value>) -> crate::Result<()> {
        binder::apply_json((self.get_mut)(target), doc)
    }

    fn write_new(&self, source: &T) -> crate::Result<Value> {
        binder::to_json((self.get)(source))
    }

    fn update_object(&self, source: &T, doc: &mut Map<String, Value>) -> crate::Result<()> {
        binder::update_json((self.get)(source), doc)
    }
}

/// Compiled behavior of a collection field (scalars or nested settings).
pub(crate) trait CollectionField<T>: Send + Sync {
    fn initialize(&self, target: &mut T);
    fn validate(&self) -> Option<String>;

    fn clear(&self, target: &mut T);
    fn assign(&self, source: &T, target: &mut T) -> crate::Result<()>;
    fn equivalent(&self, a: &T, b: &T) -> crate::Result<bool>;

    /// Rebinds the container from a JSON array. `field` names the owning
    /// field for error context.
    fn read_array(&self, field: &str, target: &mut T, items: &[Value]) -> crate::Result<()>;

    fn write_new(&self, source: &T) -> crate::Result<Value>;
    fn update_array(&self, source: &T, items: &mut Vec<Value>) -> crate::Result<()>;
}

pub(crate) struct ScalarSeqBinding<T, C> {
    get: fn(&T) -> &C,
    get_mut: fn(&mut T) -> &mut C,
}

impl<T, C> ScalarSeqBinding<T, C>
where
    C: Sequence,
    C::Elem: ScalarValue,
{
    pub(crate) fn new(get: fn(&T) -> &C, get_mut: fn(&mut T) -> &mut C) -> Self {
        Self { get, get_mut }
    }
}

impl<T, C> CollectionField<T> for ScalarSeqBinding<T, C>
where
    C: Sequence,
    C::Elem: ScalarValue,
{
    fn initialize(&self, target: &mut T) {
        *(self.get_mut)(target) = C::default();
    }

    fn validate(&self) -> Option<String> {
        None
    }

    fn clear(&self, target: &mut T) {
        (self.get_mut)(target).clear();
    }

    fn assign(&self, source: &T, target: &mut T) -> crate::Result<()> {
        let from = (self.get)(source);
        let count = from.len();
        let mut copies = Vec::with_capacity(count);
        for index in 0..count {
            if let Some(item) = from.get(index) {
                copies.push(item.clone());
            }
        }
        let to = (self.get_mut)(target);
        to.clear();
        for item in copies {
            to.push(item);
        }
        Ok(())
    }

    fn equivalent(&self, a: &T, b: &T) -> crate::Result<bool> {
        let (left, right) = ((self.get)(a), (self.get)(b));
        if left.len() != right.len() {
            return Ok(false);
        }
        for index in 0..left.len() {
            if left.get(index) != right.get(index) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn read_array(&self, field: &str, target: &mut T, items: &[Value]) -> crate::Result<()> {
        let container = (self.get_mut)(target);
        container.clear();
        for value in items {
            let item = C::Elem::from_json(value)
                .map_err(|source| binder::BindError::Scalar {
                    field: field.to_string(),
                    source,
                })
                .map_err(crate::Error::from)?;
            container.push(item);
        }
        Ok(())
    }

    fn write_new(&self, source: &T) -> crate::Result<Value> {
        let container = (self.get)(source);
        let mut items = Vec::with_capacity(container.len());
        for index in 0..container.len() {
            if let Some(item) = container.get(index) {
                items.push(item.to_json());
            }
        }
        Ok(Value::Array(items))
    }

    fn update_array(&self, source: &T, items: &mut Vec<Value>) -> crate::Result<()> {
        let container = (self.get)(source);
        for index in 0..container.len() {
            let Some(item) = container.get(index) else {
                break;
            };
            if index < items.len() {
                items[index] = item.to_json();
            } else {
                items.push(item.to_json());
            }
        }
        items.truncate(container.len());
        Ok(())
    }
}

pub(crate) struct SettingsSeqBinding<T, C> {
    get: fn(&T) -> &C,
    get_mut: fn(&mut T) -> &mut C,
}

impl<T, C> SettingsSeqBinding<T, C>
where
    C: Sequence,
    C::Elem: super::Settings,
{
    pub(crate) fn new(get: fn(&T) -> &C, get_mut: fn(&mut T) -> &mut C) -> Self {
        Self { get, get_mut }
    }
}

impl<T, C> CollectionField<T> for SettingsSeqBinding<T, C>
where
    C: Sequence,
    C::Elem: super::Settings,
{
    fn initialize(&self, target: &mut T) {
        *(self.get_mut)(target) = C::default();
    }

    fn validate(&self) -> Option<String> {
        crate::registry::metadata_for::<C::Elem>()
            .error()
            .map(|e| format!("collection element type is not usable ({e})"))
    }

    fn clear(&self, target: &mut T) {
        (self.get_mut)(target).clear();
    }

    fn assign(&self, source: &T, target: &mut T) -> crate::Result<()> {
        let from = (self.get)(source);
        let mut copies = Vec::with_capacity(from.len());
        for index in 0..from.len() {
            if let Some(item) = from.get(index) {
                // Each appended element is a fresh deep copy, never shared.
                let mut copy = crate::ops::construct::<C::Elem>()?;
                crate::ops::assign(&mut copy, item)?;
                copies.push(copy);
            }
        }
        let to = (self.get_mut)(target);
        to.clear();
        for item in copies {
            to.push(item);
        }
        Ok(())
    }

    fn equivalent(&self, a: &T, b: &T) -> crate::Result<bool> {
        let (left, right) = ((self.get)(a), (self.get)(b));
        if left.len() != right.len() {
            return Ok(false);
        }
        for index in 0..left.len() {
            match (left.get(index), right.get(index)) {
                (Some(x), Some(y)) => {
                    if !crate::ops::equivalent(x, y)? {
                        return Ok(false);
                    }
                }
                _ => return Ok(false),
            }
        }
        Ok(true)
    }

    fn read_array(&self, field: &str, target: &mut T, items: &[Value]) -> crate::Result<()> {
        let container = (self.get_mut)(target);
        // Recycle existing elements by position so external references to
        // them survive the read.
        let mut pool = container.take_all().into_iter();
        for value in items {
            let Value::Object(doc) = value else {
                return Err(binder::shape_mismatch(field, "object", value).into());
            };
            let mut item = match pool.next() {
                Some(existing) => existing,
                None => crate::ops::construct::<C::Elem>()?,
            };
            binder::apply_json(&mut item, doc)?;
            (self.get_mut)(target).push(item);
        }
        Ok(())
    }

    fn write_new(&self, source: &T) -> crate::Result<Value> {
        let container = (self.get)(source);
        let mut items = Vec::with_capacity(container.len());
        for index in 0..container.len() {
            if let Some(item) = container.get(index) {
                items.push(binder::to_json(item)?);
            }
        }
        Ok(Value::Array(items))
    }

    fn update_array(&self, source: &T, items: &mut Vec<Value>) -> crate::Result<()> {
        let container = (self.get)(source);
        for index in 0..container.len() {
            let Some(item) = container.get(index) else {
                break;
            };
            if index < items.len() {
                // Reuse the existing slot, preserving object key order.
                match &mut items[index] {
                    Value::Object(doc) => binder::update_json(item, doc)?,
                    slot => *slot = binder::to_json(item)?,
                }
            } else {
                items.push(binder::to_json(item)?);
            }
        }
        items.truncate(container.len());
        Ok(())
    }
}
