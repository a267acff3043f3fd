//! Bidirectional JSON binding for settings types.
//!
//! Three operations cover the whole contract:
//!
//! - [`apply_json`] — a tolerant *partial merge* read: keys present in the
//!   input bind onto their fields, unknown keys are ignored, and fields whose
//!   key is absent keep their current value.
//! - [`to_json`] — write-new: a brand-new object holding every field, keys
//!   sorted by resolved JSON name.
//! - [`update_json`] — the order-preservation contract: existing properties
//!   are refreshed in place, in their current order, foreign keys included;
//!   fields missing from the document are appended afterwards in name-sorted
//!   order. Round-tripping a hand-edited document keeps the human's layout
//!   while guaranteeing every declared field ends up present.
//!
//! The document model is `serde_json`'s (built with `preserve_order`, so
//! object properties enumerate in insertion order and inserts append).

use serde_json::{Map, Value};
use tracing::trace;

use crate::{
    Result,
    registry::metadata_for,
    scalar::json_kind,
    schema::{FieldDescriptor, Settings},
};

mod errors;
pub use errors::BindError;

pub(crate) fn shape_mismatch(field: &str, expected: &'static str, value: &Value) -> BindError {
    BindError::ShapeMismatch {
        field: field.to_string(),
        expected,
        actual: json_kind(value),
    }
}

/// Reads a JSON object into an instance as a partial merge.
///
/// Every key in `doc` that matches a field's resolved JSON name is bound via
/// the field's descriptor; unknown keys are skipped. Fields not mentioned in
/// the document are left untouched — this is a merge, not a reset-then-apply.
pub fn apply_json<T: Settings>(target: &mut T, doc: &Map<String, Value>) -> Result<()> {
    let metadata = metadata_for::<T>().ensure_valid()?;
    for (key, value) in doc {
        match metadata.field_by_json_name(key) {
            Some((_, field)) => field.read_json(target, value)?,
            None => trace!(key, "ignoring unknown settings key"),
        }
    }
    Ok(())
}

fn name_sorted<T>(fields: &[FieldDescriptor<T>]) -> Vec<&FieldDescriptor<T>> {
    let mut sorted: Vec<&FieldDescriptor<T>> = fields.iter().collect();
    sorted.sort_by_key(|field| field.json_name());
    sorted
}

/// Serializes an instance into a brand-new JSON object.
///
/// Every field is present, keys sorted by resolved JSON name, regardless of
/// declaration order.
pub fn to_json<T: Settings>(source: &T) -> Result<Value> {
    let metadata = metadata_for::<T>().ensure_valid()?;
    let mut doc = Map::new();
    for field in name_sorted(metadata.fields()) {
        doc.insert(field.json_name().to_string(), field.write_json_new(source)?);
    }
    Ok(Value::Object(doc))
}

/// Refreshes an existing JSON object from an instance, preserving its layout.
///
/// Walks the document's properties in their current order: each one matching
/// a known field is updated in place (recursively, so nested objects and
/// arrays keep their own key order too); foreign keys pass through untouched.
/// Fields the document lacks are then appended, sorted by resolved JSON name.
pub fn update_json<T: Settings>(source: &T, doc: &mut Map<String, Value>) -> Result<()> {
    let metadata = metadata_for::<T>().ensure_valid()?;
    let mut visited = vec![false; metadata.fields().len()];

    for (key, value) in doc.iter_mut() {
        if let Some((index, field)) = metadata.field_by_json_name(key) {
            field.update_json(source, value)?;
            visited[index] = true;
        }
    }

    let mut missing: Vec<&FieldDescriptor<T>> = metadata
        .fields()
        .iter()
        .enumerate()
        .filter(|(index, _)| !visited[*index])
        .map(|(_, field)| field)
        .collect();
    missing.sort_by_key(|field| field.json_name());
    for field in missing {
        doc.insert(field.json_name().to_string(), field.write_json_new(source)?);
    }
    Ok(())
}
