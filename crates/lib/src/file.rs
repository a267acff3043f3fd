//! Convenience wrappers for reading and writing settings as JSON files.
//!
//! These are thin adapters over the binder: a missing file reads as the empty
//! document (a no-op merge), and writing loads any existing document first so
//! [`update_json`](crate::binder::update_json) can preserve the file's key
//! order and foreign content.

use std::{fs, path::Path};

use serde_json::{Map, Value};

use crate::{Result, binder, schema::Settings};

fn load_document(path: &Path) -> Result<Map<String, Value>> {
    let text = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&text)?;
    match value {
        Value::Object(doc) => Ok(doc),
        other => Err(binder::shape_mismatch("<document root>", "object", &other).into()),
    }
}

/// Updates an instance from a JSON file, if it exists.
///
/// A missing file leaves the instance untouched; a present file is applied
/// with the partial-merge semantics of [`binder::apply_json`].
pub fn read_json_file<T: Settings>(target: &mut T, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(());
    }
    let doc = load_document(path)?;
    binder::apply_json(target, &doc)
}

/// Creates or updates a JSON file from an instance.
///
/// An existing file is loaded and updated in place, preserving its key order
/// and any foreign keys; a missing file is created with every field present
/// in name-sorted order.
pub fn write_json_file<T: Settings>(source: &T, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut doc = if path.exists() {
        load_document(path)?
    } else {
        Map::new()
    };
    binder::update_json(source, &mut doc)?;
    let mut text = serde_json::to_string_pretty(&Value::Object(doc))?;
    text.push('\n');
    fs::write(path, text)?;
    Ok(())
}
