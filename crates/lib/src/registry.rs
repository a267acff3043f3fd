//! The per-type metadata cache.
//!
//! Metadata for a settings type is built lazily, on first access, and exactly
//! one publication is ever observed: the registry maps
//! [`TypeId`](std::any::TypeId) to a leaked `&'static` record, so once a type
//! is published every later lookup is a read-lock and a map hit.
//!
//! The build itself runs *outside* the registry lock. Nested and collection
//! fields validate their element types during the build, which re-enters the
//! registry for those types; holding the lock across the build would deadlock
//! on the recursion. Concurrent first accessors of the same type may therefore
//! each build a candidate record, but `entry().or_insert` lets exactly one win
//! and every caller returns the published winner.

use std::{
    any::{Any, TypeId, type_name},
    collections::HashMap,
};

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::debug;

use crate::{
    Result,
    schema::{FieldDescriptor, SchemaError, Settings},
};

static REGISTRY: Lazy<RwLock<HashMap<TypeId, &'static (dyn Any + Send + Sync)>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// The immutable compiled metadata of a settings type.
///
/// Holds the declaration-ordered field descriptors, the JSON-name lookup, and
/// the aggregated validation outcome. Shared by every instance of the type;
/// never mutated after publication.
pub struct TypeMetadata<T> {
    fields: Vec<FieldDescriptor<T>>,
    by_json_name: HashMap<&'static str, usize>,
    error: Option<SchemaError>,
}

impl<T: Settings> TypeMetadata<T> {
    fn build() -> Self {
        let schema = T::schema();
        let mut problems = Vec::new();
        let mut by_json_name = HashMap::with_capacity(schema.fields.len());

        for (index, field) in schema.fields.iter().enumerate() {
            for problem in field.validate() {
                problems.push(format!("field `{}`: {problem}", field.name()));
            }
            if by_json_name.insert(field.json_name(), index).is_some() {
                problems.push(format!(
                    "field `{}`: duplicate JSON name `{}`",
                    field.name(),
                    field.json_name()
                ));
            }
        }

        let error = if problems.is_empty() {
            None
        } else {
            Some(SchemaError::InvalidSettingsType {
                type_name: type_name::<T>(),
                problems,
            })
        };

        debug!(
            settings_type = type_name::<T>(),
            fields = schema.fields.len(),
            valid = error.is_none(),
            "built settings metadata"
        );

        Self {
            fields: schema.fields,
            by_json_name,
            error,
        }
    }
}

impl<T> TypeMetadata<T> {
    /// The field descriptors, in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    /// Looks up a descriptor by its resolved JSON name (case-sensitive),
    /// together with its declaration index.
    pub fn field_by_json_name(&self, json_name: &str) -> Option<(usize, &FieldDescriptor<T>)> {
        let index = *self.by_json_name.get(json_name)?;
        self.fields.get(index).map(|field| (index, field))
    }

    /// The aggregated registration error, if the type is not usable.
    pub fn error(&self) -> Option<&SchemaError> {
        self.error.as_ref()
    }

    /// Fails with the type's configuration error unless the metadata is
    /// usable. Every public operation goes through this gate.
    pub(crate) fn ensure_valid(&self) -> Result<&Self> {
        match &self.error {
            Some(err) => Err(err.clone().into()),
            None => Ok(self),
        }
    }
}

/// Returns the compiled metadata for a settings type, building and publishing
/// it on first access.
///
/// Safe under concurrent first access from multiple threads: racers may build
/// redundantly, but all of them return the single published record.
pub fn metadata_for<T: Settings>() -> &'static TypeMetadata<T> {
    let key = TypeId::of::<T>();
    {
        let registry = REGISTRY.read();
        if let Some(entry) = registry.get(&key) {
            let published: &'static (dyn Any + Send + Sync) = *entry;
            if let Some(metadata) = published.downcast_ref::<TypeMetadata<T>>() {
                return metadata;
            }
        }
    }

    // Not yet published. Build outside the lock (the build may recurse into
    // the registry for nested field types), then publish unless another
    // thread won the race.
    let candidate: &'static (dyn Any + Send + Sync) =
        Box::leak(Box::new(TypeMetadata::<T>::build()));
    let mut registry = REGISTRY.write();
    let published: &'static (dyn Any + Send + Sync) = *registry.entry(key).or_insert(candidate);
    match published.downcast_ref::<TypeMetadata<T>>() {
        Some(metadata) => metadata,
        None => unreachable!("registry entries are keyed by TypeId"),
    }
}
