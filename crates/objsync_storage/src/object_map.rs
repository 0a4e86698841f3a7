//! Per-type identity map from local ids to remote ids.

use crate::datastore::{Datastore, DIGITS};
use crate::error::{StorageError, StorageResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A single local-to-remote identity pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMapping {
    /// Identifier in the local system.
    pub local_id: String,
    /// Identifier in the remote system.
    pub remote_id: String,
}

impl ObjectMapping {
    /// Creates a new mapping.
    pub fn new(local_id: impl Into<String>, remote_id: impl Into<String>) -> Self {
        Self {
            local_id: local_id.into(),
            remote_id: remote_id.into(),
        }
    }
}

/// Identity map for one syncable entity type.
///
/// An `ObjectMap` is a [`Datastore`] keyed by `local_id` whose records are
/// [`ObjectMapping`]s. One instance exists per entity type, so each type
/// has its own lock and writers of different types never contend.
///
/// # Invariants
///
/// - At most one mapping per `local_id`
/// - `save` replaces an existing mapping for the same `local_id`
pub struct ObjectMap {
    store: Datastore,
}

impl ObjectMap {
    /// Fields stored for every mapping.
    pub const FIELDS: [&'static str; 2] = ["local_id", "remote_id"];

    /// Creates an empty identity map.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            store: Datastore::new(name, &Self::FIELDS)
                .with_primary_key("local_id")
                .with_keyspace(DIGITS),
        }
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        self.store.name()
    }

    /// Returns the mapping for `local_id`, or `None` if the entity was never synced.
    pub fn get_one(&self, local_id: &str) -> StorageResult<Option<ObjectMapping>> {
        match self.store.retrieve(local_id)? {
            Some(record) => Ok(Some(serde_json::from_value(Value::Object(record))?)),
            None => Ok(None),
        }
    }

    /// Returns every mapping in insertion order.
    pub fn get_all(&self) -> StorageResult<Vec<ObjectMapping>> {
        self.store
            .retrieve_all()?
            .into_iter()
            .map(|record| serde_json::from_value(Value::Object(record)).map_err(StorageError::from))
            .collect()
    }

    /// Inserts or replaces a mapping and returns its key (the `local_id`).
    pub fn save(&self, mapping: &ObjectMapping) -> StorageResult<String> {
        self.store.save(serde_json::to_value(mapping)?)
    }

    /// Removes the mapping for `local_id`. Absent ids are ignored.
    pub fn remove(&self, local_id: &str) {
        self.store.remove(local_id);
    }

    /// Removes every mapping.
    pub fn reset(&self) {
        self.store.reset();
    }

    /// Returns the number of mappings.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns true if no mapping is stored.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Returns the underlying record store.
    pub fn datastore(&self) -> &Datastore {
        &self.store
    }
}

impl fmt::Debug for ObjectMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectMap")
            .field("name", &self.store.name())
            .field("len", &self.store.len())
            .finish()
    }
}
