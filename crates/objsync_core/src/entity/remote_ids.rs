//! Remote ids produced during a sync run.

use super::{EntityKey, SyncEntity};
use std::collections::HashMap;

/// Remote ids learned while a sync run progresses.
///
/// Entity values are immutable, so a parent built before its children
/// were synced still carries the children's old (empty) `remote_id`.
/// Serialization resolves child references through this ledger, which
/// prefers the child's own `remote_id` and falls back to the id recorded
/// for the child's key earlier in the run.
#[derive(Debug, Default, Clone)]
pub struct RemoteIds {
    ids: HashMap<EntityKey, String>,
}

impl RemoteIds {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the remote id assigned to `key`.
    pub fn record(&mut self, key: EntityKey, remote_id: impl Into<String>) {
        self.ids.insert(key, remote_id.into());
    }

    /// Returns the remote id for `entity`, if known.
    pub fn resolve(&self, entity: &dyn SyncEntity) -> Option<String> {
        match entity.remote_id() {
            Some(id) if !id.is_empty() => Some(id.to_string()),
            _ => self.ids.get(&entity.key()).cloned(),
        }
    }

    /// Returns the number of recorded ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
