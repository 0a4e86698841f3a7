//! Per-entity sync state machine.

use crate::backend::Backend;
use crate::client::Response;
use crate::config::SyncConfig;
use crate::error::{EngineResult, SyncError};
use crate::mapping::LocalEntity;
use crate::run::SyncRun;
use objsync_core::{sync_order, EntityKey, RemoteIds, SyncEntity};
use objsync_storage::ObjectMapping;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Sync state of a single entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityState {
    /// No remote counterpart is known.
    Unsynced,
    /// The entity carries its remote id.
    Synced,
}

impl EntityState {
    /// Returns the state of `entity`.
    pub fn of(entity: &dyn SyncEntity) -> Self {
        if entity.is_synced() {
            EntityState::Synced
        } else {
            EntityState::Unsynced
        }
    }
}

/// Status of a progress event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// The entity was queued.
    Created,
    /// The entity is being synced.
    InProgress,
    /// The entity was synced.
    Completed,
    /// The entity could not be synced.
    Error,
}

impl SyncStatus {
    /// Returns true for `Completed` and `Error`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SyncStatus::Completed | SyncStatus::Error)
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncStatus::Created => "Created",
            SyncStatus::InProgress => "In Progress",
            SyncStatus::Completed => "Completed",
            SyncStatus::Error => "Error",
        };
        f.write_str(name)
    }
}

/// Outcome of a sync step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncResult {
    /// Entity the event is about.
    pub entity: EntityKey,
    /// Event status.
    pub status: SyncStatus,
    /// Human-readable description.
    pub message: String,
    /// Remote id of the entity, on `Completed`.
    pub remote_id: Option<String>,
}

impl SyncResult {
    fn new(entity: EntityKey, status: SyncStatus, message: impl Into<String>) -> Self {
        Self {
            entity,
            status,
            message: message.into(),
            remote_id: None,
        }
    }

    /// The entity entered the run.
    pub fn created(entity: EntityKey) -> Self {
        let message = format!("Sync created for {entity}");
        Self::new(entity, SyncStatus::Created, message)
    }

    /// The entity is about to be synced.
    pub fn in_progress(entity: EntityKey) -> Self {
        let message = format!("Sync in progress for {entity}");
        Self::new(entity, SyncStatus::InProgress, message)
    }

    /// The entity is synced as `remote_id`.
    pub fn completed(
        entity: EntityKey,
        remote_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            remote_id: Some(remote_id.into()),
            ..Self::new(entity, SyncStatus::Completed, message)
        }
    }

    /// The entity was skipped without a remote id of its own.
    fn skipped(entity: EntityKey, message: impl Into<String>) -> Self {
        Self::new(entity, SyncStatus::Completed, message)
    }

    /// The entity failed to sync.
    pub fn error(entity: EntityKey, message: impl Into<String>) -> Self {
        Self::new(entity, SyncStatus::Error, message)
    }

    /// Returns true if the status is `Completed`.
    pub fn is_completed(&self) -> bool {
        self.status == SyncStatus::Completed
    }

    /// Returns true if the status is `Error`.
    pub fn is_error(&self) -> bool {
        self.status == SyncStatus::Error
    }
}

impl fmt::Display for SyncResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status, self.message)
    }
}

/// Syncs entities of one backend.
#[derive(Clone)]
pub struct SyncEngine {
    backend: Arc<dyn Backend>,
    config: SyncConfig,
}

impl SyncEngine {
    /// Creates an engine for `backend`.
    pub fn new(backend: Arc<dyn Backend>, config: SyncConfig) -> Self {
        Self { backend, config }
    }

    /// Returns the backend.
    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Syncs a single entity.
    ///
    /// - A synced entity completes without side effects unless `force` is set.
    /// - With `force`, its identity pair is dropped and it is resolved again
    ///   as if it had never been synced.
    /// - Read-only types are searched by their lookup field.
    /// - Other types are sent serialized.
    ///
    /// On success the identity pair is stored in the type's object map.
    /// Failures are reported as an `Error` result, never as a panic.
    pub fn sync(&self, entity: &dyn SyncEntity, force: bool) -> SyncResult {
        self.sync_with(entity, force, &RemoteIds::new())
    }

    /// Like [`sync`](Self::sync), resolving references through `ids`.
    pub fn sync_with(&self, entity: &dyn SyncEntity, force: bool, ids: &RemoteIds) -> SyncResult {
        let key = entity.key();
        match self.try_sync(entity, force, ids) {
            Ok(result) => result,
            Err(err) => {
                warn!("Cannot sync {}: {}", key, err);
                SyncResult::error(key, err.to_string())
            }
        }
    }

    /// Starts a run over `root` and its dependencies.
    ///
    /// Fails before any entity is touched if the graph has a cycle.
    pub fn run(&self, root: Arc<dyn SyncEntity>) -> EngineResult<SyncRun> {
        let order = sync_order(root)?;
        debug!("Resolved sync order of {} entities", order.len());
        Ok(SyncRun::new(self.clone(), order))
    }

    /// Converts `local` through the backend and starts a run over it.
    pub fn run_local(&self, local: &dyn LocalEntity) -> EngineResult<SyncRun> {
        let root = self.backend.to_remote(local)?;
        self.run(root)
    }

    fn try_sync(
        &self,
        entity: &dyn SyncEntity,
        force: bool,
        ids: &RemoteIds,
    ) -> EngineResult<SyncResult> {
        let key = entity.key();
        let entity_type = entity.entity_type();
        let mapping = self.backend.mapping();

        let remote_id = entity.remote_id().filter(|id| !id.is_empty());
        if let (Some(remote_id), false) = (remote_id, force) {
            debug!("{} already synced as {}", key, remote_id);
            return Ok(SyncResult::completed(
                key.clone(),
                remote_id,
                format!("{key} already synced"),
            ));
        }

        if mapping.is_embedded(entity_type) {
            debug!("{} has no remote record of its own", key);
            return Ok(SyncResult::skipped(
                key.clone(),
                format!("{key} has no remote record of its own"),
            ));
        }

        let object_map = mapping.object_map_for(entity_type)?;
        if remote_id.is_some() {
            object_map.remove(key.local_id.as_str());
            info!("Dropped identity pair of {} for forced re-sync", key);
        }

        let client = self
            .backend
            .connector()
            .connect(mapping.endpoint_for(entity_type)?);

        let (response, remote_id) = match mapping.lookup_field(entity_type) {
            Some(field) => {
                let value = entity
                    .field(field)
                    .filter(|value| !value.is_null())
                    .ok_or_else(|| SyncError::MissingLookupValue {
                        entity_type,
                        field: field.to_string(),
                    })?;
                let response = client.search(field, &lookup_text(&value));
                let remote_id = response.body.get("id").and_then(id_text);
                (response, remote_id)
            }
            None => {
                let response = client.send(&entity.serialize(ids));
                let remote_id = created_id(&response.body);
                (response, remote_id)
            }
        };

        if !response.is_success() {
            warn!(
                "Remote rejected {} with status {}: {}",
                key,
                response.status,
                response.body_text()
            );
            return Ok(SyncResult::error(key, response.body_text()));
        }
        let Some(remote_id) = remote_id else {
            return Ok(rejected_body(key, &response));
        };

        object_map.save(&ObjectMapping::new(key.local_id.as_str(), remote_id.as_str()))?;
        info!("Synced {} as {}", key, remote_id);
        let message = format!("{key} synced as {remote_id}");
        Ok(SyncResult::completed(key, remote_id, message))
    }
}

impl fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncEngine")
            .field("backend", &self.backend.name())
            .field("config", &self.config)
            .finish()
    }
}

fn rejected_body(key: EntityKey, response: &Response) -> SyncResult {
    warn!("Remote answered {} without an id: {}", key, response.body_text());
    SyncResult::error(
        key,
        format!("response carries no remote id: {}", response.body_text()),
    )
}

fn lookup_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Remote id of a created record: the body itself, or its `id`.
fn created_id(body: &Value) -> Option<String> {
    match body {
        Value::Object(record) => record.get("id").and_then(id_text),
        other => id_text(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn created_id_forms() {
        assert_eq!(created_id(&json!("abc123")), Some("abc123".into()));
        assert_eq!(created_id(&json!(42)), Some("42".into()));
        assert_eq!(created_id(&json!({"id": "x1"})), Some("x1".into()));
        assert_eq!(created_id(&json!({"name": "x"})), None);
        assert_eq!(created_id(&json!("")), None);
        assert_eq!(created_id(&Value::Null), None);
    }

    #[test]
    fn lookup_text_unquotes_strings() {
        assert_eq!(lookup_text(&json!("CAD")), "CAD");
        assert_eq!(lookup_text(&json!(4000)), "4000");
    }

    #[test]
    fn status_display() {
        assert_eq!(SyncStatus::InProgress.to_string(), "In Progress");
        assert!(SyncStatus::Error.is_terminal());
        assert!(!SyncStatus::Created.is_terminal());
    }

    #[test]
    fn result_display() {
        let key = EntityKey::new("Vendor", 1u64);
        let result = SyncResult::created(key.clone());
        assert_eq!(result.to_string(), "[Created] Sync created for Vendor=1");

        let result = SyncResult::completed(key, "v-1", "Vendor=1 synced as v-1");
        assert!(result.is_completed());
        assert_eq!(result.remote_id.as_deref(), Some("v-1"));
    }
}
