//! Integration backends and the sync entry point.

use crate::client::RemoteConnector;
use crate::config::SyncConfig;
use crate::engine::SyncEngine;
use crate::error::{EngineResult, SyncError};
use crate::mapping::{BackendMapping, LocalEntity};
use crate::run::SyncRun;
use objsync_core::SyncEntity;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// An integration target.
pub trait Backend: Send + Sync {
    /// Registry name.
    fn name(&self) -> &str;

    /// Mapping tables.
    fn mapping(&self) -> &BackendMapping;

    /// Builds clients for the backend's endpoints.
    fn connector(&self) -> &dyn RemoteConnector;

    /// Converts a local value into its remote-shaped entity.
    fn to_remote(&self, local: &dyn LocalEntity) -> EngineResult<Arc<dyn SyncEntity>> {
        self.mapping().to_remote(local)
    }
}

/// Registry of backends by name.
#[derive(Clone, Default)]
pub struct Backends {
    backends: BTreeMap<String, Arc<dyn Backend>>,
}

impl Backends {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `backend` under its name, replacing any previous one.
    pub fn with(mut self, backend: Arc<dyn Backend>) -> Self {
        self.register(backend);
        self
    }

    /// Registers `backend` under its name, replacing any previous one.
    pub fn register(&mut self, backend: Arc<dyn Backend>) {
        self.backends.insert(backend.name().to_string(), backend);
    }

    /// Returns the backend registered as `name`.
    pub fn get(&self, name: &str) -> EngineResult<Arc<dyn Backend>> {
        self.backends
            .get(name)
            .cloned()
            .ok_or_else(|| SyncError::BackendNotFound(name.to_string()))
    }

    /// Returns the registered names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.backends.keys().map(String::as_str)
    }

    /// Returns the number of backends.
    pub fn len(&self) -> usize {
        self.backends.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

impl std::fmt::Debug for Backends {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.backends.keys()).finish()
    }
}

/// Entry point syncing local entities through named backends.
#[derive(Debug, Clone)]
pub struct SyncService {
    backends: Backends,
    config: SyncConfig,
}

impl SyncService {
    /// Creates a service over `backends`.
    pub fn new(backends: Backends, config: SyncConfig) -> Self {
        Self { backends, config }
    }

    /// Returns the registry.
    pub fn backends(&self) -> &Backends {
        &self.backends
    }

    /// Returns an engine for the backend registered as `name`.
    pub fn engine(&self, name: &str) -> EngineResult<SyncEngine> {
        Ok(SyncEngine::new(self.backends.get(name)?, self.config.clone()))
    }

    /// Starts syncing `local` and everything it depends on.
    ///
    /// Fails before emitting any event if the backend is unknown, the
    /// local type is unmapped or the entity graph has a cycle.
    pub fn sync(&self, local: &dyn LocalEntity, backend: &str) -> EngineResult<SyncRun> {
        let engine = self.engine(backend)?;
        info!("Syncing {} through {}", local.local_type(), backend);
        engine.run_local(local)
    }
}
