//! Test fixtures.
//!
//! Provides a generic entity, a recording backend and a seeded tally
//! world for common test scenarios.

use objsync_core::{Dependency, LocalId, RemoteIds, SyncEntity};
use objsync_engine::{
    Backend, BackendMapping, Backends, MockRemote, RemoteConnector, SyncConfig, SyncService,
};
use objsync_remote::RemoteServer;
use objsync_storage::ObjectMap;
use objsync_tally::local::{Bill, Item};
use objsync_tally::samples::{self, Seeded};
use objsync_tally::{server, TallyBackend};
use rand::Rng;
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// An entity of any type with arbitrary children.
#[derive(Debug, Clone)]
pub struct GenericEntity {
    /// Type name.
    pub entity_type: &'static str,
    /// Local id.
    pub local_id: LocalId,
    /// Remote id.
    pub remote_id: Option<String>,
    /// Scalar fields.
    pub fields: Map<String, Value>,
    /// Dependencies.
    pub children: Vec<Arc<GenericEntity>>,
}

impl GenericEntity {
    /// Creates an unsynced entity without fields or children.
    pub fn new(entity_type: &'static str, local_id: impl Into<LocalId>) -> Self {
        Self {
            entity_type,
            local_id: local_id.into(),
            remote_id: None,
            fields: Map::new(),
            children: Vec::new(),
        }
    }

    /// Sets the remote id.
    pub fn with_remote_id(mut self, remote_id: impl Into<String>) -> Self {
        self.remote_id = Some(remote_id.into());
        self
    }

    /// Adds a scalar field.
    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    /// Adds a dependency.
    pub fn with_child(mut self, child: Arc<GenericEntity>) -> Self {
        self.children.push(child);
        self
    }

    /// Wraps the entity in an `Arc`.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl SyncEntity for GenericEntity {
    fn entity_type(&self) -> &'static str {
        self.entity_type
    }

    fn local_id(&self) -> &LocalId {
        &self.local_id
    }

    fn remote_id(&self) -> Option<&str> {
        self.remote_id.as_deref()
    }

    fn fields(&self) -> Map<String, Value> {
        self.fields.clone()
    }

    fn dependencies(&self) -> Vec<Dependency> {
        vec![Dependency::many(&self.children)]
    }

    /// Default body plus a `children` list of the children's remote ids.
    fn serialize(&self, ids: &RemoteIds) -> Value {
        let mut body = Map::new();
        body.insert("local_id".into(), json!(self.local_id.as_str()));
        body.insert("remote_id".into(), json!(self.remote_id));
        body.extend(self.fields());
        body.insert(
            "children".into(),
            self.children
                .iter()
                .map(|child| json!(ids.resolve(child.as_ref())))
                .collect(),
        );
        Value::Object(body)
    }
}

/// A backend whose clients record calls on a [`MockRemote`].
pub struct MockBackend {
    name: String,
    mapping: BackendMapping,
    remote: Arc<MockRemote>,
}

impl MockBackend {
    /// Creates a backend named `name`.
    pub fn new(name: impl Into<String>, mapping: BackendMapping, remote: Arc<MockRemote>) -> Self {
        Self {
            name: name.into(),
            mapping,
            remote,
        }
    }

    /// A backend syncing writable [`GenericEntity`] values of the given types.
    ///
    /// Every type is sent to `/<entity_type>` and recorded in its own
    /// object map.
    pub fn generic(entity_types: &[&'static str], remote: Arc<MockRemote>) -> Self {
        let mapping = entity_types.iter().fold(BackendMapping::new(), |mapping, &ty| {
            mapping
                .endpoint(ty, format!("/{ty}"))
                .object_map(ty, Arc::new(ObjectMap::new(ty)))
        });
        Self::new("mock", mapping, remote)
    }

    /// Returns the recording remote.
    pub fn remote(&self) -> &Arc<MockRemote> {
        &self.remote
    }
}

impl Backend for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn mapping(&self) -> &BackendMapping {
        &self.mapping
    }

    fn connector(&self) -> &dyn RemoteConnector {
        &self.remote
    }
}

/// A tally API with its backend.
pub struct TallyWorld {
    /// The API.
    pub api: Arc<RemoteServer>,
    /// The backend talking to it.
    pub backend: Arc<TallyBackend>,
    /// Keys of the seeded reference data, if seeded.
    pub seeded: Option<Seeded>,
}

impl TallyWorld {
    /// Creates an empty world.
    pub fn empty() -> Self {
        let api = Arc::new(server::server());
        let backend = Arc::new(TallyBackend::new(Arc::clone(&api)));
        Self {
            api,
            backend,
            seeded: None,
        }
    }

    /// Creates a world holding the sample reference data.
    pub fn seeded() -> Self {
        let mut world = Self::empty();
        world.seeded = samples::seed(&world.api).ok();
        world
    }

    /// Returns a service over the tally backend.
    pub fn service(&self) -> SyncService {
        self.service_with(SyncConfig::default())
    }

    /// Returns a service over the tally backend with `config`.
    pub fn service_with(&self, config: SyncConfig) -> SyncService {
        SyncService::new(Backends::new().with(self.backend.clone()), config)
    }
}

/// A sample bill with 1 to 5 random lines.
///
/// Lines reuse the sample account and currency, so the bill syncs
/// against a seeded world.
pub fn random_bill(rng: &mut impl Rng, id: u64) -> Bill {
    let template = samples::bill();
    let lines = rng.gen_range(1..=5);
    let items = (0..lines)
        .map(|line| Item {
            id: id * 10 + line,
            account: samples::office_supplies(),
            description: format!("Line {}", line + 1),
            quantity: rng.gen_range(1..=10),
            unit_cost: rng.gen_range(10..=100),
            currency: samples::cad(),
        })
        .collect();
    Bill {
        id,
        invoice_number: format!("INV{}", rng.gen_range(1000..=9999)),
        items,
        ..template
    }
}
