//! Backend mapping tables.

use crate::error::{EngineResult, SyncError};
use objsync_core::SyncEntity;
use objsync_storage::ObjectMap;
use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// A value owned by the local system.
///
/// Implemented for every `'static` type; backends recognise the concrete
/// type through [`as_any`](Self::as_any).
pub trait LocalEntity: Any + fmt::Debug + Send + Sync {
    /// Name of the concrete local type.
    fn local_type(&self) -> &'static str;

    /// Upcasts for downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + fmt::Debug + Send + Sync> LocalEntity for T {
    fn local_type(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

type RemoteConstructor =
    Box<dyn Fn(&dyn LocalEntity) -> EngineResult<Arc<dyn SyncEntity>> + Send + Sync>;

/// Static configuration of one integration backend.
///
/// Holds, per remote entity type:
/// - the endpoint its client talks to
/// - the object map recording its identity pairs
/// - for read-only types, the field used to look records up
///
/// plus the local-type to remote-type constructors. The engine only
/// reads this table.
#[derive(Default)]
pub struct BackendMapping {
    constructors: HashMap<TypeId, RemoteConstructor>,
    lookup_fields: HashMap<&'static str, &'static str>,
    endpoints: HashMap<&'static str, String>,
    object_maps: HashMap<&'static str, Arc<ObjectMap>>,
    embedded: HashSet<&'static str>,
}

impl BackendMapping {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the constructor turning local `L` values into remote entities.
    pub fn convert<L, F>(mut self, constructor: F) -> Self
    where
        L: LocalEntity,
        F: Fn(&L) -> EngineResult<Arc<dyn SyncEntity>> + Send + Sync + 'static,
    {
        let constructor: RemoteConstructor = Box::new(move |local: &dyn LocalEntity| {
            match local.as_any().downcast_ref::<L>() {
                Some(local) => constructor(local),
                None => Err(SyncError::UnmappedEntity(local.local_type().to_string())),
            }
        });
        self.constructors.insert(TypeId::of::<L>(), constructor);
        self
    }

    /// Declares `entity_type` read-only, looked up by `field`.
    pub fn read_only(mut self, entity_type: &'static str, field: &'static str) -> Self {
        self.lookup_fields.insert(entity_type, field);
        self
    }

    /// Sets the endpoint of `entity_type`.
    pub fn endpoint(mut self, entity_type: &'static str, endpoint: impl Into<String>) -> Self {
        self.endpoints.insert(entity_type, endpoint.into());
        self
    }

    /// Sets the object map of `entity_type`.
    pub fn object_map(mut self, entity_type: &'static str, map: Arc<ObjectMap>) -> Self {
        self.object_maps.insert(entity_type, map);
        self
    }

    /// Declares `entity_type` as synced inside its parent's body.
    ///
    /// Embedded entities are ordered like any other dependency but never
    /// reach the remote on their own.
    pub fn embedded(mut self, entity_type: &'static str) -> Self {
        self.embedded.insert(entity_type);
        self
    }

    /// Converts a local value into its remote-shaped entity.
    pub fn to_remote(&self, local: &dyn LocalEntity) -> EngineResult<Arc<dyn SyncEntity>> {
        let constructor = self
            .constructors
            .get(&local.as_any().type_id())
            .ok_or_else(|| SyncError::UnmappedEntity(local.local_type().to_string()))?;
        constructor(local)
    }

    /// Returns the lookup field of a read-only type.
    pub fn lookup_field(&self, entity_type: &str) -> Option<&'static str> {
        self.lookup_fields.get(entity_type).copied()
    }

    /// Returns true if `entity_type` can only be looked up.
    pub fn is_read_only(&self, entity_type: &str) -> bool {
        self.lookup_fields.contains_key(entity_type)
    }

    /// Returns true if `entity_type` is synced inside its parent.
    pub fn is_embedded(&self, entity_type: &str) -> bool {
        self.embedded.contains(entity_type)
    }

    /// Returns the endpoint of `entity_type`.
    pub fn endpoint_for(&self, entity_type: &'static str) -> EngineResult<&str> {
        self.endpoints
            .get(entity_type)
            .map(String::as_str)
            .ok_or(SyncError::MissingEndpoint(entity_type))
    }

    /// Returns the object map of `entity_type`.
    pub fn object_map_for(&self, entity_type: &'static str) -> EngineResult<&Arc<ObjectMap>> {
        self.object_maps
            .get(entity_type)
            .ok_or(SyncError::MissingObjectMap(entity_type))
    }

    /// Iterates over the configured object maps.
    pub fn object_maps(&self) -> impl Iterator<Item = (&'static str, &Arc<ObjectMap>)> {
        self.object_maps.iter().map(|(name, map)| (*name, map))
    }

    /// Clears every object map.
    pub fn reset_object_maps(&self) {
        for map in self.object_maps.values() {
            map.reset();
        }
    }
}

impl fmt::Debug for BackendMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendMapping")
            .field("constructors", &self.constructors.len())
            .field("lookup_fields", &self.lookup_fields)
            .field("endpoints", &self.endpoints)
            .field("object_maps", &self.object_maps.keys().collect::<Vec<_>>())
            .field("embedded", &self.embedded)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use objsync_core::LocalId;

    #[derive(Debug)]
    struct LocalCurrency {
        id: u64,
        code: &'static str,
    }

    #[derive(Debug)]
    struct RemoteCurrency {
        local_id: LocalId,
        iso_code: &'static str,
    }

    impl SyncEntity for RemoteCurrency {
        fn entity_type(&self) -> &'static str {
            "Currency"
        }
        fn local_id(&self) -> &LocalId {
            &self.local_id
        }
        fn remote_id(&self) -> Option<&str> {
            None
        }
        fn fields(&self) -> serde_json::Map<String, serde_json::Value> {
            let mut fields = serde_json::Map::new();
            fields.insert("iso_code".into(), self.iso_code.into());
            fields
        }
    }

    fn mapping() -> BackendMapping {
        BackendMapping::new()
            .convert(|local: &LocalCurrency| {
                Ok(Arc::new(RemoteCurrency {
                    local_id: local.id.into(),
                    iso_code: local.code,
                }) as Arc<dyn SyncEntity>)
            })
            .read_only("Currency", "iso_code")
            .endpoint("Currency", "/currencies")
            .object_map("Currency", Arc::new(ObjectMap::new("Currency")))
    }

    #[test]
    fn converts_registered_local_types() {
        let local = LocalCurrency { id: 7, code: "CAD" };
        let remote = mapping().to_remote(&local).unwrap();
        assert_eq!(remote.key().to_string(), "Currency=7");
        assert_eq!(remote.field("iso_code").unwrap(), "CAD");
    }

    #[test]
    fn unregistered_local_type_is_unmapped() {
        let err = mapping().to_remote(&"not an entity").unwrap_err();
        assert!(matches!(err, SyncError::UnmappedEntity(_)));
    }

    #[test]
    fn lookups() {
        let mapping = mapping();
        assert_eq!(mapping.lookup_field("Currency"), Some("iso_code"));
        assert!(mapping.is_read_only("Currency"));
        assert!(!mapping.is_read_only("Vendor"));
        assert_eq!(mapping.endpoint_for("Currency").unwrap(), "/currencies");
        assert!(matches!(
            mapping.endpoint_for("Vendor"),
            Err(SyncError::MissingEndpoint("Vendor"))
        ));
        assert!(matches!(
            mapping.object_map_for("Vendor"),
            Err(SyncError::MissingObjectMap("Vendor"))
        ));
    }

    #[test]
    fn reset_clears_object_maps() {
        let mapping = mapping();
        let map = mapping.object_map_for("Currency").unwrap();
        map.save(&objsync_storage::ObjectMapping::new("7", "cad"))
            .unwrap();
        mapping.reset_object_maps();
        assert!(map.is_empty());
    }
}
