//! Syncable entities.

mod id;
mod remote_ids;

pub use id::{EntityKey, LocalId};
pub use remote_ids::RemoteIds;

use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// A dependency declared by an entity field.
///
/// Entities list their entity-valued fields through
/// [`SyncEntity::dependencies`], in field-declaration order.
#[derive(Clone)]
pub enum Dependency {
    /// A required single child.
    One(Arc<dyn SyncEntity>),
    /// A child that may be absent.
    Optional(Option<Arc<dyn SyncEntity>>),
    /// A sequence of children.
    Many(Vec<Arc<dyn SyncEntity>>),
}

impl Dependency {
    /// Declares a required child.
    pub fn one<E: SyncEntity + 'static>(child: &Arc<E>) -> Self {
        Self::One(Arc::clone(child) as Arc<dyn SyncEntity>)
    }

    /// Declares an optional child.
    pub fn optional<E: SyncEntity + 'static>(child: &Option<Arc<E>>) -> Self {
        Self::Optional(
            child
                .as_ref()
                .map(|child| Arc::clone(child) as Arc<dyn SyncEntity>),
        )
    }

    /// Declares a sequence of children.
    pub fn many<E: SyncEntity + 'static>(children: &[Arc<E>]) -> Self {
        Self::Many(
            children
                .iter()
                .map(|child| Arc::clone(child) as Arc<dyn SyncEntity>)
                .collect(),
        )
    }

    /// Returns the present children, in order.
    pub fn entities(&self) -> impl Iterator<Item = &Arc<dyn SyncEntity>> {
        let slice: &[Arc<dyn SyncEntity>] = match self {
            Dependency::One(child) => std::slice::from_ref(child),
            Dependency::Optional(Some(child)) => std::slice::from_ref(child),
            Dependency::Optional(None) => &[],
            Dependency::Many(children) => children,
        };
        slice.iter()
    }
}

impl fmt::Debug for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<_> = self.entities().map(|e| e.key()).collect();
        match self {
            Dependency::One(_) => f.debug_tuple("One").field(&keys[0]).finish(),
            Dependency::Optional(_) => f.debug_tuple("Optional").field(&keys.first()).finish(),
            Dependency::Many(_) => f.debug_tuple("Many").field(&keys).finish(),
        }
    }
}

/// An immutable entity that can be synced with a remote system.
///
/// Implement this for each remote-shaped entity type. Implementors
/// provide:
/// - identity: [`entity_type`](Self::entity_type) and [`local_id`](Self::local_id)
/// - sync state: [`remote_id`](Self::remote_id), whose presence is the only
///   "already synced" signal
/// - their scalar fields through [`fields`](Self::fields)
/// - their entity-valued fields through [`dependencies`](Self::dependencies)
///
/// # Serialization
///
/// The default [`serialize`](Self::serialize) produces `local_id`,
/// `remote_id` and the scalar fields. Types with entity-valued fields
/// override it to reference each single child by its remote id (resolved
/// through [`RemoteIds`]) and to embed sequences as each item's own
/// serialized form.
///
/// # Example
///
/// ```rust
/// use objsync_core::{LocalId, RemoteIds, SyncEntity};
/// use serde_json::{json, Map, Value};
/// use std::sync::Arc;
///
/// #[derive(Debug)]
/// struct Location {
///     local_id: LocalId,
///     remote_id: Option<String>,
///     name: String,
/// }
///
/// impl SyncEntity for Location {
///     fn entity_type(&self) -> &'static str {
///         "Location"
///     }
///     fn local_id(&self) -> &LocalId {
///         &self.local_id
///     }
///     fn remote_id(&self) -> Option<&str> {
///         self.remote_id.as_deref()
///     }
///     fn fields(&self) -> Map<String, Value> {
///         let mut fields = Map::new();
///         fields.insert("name".into(), json!(self.name));
///         fields
///     }
/// }
///
/// let location = Location { local_id: 1u64.into(), remote_id: None, name: "Vancouver".into() };
/// assert_eq!(location.serialize(&RemoteIds::new())["name"], "Vancouver");
/// assert!(!location.is_synced());
/// ```
pub trait SyncEntity: fmt::Debug + Send + Sync {
    /// Name of the concrete entity type.
    fn entity_type(&self) -> &'static str;

    /// Identifier in the local system.
    fn local_id(&self) -> &LocalId;

    /// Identifier in the remote system, if the entity is synced.
    fn remote_id(&self) -> Option<&str>;

    /// Declared scalar fields, keyed by field name.
    fn fields(&self) -> Map<String, Value> {
        Map::new()
    }

    /// Entity-valued fields, in declaration order.
    fn dependencies(&self) -> Vec<Dependency> {
        Vec::new()
    }

    /// Produces the body sent to the remote system.
    ///
    /// `ids` resolves the remote ids of referenced entities.
    fn serialize(&self, ids: &RemoteIds) -> Value {
        let _ = ids;
        let mut body = Map::new();
        body.insert(
            "local_id".to_string(),
            Value::String(self.local_id().to_string()),
        );
        body.insert(
            "remote_id".to_string(),
            self.remote_id()
                .map_or(Value::Null, |id| Value::String(id.to_string())),
        );
        body.extend(self.fields());
        Value::Object(body)
    }

    /// Returns the value of a scalar field by name.
    fn field(&self, name: &str) -> Option<Value> {
        self.fields().remove(name)
    }

    /// Returns the identity key.
    fn key(&self) -> EntityKey {
        EntityKey::new(self.entity_type(), self.local_id().clone())
    }

    /// Returns true if the entity carries a non-empty remote id.
    fn is_synced(&self) -> bool {
        self.remote_id().is_some_and(|id| !id.is_empty())
    }
}

impl PartialEq for dyn SyncEntity + '_ {
    fn eq(&self, other: &Self) -> bool {
        self.entity_type() == other.entity_type() && self.local_id() == other.local_id()
    }
}

impl Eq for dyn SyncEntity + '_ {}

impl fmt::Display for dyn SyncEntity + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    struct Window {
        local_id: LocalId,
        remote_id: Option<String>,
        width: u32,
    }

    #[derive(Debug)]
    struct Room {
        local_id: LocalId,
        remote_id: Option<String>,
        windows: Vec<Arc<Window>>,
        door: Option<Arc<Window>>,
    }

    impl SyncEntity for Window {
        fn entity_type(&self) -> &'static str {
            "Window"
        }
        fn local_id(&self) -> &LocalId {
            &self.local_id
        }
        fn remote_id(&self) -> Option<&str> {
            self.remote_id.as_deref()
        }
        fn fields(&self) -> Map<String, Value> {
            let mut fields = Map::new();
            fields.insert("width".into(), json!(self.width));
            fields
        }
    }

    impl SyncEntity for Room {
        fn entity_type(&self) -> &'static str {
            "Room"
        }
        fn local_id(&self) -> &LocalId {
            &self.local_id
        }
        fn remote_id(&self) -> Option<&str> {
            self.remote_id.as_deref()
        }
        fn dependencies(&self) -> Vec<Dependency> {
            vec![Dependency::many(&self.windows), Dependency::optional(&self.door)]
        }
    }

    fn window(id: u64, width: u32) -> Arc<Window> {
        Arc::new(Window {
            local_id: id.into(),
            remote_id: None,
            width,
        })
    }

    #[test]
    fn default_serialization() {
        let w = Window {
            local_id: 4u64.into(),
            remote_id: Some("w-4".into()),
            width: 2,
        };
        assert_eq!(
            w.serialize(&RemoteIds::new()),
            json!({"local_id": "4", "remote_id": "w-4", "width": 2})
        );
        assert_eq!(w.field("width"), Some(json!(2)));
        assert_eq!(w.field("height"), None);
    }

    #[test]
    fn empty_remote_id_is_not_synced() {
        let mut w = Window {
            local_id: 1u64.into(),
            remote_id: Some(String::new()),
            width: 1,
        };
        assert!(!w.is_synced());
        w.remote_id = Some("abc".into());
        assert!(w.is_synced());
    }

    #[test]
    fn equality_ignores_other_fields() {
        let a: Arc<dyn SyncEntity> = window(1, 2);
        let b: Arc<dyn SyncEntity> = window(1, 99);
        let c: Arc<dyn SyncEntity> = window(2, 2);
        assert!(*a == *b);
        assert!(*a != *c);
    }

    #[test]
    fn dependency_entities_flatten() {
        let room = Room {
            local_id: 1u64.into(),
            remote_id: None,
            windows: vec![window(1, 2), window(2, 3)],
            door: None,
        };
        let deps = room.dependencies();
        assert_eq!(deps.len(), 2);
        assert_eq!(deps[0].entities().count(), 2);
        assert_eq!(deps[1].entities().count(), 0);
    }
}
