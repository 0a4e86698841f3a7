//! Dependency graphs over sync entities.
//!
//! Nodes live in an arena owned by [`DependencyGraph`]; edges are
//! [`NodeId`] indices. The graph's key index doubles as the identity
//! cache used during construction, so every edge into an entity with a
//! given [`EntityKey`] lands on the same node.

mod builder;
mod resolver;

pub use builder::build_graph;
pub use resolver::resolve_order;

use crate::entity::{EntityKey, SyncEntity};
use crate::error::GraphResult;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Index of a node within a [`DependencyGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A graph node: one entity and the nodes it depends on.
#[derive(Debug)]
pub struct Node {
    entity: Arc<dyn SyncEntity>,
    deps: Vec<NodeId>,
    visited: bool,
}

impl Node {
    fn new(entity: Arc<dyn SyncEntity>) -> Self {
        Self {
            entity,
            deps: Vec::new(),
            visited: false,
        }
    }

    /// Returns the wrapped entity.
    pub fn entity(&self) -> &Arc<dyn SyncEntity> {
        &self.entity
    }

    /// Returns the dependencies in declaration order, without duplicates.
    pub fn dependencies(&self) -> &[NodeId] {
        &self.deps
    }

    /// Returns true if the node was emitted by the last resolution.
    pub fn is_visited(&self) -> bool {
        self.visited
    }

    /// Adds a dependency edge. Returns false if the edge already existed.
    fn add_dependency(&mut self, dep: NodeId) -> bool {
        if self.deps.contains(&dep) {
            return false;
        }
        self.deps.push(dep);
        true
    }

    /// Marks the node visited. Returns false if it already was.
    fn visit(&mut self) -> bool {
        !std::mem::replace(&mut self.visited, true)
    }
}

/// A deduplicated dependency graph.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    nodes: Vec<Node>,
    index: HashMap<EntityKey, NodeId>,
}

impl DependencyGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the graph rooted at `root`.
    ///
    /// Returns the graph together with the root's node id.
    pub fn build(root: &Arc<dyn SyncEntity>) -> GraphResult<(Self, NodeId)> {
        let mut graph = Self::new();
        let root = build_graph(root, &mut graph)?;
        Ok((graph, root))
    }

    /// Returns the node for `id`.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Returns the node registered for an entity identity.
    pub fn lookup(&self, key: &EntityKey) -> Option<NodeId> {
        self.index.get(key).copied()
    }

    /// Returns the number of distinct entities in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over all nodes with their ids, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Registers a new node. The caller must have checked the index.
    fn insert(&mut self, entity: Arc<dyn SyncEntity>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.index.insert(entity.key(), id);
        self.nodes.push(Node::new(entity));
        id
    }

    fn add_edge(&mut self, from: NodeId, to: NodeId) -> bool {
        self.nodes[from.0].add_dependency(to)
    }

    fn clear_visited(&mut self) {
        for node in &mut self.nodes {
            node.visited = false;
        }
    }
}

/// Builds the graph for `root` and returns its sync order.
///
/// Shorthand for [`build_graph`] followed by [`resolve_order`].
pub fn sync_order(root: Arc<dyn SyncEntity>) -> GraphResult<Vec<Arc<dyn SyncEntity>>> {
    let (mut graph, root) = DependencyGraph::build(&root)?;
    resolve_order(&mut graph, root)
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! The house model used across graph tests.

    use crate::entity::{Dependency, LocalId, SyncEntity};
    use serde_json::{json, Map, Value};
    use std::sync::Arc;

    #[derive(Debug)]
    pub struct Appliance {
        pub local_id: LocalId,
        pub name: &'static str,
    }

    #[derive(Debug)]
    pub struct Window {
        pub local_id: LocalId,
        pub width: u32,
    }

    #[derive(Debug)]
    pub struct Room {
        pub local_id: LocalId,
        pub name: &'static str,
        pub windows: Vec<Arc<Window>>,
        pub appliance: Option<Arc<Appliance>>,
    }

    #[derive(Debug)]
    pub struct House {
        pub local_id: LocalId,
        pub rooms: Vec<Arc<Room>>,
        pub appliances: Vec<Arc<Appliance>>,
    }

    macro_rules! leaf_identity {
        ($ty:ident) => {
            fn entity_type(&self) -> &'static str {
                stringify!($ty)
            }
            fn local_id(&self) -> &LocalId {
                &self.local_id
            }
            fn remote_id(&self) -> Option<&str> {
                None
            }
        };
    }

    impl SyncEntity for Appliance {
        leaf_identity!(Appliance);

        fn fields(&self) -> Map<String, Value> {
            let mut fields = Map::new();
            fields.insert("name".into(), json!(self.name));
            fields
        }
    }

    impl SyncEntity for Window {
        leaf_identity!(Window);

        fn fields(&self) -> Map<String, Value> {
            let mut fields = Map::new();
            fields.insert("width".into(), json!(self.width));
            fields
        }
    }

    impl SyncEntity for Room {
        leaf_identity!(Room);

        fn dependencies(&self) -> Vec<Dependency> {
            vec![
                Dependency::many(&self.windows),
                Dependency::optional(&self.appliance),
            ]
        }
    }

    impl SyncEntity for House {
        leaf_identity!(House);

        fn dependencies(&self) -> Vec<Dependency> {
            vec![
                Dependency::many(&self.rooms),
                Dependency::many(&self.appliances),
            ]
        }
    }

    /// A house with one laundry room; the washer is shared by the room
    /// and the house's appliance list.
    pub fn house() -> Arc<House> {
        let stove = Arc::new(Appliance {
            local_id: 1u64.into(),
            name: "Stove",
        });
        let washer = Arc::new(Appliance {
            local_id: 2u64.into(),
            name: "Washer",
        });
        let window = Arc::new(Window {
            local_id: 1u64.into(),
            width: 2,
        });
        let laundry = Arc::new(Room {
            local_id: 1u64.into(),
            name: "Laundry Room",
            windows: vec![window],
            appliance: Some(Arc::clone(&washer)),
        });

        Arc::new(House {
            local_id: 1u64.into(),
            rooms: vec![laundry],
            appliances: vec![stove, washer],
        })
    }
}
