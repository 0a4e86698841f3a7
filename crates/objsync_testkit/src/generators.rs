//! Property-based test generators using proptest.
//!
//! Provides strategies for random acyclic entity graphs.

use crate::fixtures::GenericEntity;
use objsync_core::SyncEntity;
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Type name of every generated node.
pub const NODE_TYPE: &str = "Node";

/// A random DAG over nodes `0..size`.
///
/// Edges only point from a node to a higher-numbered one, so the graph
/// is acyclic by construction. Node `0` is the root.
#[derive(Debug, Clone)]
pub struct EntityDag {
    /// Children of each node, in declaration order. May repeat.
    pub edges: Vec<Vec<usize>>,
}

impl EntityDag {
    /// Returns the number of nodes.
    pub fn size(&self) -> usize {
        self.edges.len()
    }

    /// Returns the nodes reachable from the root, root included.
    pub fn reachable(&self) -> BTreeSet<usize> {
        let mut seen = BTreeSet::new();
        let mut stack = vec![0];
        while let Some(node) = stack.pop() {
            if seen.insert(node) {
                stack.extend(&self.edges[node]);
            }
        }
        seen
    }

    /// Builds the entities, one per node.
    ///
    /// Some edges share the child's `Arc`, others hold a distinct copy with
    /// the same identity.
    pub fn entities(&self) -> Vec<Arc<GenericEntity>> {
        let mut built: Vec<Option<Arc<GenericEntity>>> = vec![None; self.size()];
        for node in (0..self.size()).rev() {
            let mut entity =
                GenericEntity::new(NODE_TYPE, node as u64).with_field("depth", node as u64);
            for &child in &self.edges[node] {
                if let Some(shared) = &built[child] {
                    let child = if (node + child) % 2 == 0 {
                        Arc::clone(shared)
                    } else {
                        Arc::new(GenericEntity::clone(shared))
                    };
                    entity = entity.with_child(child);
                }
            }
            built[node] = Some(entity.shared());
        }
        built.into_iter().flatten().collect()
    }

    /// Builds the root entity.
    pub fn root(&self) -> Arc<dyn SyncEntity> {
        let entities = self.entities();
        Arc::clone(&entities[0]) as Arc<dyn SyncEntity>
    }
}

/// Strategy for DAGs of 1 to `max_size` nodes.
pub fn dag_strategy(max_size: usize) -> impl Strategy<Value = EntityDag> {
    (1..=max_size.max(1)).prop_flat_map(|size| {
        let nodes: Vec<_> = (0..size)
            .map(|node| {
                let later = size - node - 1;
                if later == 0 {
                    Just(Vec::new()).boxed()
                } else {
                    prop::collection::vec(node + 1..size, 0..=later.min(4)).boxed()
                }
            })
            .collect();
        nodes.prop_map(|edges| EntityDag { edges })
    })
}
