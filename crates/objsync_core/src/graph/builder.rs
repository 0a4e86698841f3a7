//! Graph construction.

use super::{DependencyGraph, NodeId};
use crate::entity::{EntityKey, SyncEntity};
use crate::error::{GraphError, GraphResult};
use std::sync::Arc;
use tracing::debug;

/// Adds `root` and everything it depends on to `graph`.
///
/// The graph's key index is the identity cache: if an entity with the
/// same [`EntityKey`] is already registered its node is returned as is,
/// otherwise a node is registered *before* recursing into the entity's
/// dependencies. Dependencies are visited in declaration order and each
/// edge is added at most once.
///
/// Calling this repeatedly with the same graph merges the new tree into
/// the existing nodes.
///
/// # Errors
///
/// Returns [`GraphError::Cycle`] if an entity transitively depends on an
/// entity that is still being built. The graph may then hold a partial
/// subtree and should be discarded.
pub fn build_graph(root: &Arc<dyn SyncEntity>, graph: &mut DependencyGraph) -> GraphResult<NodeId> {
    GraphBuilder {
        graph,
        path: Vec::new(),
    }
    .visit(root)
}

struct GraphBuilder<'g> {
    graph: &'g mut DependencyGraph,
    /// Keys of the entities currently being built, outermost first.
    path: Vec<EntityKey>,
}

impl GraphBuilder<'_> {
    fn visit(&mut self, entity: &Arc<dyn SyncEntity>) -> GraphResult<NodeId> {
        let key = entity.key();

        // In-progress nodes are already in the index, so this check comes first.
        if let Some(start) = self.path.iter().position(|k| *k == key) {
            let mut path = self.path[start..].to_vec();
            path.push(key.clone());
            return Err(GraphError::Cycle { key, path });
        }

        if let Some(id) = self.graph.lookup(&key) {
            debug!(entity = %key, "reusing graph node");
            return Ok(id);
        }

        let id = self.graph.insert(Arc::clone(entity));
        debug!(entity = %key, node = %id, "added graph node");

        self.path.push(key);
        for dependency in entity.dependencies() {
            for child in dependency.entities() {
                let child_id = self.visit(child)?;
                self.graph.add_edge(id, child_id);
            }
        }
        self.path.pop();

        Ok(id)
    }
}
