//! Sync order resolution.

use super::{DependencyGraph, NodeId};
use crate::entity::SyncEntity;
use crate::error::{GraphError, GraphResult};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::debug;

/// Linearizes the graph under `root` into a dependency-first sync order.
///
/// The graph is walked breadth-first from `root`, recording every node
/// popped from the queue, revisits included. A parent is always popped
/// before the children it enqueues, so the last occurrence of any child
/// comes after the last occurrence of each of its parents. Walking the
/// record backwards and emitting each node the first time it is seen
/// therefore puts every dependency ahead of its dependents, and each
/// shared dependency appears exactly once.
///
/// Nodes are marked visited as they are emitted; the marks are cleared at
/// the start of every call, so resolving the same graph twice yields the
/// same order.
///
/// # Errors
///
/// Returns [`GraphError::UnknownNode`] if `root` is not in the graph.
pub fn resolve_order(
    graph: &mut DependencyGraph,
    root: NodeId,
) -> GraphResult<Vec<Arc<dyn SyncEntity>>> {
    if graph.node(root).is_none() {
        return Err(GraphError::UnknownNode(root));
    }
    graph.clear_visited();

    let mut traversal = Vec::new();
    let mut queue = VecDeque::from([root]);
    while let Some(current) = queue.pop_front() {
        queue.extend(graph.nodes[current.0].deps.iter().copied());
        traversal.push(current);
    }

    let mut order = Vec::with_capacity(graph.len());
    for id in traversal.iter().rev() {
        let node = &mut graph.nodes[id.0];
        if node.visit() {
            order.push(Arc::clone(&node.entity));
        }
    }

    debug!(
        traversed = traversal.len(),
        resolved = order.len(),
        "resolved sync order"
    );
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKey;
    use crate::graph::fixtures::house;
    use crate::graph::sync_order;
    use serde_json::json;

    fn keys(order: &[Arc<dyn SyncEntity>]) -> Vec<String> {
        order.iter().map(|e| e.key().to_string()).collect()
    }

    #[test]
    fn house_resolves_dependencies_first() {
        let order = sync_order(house()).unwrap();

        assert_eq!(order.len(), 5);
        assert_eq!(
            keys(&order),
            vec![
                "Appliance=2",
                "Window=1",
                "Appliance=1",
                "Room=1",
                "House=1"
            ]
        );
        assert_eq!(order[0].field("name"), Some(json!("Washer")));
        assert_eq!(order[1].field("width"), Some(json!(2)));
        assert_eq!(order[2].field("name"), Some(json!("Stove")));
    }

    #[test]
    fn every_edge_points_backwards() {
        let (mut graph, root) = DependencyGraph::build(&(house() as Arc<dyn SyncEntity>)).unwrap();
        let order = resolve_order(&mut graph, root).unwrap();

        let position = |key: &EntityKey| order.iter().position(|e| e.key() == *key).unwrap();
        for (_, node) in graph.iter() {
            let parent = position(&node.entity().key());
            for dep in node.dependencies() {
                let child = position(&graph.node(*dep).unwrap().entity().key());
                assert!(child < parent, "{} must precede {}", child, parent);
            }
        }
        assert!(graph.iter().all(|(_, node)| node.is_visited()));
    }

    #[test]
    fn resolving_twice_is_stable() {
        let (mut graph, root) = DependencyGraph::build(&(house() as Arc<dyn SyncEntity>)).unwrap();
        let first = keys(&resolve_order(&mut graph, root).unwrap());
        let second = keys(&resolve_order(&mut graph, root).unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn subtree_resolution_only_covers_reachable_nodes() {
        let (mut graph, root) = DependencyGraph::build(&(house() as Arc<dyn SyncEntity>)).unwrap();
        let room = graph.node(root).unwrap().dependencies()[0];

        let order = resolve_order(&mut graph, room).unwrap();
        assert_eq!(keys(&order), vec!["Appliance=2", "Window=1", "Room=1"]);
    }

    #[test]
    fn unknown_root_fails() {
        let mut graph = DependencyGraph::new();
        let result = resolve_order(&mut graph, NodeId(3));
        assert!(matches!(result, Err(GraphError::UnknownNode(_))));
    }
}
