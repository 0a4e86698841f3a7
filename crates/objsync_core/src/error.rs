//! Error types for graph construction and resolution.

use crate::entity::EntityKey;
use crate::graph::NodeId;
use thiserror::Error;

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors that can occur while building or resolving a dependency graph.
#[derive(Debug, Error)]
pub enum GraphError {
    /// An entity depends on itself, directly or transitively.
    #[error("dependency cycle at {key}: {}", format_path(.path))]
    Cycle {
        /// The entity that closed the cycle.
        key: EntityKey,
        /// The cycle, starting and ending at `key`.
        path: Vec<EntityKey>,
    },

    /// A node id does not belong to the graph.
    #[error("unknown graph node {0}")]
    UnknownNode(NodeId),
}

fn format_path(path: &[EntityKey]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_display_lists_path() {
        let a = EntityKey::new("Account", 1u64);
        let b = EntityKey::new("Department", 2u64);
        let err = GraphError::Cycle {
            key: a.clone(),
            path: vec![a.clone(), b, a],
        };
        assert_eq!(
            err.to_string(),
            "dependency cycle at Account=1: Account=1 -> Department=2 -> Account=1"
        );
    }
}
