//! Property tests for graph resolution and sync runs.

use objsync_core::{sync_order, DependencyGraph, EntityKey, LocalId};
use objsync_engine::{MockRemote, Response, SyncConfig, SyncEngine, SyncStatus};
use objsync_testkit::prelude::*;
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use serde_json::json;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

fn node_key(node: usize) -> EntityKey {
    EntityKey::new(NODE_TYPE, LocalId::from(node as u64))
}

proptest! {
    #[test]
    fn order_is_a_topological_dedup_of_reachable_nodes(dag in dag_strategy(12)) {
        let order = sync_order(dag.root()).unwrap();
        let keys: Vec<EntityKey> = order.iter().map(|e| e.key()).collect();

        let unique: HashSet<_> = keys.iter().cloned().collect();
        prop_assert_eq!(unique.len(), keys.len());

        let expected: HashSet<_> = dag.reachable().into_iter().map(node_key).collect();
        prop_assert_eq!(unique, expected);

        for (position, entity) in order.iter().enumerate() {
            for dep in entity.dependencies() {
                for child in dep.entities() {
                    let at = keys.iter().position(|k| *k == child.key()).unwrap();
                    prop_assert!(at < position);
                }
            }
        }
        prop_assert_eq!(keys.last(), Some(&node_key(0)));
    }

    #[test]
    fn graph_has_one_node_per_identity(dag in dag_strategy(12)) {
        let (graph, root) = DependencyGraph::build(&dag.root()).unwrap();
        prop_assert_eq!(graph.len(), dag.reachable().len());
        prop_assert_eq!(graph.lookup(&node_key(0)), Some(root));

        for (_, node) in graph.iter() {
            let deps: BTreeSet<_> = node.dependencies().iter().collect();
            prop_assert_eq!(deps.len(), node.dependencies().len());
        }
    }

    #[test]
    fn resolution_is_stable(dag in dag_strategy(12)) {
        let root = dag.root();
        let first: Vec<_> = sync_order(Arc::clone(&root)).unwrap().iter().map(|e| e.key()).collect();
        let second: Vec<_> = sync_order(root).unwrap().iter().map(|e| e.key()).collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn run_sends_each_entity_once(dag in dag_strategy(10)) {
        let remote = MockRemote::new();
        remote.set_send_response("/Node", Response::ok(json!("n-1")));
        let backend = Arc::new(MockBackend::generic(&[NODE_TYPE], Arc::clone(&remote)));
        let engine = SyncEngine::new(backend, SyncConfig::default());

        let mut run = engine.run(dag.root()).unwrap();
        let terminal: Vec<_> = run.by_ref().filter(|r| r.status.is_terminal()).collect();

        let reachable = dag.reachable().len();
        prop_assert_eq!(terminal.len(), reachable);
        prop_assert!(terminal.iter().all(|r| r.status == SyncStatus::Completed));
        prop_assert_eq!(remote.sent_to("/Node").len(), reachable);
        prop_assert_eq!(run.stats().completed, reachable);
    }
}

#[test]
fn children_reference_ids_from_the_same_run() {
    let leaf = GenericEntity::new(NODE_TYPE, 2u64).shared();
    let root = GenericEntity::new(NODE_TYPE, 1u64).with_child(leaf).shared();

    let remote = MockRemote::new();
    remote.set_send_response("/Node", Response::ok(json!("n-7")));
    let backend = Arc::new(MockBackend::generic(&[NODE_TYPE], Arc::clone(&remote)));
    let engine = SyncEngine::new(backend, SyncConfig::default());

    let events: Vec<_> = engine.run(root).unwrap().collect();
    assert_eq!(events.len(), 6);

    let sent = remote.sent_to("/Node");
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0]["children"], json!([]));
    assert_eq!(sent[1]["children"], json!(["n-7"]));
}

#[test]
fn random_bills_sync_against_a_seeded_world() {
    let mut rng = StdRng::seed_from_u64(7);
    let world = TallyWorld::seeded();
    let service = world.service();

    for id in 1..=5 {
        let bill = random_bill(&mut rng, id);
        let results: Vec<_> = service
            .sync(&bill, objsync_tally::BACKEND_NAME)
            .unwrap()
            .filter(|r| r.status.is_terminal())
            .collect();

        assert!(results.iter().all(|r| r.is_completed()), "{results:?}");
        let root = results.last().unwrap();
        assert_eq!(root.entity.entity_type, "VendorBill");
        assert!(root.remote_id.is_some());
    }

    assert_eq!(world.backend.maps().vendor_bill.len(), 5);
    assert_eq!(world.backend.maps().vendor.len(), 1);
}
