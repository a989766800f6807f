//! Property-based tests
//!
//! Invariants that should hold for ALL edit scripts:
//! - an added triple is visible through contains, inverse, reachable, and
//!   reached_nodes; an un-added triple through none of them
//! - adding is idempotent
//! - reachable agrees between the fast-merge and plain representations
//! - succ/pred stay mirror images under arbitrary edge edits, and the
//!   has-any-successor cache tracks out-degree exactly
//! - duplicate reproduces the node set and edge set

use std::collections::HashSet;

use proptest::prelude::*;

use pathgraph_core::{LocalPathEdges, SlowSparseNumberedGraph, SparseNumberedEdgeManager};

const FACTS: u32 = 6;
const BLOCKS: u32 = 6;
const NODES: u32 = 10;

fn triple() -> impl Strategy<Value = (u32, u32, u32)> {
    (0..FACTS, 0..BLOCKS, 0..FACTS)
}

fn script() -> impl Strategy<Value = Vec<(u32, u32, u32)>> {
    prop::collection::vec(triple(), 0..48)
}

fn build(fast_merge: bool, script: &[(u32, u32, u32)]) -> LocalPathEdges {
    let mut edges = LocalPathEdges::new(fast_merge);
    for &(i, n, j) in script {
        edges.add_path_edge(i, n, j);
    }
    edges
}

proptest! {
    #[test]
    fn prop_added_triples_are_visible_everywhere(script in script(), fast_merge in any::<bool>()) {
        let edges = build(fast_merge, &script);
        let added: HashSet<(u32, u32, u32)> = script.iter().copied().collect();

        for i in 0..FACTS {
            for n in 0..BLOCKS {
                for j in 0..FACTS {
                    let expected = added.contains(&(i, n, j));
                    prop_assert_eq!(edges.contains(i, n, j), expected);
                    if expected {
                        let inv = edges.inverse(n, j).expect("inverse must report added edge");
                        prop_assert!(inv.contains(i));
                        prop_assert!(edges.reachable(n, i).contains(j));
                        prop_assert!(edges.reached_nodes().contains(n));
                        prop_assert!(edges.reachable_from_any(n).contains(j));
                    }
                }
            }
        }
    }

    #[test]
    fn prop_inverse_reports_exactly_the_recorded_facts(script in script(), fast_merge in any::<bool>()) {
        let edges = build(fast_merge, &script);
        let added: HashSet<(u32, u32, u32)> = script.iter().copied().collect();

        for n in 0..BLOCKS {
            for j in 0..FACTS {
                let expected: HashSet<u32> = (0..FACTS)
                    .filter(|&i| added.contains(&(i, n, j)))
                    .collect();
                let actual: HashSet<u32> = edges
                    .inverse(n, j)
                    .map(|s| s.iter().collect())
                    .unwrap_or_default();
                prop_assert_eq!(actual, expected);
            }
        }
    }

    #[test]
    fn prop_double_add_indistinguishable_from_single(script in script()) {
        let once = build(true, &script);
        let doubled: Vec<_> = script.iter().flat_map(|&t| [t, t]).collect();
        let twice = build(true, &doubled);

        for n in 0..BLOCKS {
            prop_assert!(once.reachable_from_any(n).same_value(&twice.reachable_from_any(n)));
            for d in 0..FACTS {
                prop_assert!(once.reachable(n, d).same_value(&twice.reachable(n, d)));
                prop_assert_eq!(once.inverse(n, d), twice.inverse(n, d));
            }
        }
    }

    #[test]
    fn prop_fast_merge_equivalence(script in script()) {
        let slow = build(false, &script);
        let fast = build(true, &script);

        for n in 0..BLOCKS {
            for d1 in 0..FACTS {
                prop_assert!(
                    slow.reachable(n, d1).same_value(&fast.reachable(n, d1)),
                    "representations disagree at n={} d1={}", n, d1
                );
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum EdgeOp {
    Add(u32, u32),
    Remove(u32, u32),
    RemoveOutgoing(u32),
    RemoveIncoming(u32),
    RemoveIncident(u32),
}

fn edge_op() -> impl Strategy<Value = EdgeOp> {
    prop_oneof![
        4 => (0..NODES, 0..NODES).prop_map(|(x, y)| EdgeOp::Add(x, y)),
        2 => (0..NODES, 0..NODES).prop_map(|(x, y)| EdgeOp::Remove(x, y)),
        1 => (0..NODES).prop_map(EdgeOp::RemoveOutgoing),
        1 => (0..NODES).prop_map(EdgeOp::RemoveIncoming),
        1 => (0..NODES).prop_map(EdgeOp::RemoveIncident),
    ]
}

proptest! {
    #[test]
    fn prop_edge_manager_matches_set_model(ops in prop::collection::vec(edge_op(), 0..64)) {
        let mut manager = SparseNumberedEdgeManager::with_normal_case(4);
        let mut model: HashSet<(u32, u32)> = HashSet::new();

        for op in ops {
            match op {
                EdgeOp::Add(x, y) => {
                    manager.add_edge(x, y);
                    model.insert((x, y));
                }
                EdgeOp::Remove(x, y) => {
                    manager.remove_edge(x, y);
                    model.remove(&(x, y));
                }
                EdgeOp::RemoveOutgoing(x) => {
                    manager.remove_outgoing_edges(x);
                    model.retain(|&(a, _)| a != x);
                }
                EdgeOp::RemoveIncoming(y) => {
                    manager.remove_incoming_edges(y);
                    model.retain(|&(_, b)| b != y);
                }
                EdgeOp::RemoveIncident(n) => {
                    manager.remove_all_incident_edges(n);
                    model.retain(|&(a, b)| a != n && b != n);
                }
            }

            manager.audit().expect("succ/pred symmetry must survive every edit");

            for x in 0..NODES {
                for y in 0..NODES {
                    prop_assert_eq!(manager.has_edge(x, y), model.contains(&(x, y)));
                }
                let out_degree = model.iter().filter(|&&(a, _)| a == x).count();
                let in_degree = model.iter().filter(|&&(_, b)| b == x).count();
                prop_assert_eq!(manager.succ_node_count(x), out_degree);
                prop_assert_eq!(manager.pred_node_count(x), in_degree);
                prop_assert_eq!(manager.has_any_successor(x), out_degree > 0);
            }
        }
    }

    #[test]
    fn prop_duplicate_preserves_nodes_and_edges(
        edges in prop::collection::hash_set((0..NODES, 0..NODES), 0..32)
    ) {
        let mut g: SlowSparseNumberedGraph<u32> = SlowSparseNumberedGraph::new();
        for n in 0..NODES {
            g.add_node(n);
        }
        for &(x, y) in &edges {
            g.add_edge(&x, &y).expect("endpoints were registered");
        }

        let copy = SlowSparseNumberedGraph::duplicate(&g).expect("duplicate of a well-formed graph");
        prop_assert_eq!(copy.node_count(), g.node_count());
        for x in 0..NODES {
            prop_assert!(copy.contains_node(&x));
            for y in 0..NODES {
                prop_assert_eq!(copy.has_edge(&x, &y), edges.contains(&(x, y)));
            }
        }
    }
}
