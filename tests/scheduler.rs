//! Tests for execution ordering, dependency levels and structural validation.
mod common;
use common::*;
use nagare::prelude::*;
use nagare::scheduler::{levels, order, plan};

fn position(order: &[String], id: &str) -> usize {
    order.iter().position(|n| n == id).expect("node missing from order")
}

/// Every edge's source must come before its target.
fn assert_respects_edges(order: &[String], flow: &FlowDefinition) {
    assert_eq!(order.len(), flow.nodes.len());
    for edge in &flow.edges {
        assert!(
            position(order, &edge.source) < position(order, &edge.target),
            "edge {} -> {} violated in {:?}",
            edge.source,
            edge.target,
            order
        );
    }
}

#[test]
fn test_linear_chain_order() {
    let flow = constant_flow(&["C", "B", "A"], &[("A", "B"), ("B", "C")]);
    let order = order(&flow.nodes, &flow.edges).unwrap();
    assert_eq!(order, vec!["A", "B", "C"]);
}

#[test]
fn test_diamond_order_is_valid() {
    let flow = constant_flow(
        &["sink", "left", "right", "root"],
        &[("root", "left"), ("root", "right"), ("left", "sink"), ("right", "sink")],
    );
    let order = order(&flow.nodes, &flow.edges).unwrap();
    assert_respects_edges(&order, &flow);
    assert_eq!(order.first().map(String::as_str), Some("root"));
    assert_eq!(order.last().map(String::as_str), Some("sink"));
}

#[test]
fn test_ready_nodes_run_in_declaration_order() {
    let flow = constant_flow(&["z", "m", "a"], &[]);
    assert_eq!(order(&flow.nodes, &flow.edges).unwrap(), vec!["z", "m", "a"]);

    // Both children become ready together, so declaration order decides.
    let flow = constant_flow(&["a1", "root", "b2"], &[("root", "a1"), ("root", "b2")]);
    assert_eq!(
        order(&flow.nodes, &flow.edges).unwrap(),
        vec!["root", "a1", "b2"]
    );
}

#[test]
fn test_order_is_deterministic() {
    let flow = constant_flow(
        &["e", "d", "c", "b", "a"],
        &[("a", "c"), ("b", "c"), ("c", "d"), ("a", "e")],
    );
    let first = order(&flow.nodes, &flow.edges).unwrap();
    for _ in 0..10 {
        assert_eq!(order(&flow.nodes, &flow.edges).unwrap(), first);
    }
    assert_respects_edges(&first, &flow);
}

#[test]
fn test_parallel_edges_are_allowed() {
    let flow = constant_flow(&["A", "B"], &[("A", "B"), ("A", "B")]);
    assert_eq!(order(&flow.nodes, &flow.edges).unwrap(), vec!["A", "B"]);
}

#[test]
fn test_empty_graph() {
    let flow = FlowDefinition::default();
    assert!(order(&flow.nodes, &flow.edges).unwrap().is_empty());
    assert!(levels(&flow.nodes, &flow.edges).unwrap().is_empty());
}

#[test]
fn test_cycle_detected_names_cycle_members() {
    let flow = constant_flow(
        &["start", "a", "b", "c", "after"],
        &[("start", "a"), ("a", "b"), ("b", "c"), ("c", "a"), ("c", "after")],
    );
    let err = order(&flow.nodes, &flow.edges).unwrap_err();
    assert_eq!(
        err,
        GraphError::CycleDetected {
            node_ids: vec!["a".to_string(), "b".to_string(), "c".to_string()]
        }
    );
    assert!(err.to_string().contains("a, b, c"));
}

#[test]
fn test_self_loop_is_a_cycle() {
    let flow = constant_flow(&["A"], &[("A", "A")]);
    match order(&flow.nodes, &flow.edges) {
        Err(GraphError::CycleDetected { node_ids }) => assert_eq!(node_ids, vec!["A"]),
        other => panic!("expected cycle, got {:?}", other),
    }
}

#[test]
fn test_dangling_edge() {
    let mut flow = constant_flow(&["A"], &[]);
    flow.edges.push(FlowEdge::new("", "A", "ghost"));
    let err = order(&flow.nodes, &flow.edges).unwrap_err();
    assert_eq!(
        err,
        GraphError::DanglingEdge {
            edge: "A->ghost".to_string(),
            missing_node_id: "ghost".to_string()
        }
    );
}

#[test]
fn test_duplicate_node_id() {
    let flow = constant_flow(&["A", "B", "A"], &[]);
    assert_eq!(
        validate(&flow),
        Err(GraphError::DuplicateNodeId("A".to_string()))
    );
}

#[test]
fn test_levels_group_by_depth() {
    let flow = constant_flow(
        &["d", "c", "b", "a"],
        &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
    );
    let levels = levels(&flow.nodes, &flow.edges).unwrap();
    assert_eq!(
        levels,
        vec![vec!["a".to_string()], vec!["c".to_string(), "b".to_string()], vec!["d".to_string()]]
    );
}

#[test]
fn test_levels_detect_cycles() {
    let flow = constant_flow(&["x", "y"], &[("x", "y"), ("y", "x")]);
    assert!(matches!(
        levels(&flow.nodes, &flow.edges),
        Err(GraphError::CycleDetected { .. })
    ));
}

#[test]
fn test_plan_records_sources_in_edge_order() {
    let flow = constant_flow(&["A", "B", "T"], &[("B", "T"), ("A", "T")]);
    let plan = plan(&flow).unwrap();
    assert_eq!(plan.len(), 3);
    assert_eq!(plan.sources("T"), ["B".to_string(), "A".to_string()]);
    assert!(plan.sources("A").is_empty());
}

