//! Dependency-respecting execution order for a workflow graph.
//!
//! Ordering uses Kahn's algorithm. Among nodes that are ready at the same time
//! the one declared first runs first, so the same graph always yields the same order.

use crate::error::GraphError;
use crate::flow::validation::{index_nodes, resolve_edges};
use crate::flow::{FlowDefinition, FlowEdge, FlowNode};
use ahash::AHashMap;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use tracing::debug;

/// The order in which a workflow's nodes run, plus each node's upstream sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    order: Vec<String>,
    sources: AHashMap<String, Vec<String>>,
}

impl ExecutionPlan {
    /// Node ids in execution order.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Source node ids of every edge targeting `node_id`, in edge enumeration order.
    /// Position `i` here is position `i` in the node's `inputs`.
    pub fn sources(&self, node_id: &str) -> &[String] {
        self.sources.get(node_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Validates the workflow and computes its execution plan.
pub fn plan(flow: &FlowDefinition) -> Result<ExecutionPlan, GraphError> {
    let order = order(&flow.nodes, &flow.edges)?;

    let mut sources: AHashMap<String, Vec<String>> = AHashMap::new();
    for edge in &flow.edges {
        sources
            .entry(edge.target.clone())
            .or_default()
            .push(edge.source.clone());
    }

    Ok(ExecutionPlan { order, sources })
}

/// Computes a topological order of `nodes`: for every edge `s -> t`, `s` comes before `t`.
///
/// Fails with [`GraphError::CycleDetected`] naming the nodes caught in a cycle,
/// and with the other [`GraphError`] variants for duplicate ids or dangling edges.
pub fn order(nodes: &[FlowNode], edges: &[FlowEdge]) -> Result<Vec<String>, GraphError> {
    let graph = Graph::build(nodes, edges)?;
    let mut in_degree = graph.in_degree.clone();

    let mut ready: BinaryHeap<Reverse<usize>> = (0..graph.len())
        .filter(|&i| in_degree[i] == 0)
        .map(Reverse)
        .collect();

    let mut sorted = Vec::with_capacity(graph.len());
    while let Some(Reverse(current)) = ready.pop() {
        sorted.push(current);
        for &next in &graph.successors[current] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                ready.push(Reverse(next));
            }
        }
    }

    if sorted.len() < graph.len() {
        return Err(graph.cycle_error(&in_degree));
    }

    debug!(nodes = nodes.len(), edges = edges.len(), "Computed execution order");
    Ok(sorted.into_iter().map(|i| nodes[i].id.clone()).collect())
}

/// Groups nodes into dependency levels: every node's upstream nodes sit in an
/// earlier level, so all nodes of one level could run at the same time.
/// Each level lists its nodes in declaration order.
pub fn levels(nodes: &[FlowNode], edges: &[FlowEdge]) -> Result<Vec<Vec<String>>, GraphError> {
    let graph = Graph::build(nodes, edges)?;
    let mut in_degree = graph.in_degree.clone();

    let mut current: Vec<usize> = (0..graph.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut levels = Vec::new();
    let mut placed = 0;

    while !current.is_empty() {
        placed += current.len();
        let mut next = Vec::new();
        for &node in &current {
            for &successor in &graph.successors[node] {
                in_degree[successor] -= 1;
                if in_degree[successor] == 0 {
                    next.push(successor);
                }
            }
        }
        next.sort_unstable();
        levels.push(current.iter().map(|&i| nodes[i].id.clone()).collect());
        current = next;
    }

    if placed < graph.len() {
        return Err(graph.cycle_error(&in_degree));
    }
    Ok(levels)
}

/// Index-based adjacency view of a workflow.
struct Graph<'a> {
    nodes: &'a [FlowNode],
    successors: Vec<Vec<usize>>,
    in_degree: Vec<usize>,
}

impl<'a> Graph<'a> {
    fn build(nodes: &'a [FlowNode], edges: &[FlowEdge]) -> Result<Self, GraphError> {
        let index = index_nodes(nodes)?;
        let links = resolve_edges(edges, &index)?;

        let mut successors = vec![Vec::new(); nodes.len()];
        let mut in_degree = vec![0; nodes.len()];
        for (source, target) in links {
            successors[source].push(target);
            in_degree[target] += 1;
        }

        Ok(Self {
            nodes,
            successors,
            in_degree,
        })
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Builds the cycle error from the in-degrees left over after Kahn's algorithm.
    ///
    /// Leftover nodes are on a cycle or downstream of one. Nodes that cannot reach
    /// another leftover node are peeled off until only cycle members (and nodes
    /// linking two cycles) remain.
    fn cycle_error(&self, in_degree: &[usize]) -> GraphError {
        let mut remaining: Vec<bool> = in_degree.iter().map(|&d| d > 0).collect();
        loop {
            let mut changed = false;
            for node in 0..self.len() {
                if remaining[node] && !self.successors[node].iter().any(|&s| remaining[s]) {
                    remaining[node] = false;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }

        let node_ids = (0..self.len())
            .filter(|&i| remaining[i])
            .map(|i| self.nodes[i].id.clone())
            .collect();
        GraphError::CycleDetected { node_ids }
    }
}
