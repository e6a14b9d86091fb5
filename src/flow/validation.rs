use super::{FlowDefinition, FlowEdge, FlowNode};
use crate::error::GraphError;
use crate::scheduler;
use ahash::AHashMap;

/// Checks the structural invariants of a workflow: unique node ids, edges that
/// reference existing nodes, and no cycles.
///
/// The editor prevents most of these at authoring time, but graphs may also come
/// from persisted documents that never went through it.
pub fn validate(flow: &FlowDefinition) -> Result<(), GraphError> {
    scheduler::order(&flow.nodes, &flow.edges).map(|_| ())
}

/// Maps each node id to its declaration index, rejecting duplicates.
pub(crate) fn index_nodes(nodes: &[FlowNode]) -> Result<AHashMap<&str, usize>, GraphError> {
    let mut index = AHashMap::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        if index.insert(node.id.as_str(), i).is_some() {
            return Err(GraphError::DuplicateNodeId(node.id.clone()));
        }
    }
    Ok(index)
}

/// Resolves every edge to a `(source, target)` pair of declaration indices,
/// in edge enumeration order.
pub(crate) fn resolve_edges(
    edges: &[FlowEdge],
    index: &AHashMap<&str, usize>,
) -> Result<Vec<(usize, usize)>, GraphError> {
    edges
        .iter()
        .map(|edge| -> Result<(usize, usize), GraphError> {
            let lookup = |id: &str| {
                index
                    .get(id)
                    .copied()
                    .ok_or_else(|| GraphError::DanglingEdge {
                        edge: edge.display_name(),
                        missing_node_id: id.to_string(),
                    })
            };
            Ok((lookup(&edge.source)?, lookup(&edge.target)?))
        })
        .collect()
}
