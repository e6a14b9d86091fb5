//! Node executors: one per node type, each turning a node's configuration and
//! upstream inputs into an output value.

use crate::ast::Value;
use crate::error::NodeError;
use crate::flow::NodeKind;
use std::future::Future;

mod filter;
mod headers;
mod request;
mod transform;

pub use headers::{merge_headers, parse_headers};

/// Everything a node sees while it runs.
#[derive(Debug, Clone, Copy)]
pub struct NodeContext<'a> {
    pub node_id: &'a str,
    /// Upstream outputs in edge enumeration order. A failed or missing upstream
    /// output is [`Value::Absent`].
    pub inputs: &'a [Value],
    /// Source node id of each input, at the same positions as `inputs`.
    pub source_node_ids: &'a [String],
    pub http: &'a reqwest::Client,
}

impl<'a> NodeContext<'a> {
    /// The first input, or `Absent` when the node has no upstream edge.
    pub fn first_input(&self) -> Value {
        self.inputs.first().cloned().unwrap_or(Value::Absent)
    }
}

/// The capability every node configuration implements.
pub trait NodeExecutor: Send + Sync {
    fn execute(
        &self,
        ctx: &NodeContext<'_>,
    ) -> impl Future<Output = Result<Value, NodeError>> + Send;
}

impl NodeKind {
    /// Runs the executor that matches this node's type.
    pub async fn execute(&self, ctx: &NodeContext<'_>) -> Result<Value, NodeError> {
        match self {
            NodeKind::Request(config) => config.execute(ctx).await,
            NodeKind::Transform(config) => config.execute(ctx).await,
            NodeKind::Filter(config) => config.execute(ctx).await,
            NodeKind::Unknown { type_name, .. } => {
                Err(NodeError::UnknownNodeType(type_name.clone()))
            }
        }
    }
}
