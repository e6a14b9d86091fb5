//! Runs a workflow: plans the order, executes each node once, and collects
//! outputs and per-node errors without letting one failure stop the others.

use crate::ast::Value;
use crate::config::EngineConfig;
use crate::error::{ConfigError, GraphError};
use crate::executor::NodeContext;
use crate::flow::FlowDefinition;
use crate::scheduler;
use ahash::AHashMap;
use tracing::{debug, error, info, warn};

mod progress;
mod report;

pub use progress::{NodeState, ProgressBus, ProgressEvent};
pub use report::{ExecutionResult, RunReport};

/// Executes workflows. Cheap to share: holds an HTTP client and a progress bus.
#[derive(Debug, Clone)]
pub struct Engine {
    http: reqwest::Client,
    progress: ProgressBus,
}

/// Builder for [`Engine`].
#[derive(Debug, Default)]
pub struct EngineBuilder {
    config: EngineConfig,
    http: Option<reqwest::Client>,
    progress: Option<ProgressBus>,
}

impl EngineBuilder {
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Uses this client instead of one built from the config's timeouts.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Publishes run events on an existing bus, so subscribers can be set up first.
    pub fn with_progress(mut self, bus: ProgressBus) -> Self {
        self.progress = Some(bus);
        self
    }

    pub fn build(self) -> Result<Engine, ConfigError> {
        let http = match self.http {
            Some(client) => client,
            None => self.config.build_http_client()?,
        };
        let progress = self
            .progress
            .unwrap_or_else(|| ProgressBus::new(self.config.progress_capacity));
        Ok(Engine { http, progress })
    }
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// An engine with default configuration.
    pub fn new() -> Result<Self, ConfigError> {
        Self::builder().build()
    }

    pub fn progress(&self) -> &ProgressBus {
        &self.progress
    }

    /// Subscribes to node state events of every subsequent run.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<ProgressEvent> {
        self.progress.subscribe()
    }

    /// Runs every node of `flow` exactly once in dependency order.
    ///
    /// Only structural problems (cycles, dangling edges, duplicate ids) fail the
    /// whole run, and they are found before any node starts. A node that fails is
    /// recorded in [`ExecutionResult::per_node_error`]; its downstream nodes still
    /// run and see [`Value::Absent`] in its place.
    pub async fn run(&self, flow: &FlowDefinition) -> Result<ExecutionResult, GraphError> {
        let plan = match scheduler::plan(flow) {
            Ok(plan) => plan,
            Err(e) => {
                error!(error = %e, "Workflow rejected before execution");
                return Err(e);
            }
        };
        info!(nodes = plan.len(), edges = flow.edges.len(), "Starting workflow run");

        let nodes: AHashMap<&str, _> = flow.nodes.iter().map(|n| (n.id.as_str(), n)).collect();
        let mut outputs: AHashMap<String, Value> = AHashMap::with_capacity(plan.len());
        let mut result = ExecutionResult::new(plan.order().to_vec());

        for node_id in plan.order() {
            let Some(node) = nodes.get(node_id.as_str()) else {
                continue;
            };
            self.progress.publish(ProgressEvent::running(node_id));

            let sources = plan.sources(node_id);
            let inputs: Vec<Value> = sources
                .iter()
                .map(|source| outputs.get(source).cloned().unwrap_or(Value::Absent))
                .collect();

            let ctx = NodeContext {
                node_id,
                inputs: &inputs,
                source_node_ids: sources,
                http: &self.http,
            };

            debug!(node = %node_id, kind = node.kind.type_name(), inputs = inputs.len(), "Executing node");
            match node.kind.execute(&ctx).await {
                Ok(value) => {
                    let output = value.to_json();
                    self.progress
                        .publish(ProgressEvent::succeeded(node_id, output.clone()));
                    result.record_output(node_id, output);
                    outputs.insert(node_id.clone(), value);
                }
                Err(e) => {
                    let message = e.to_string();
                    warn!(node = %node_id, error = %message, "Node failed");
                    self.progress.publish(ProgressEvent::failed(node_id, &message));
                    result.record_error(node_id, message);
                }
            }
        }

        info!(
            succeeded = result.succeeded_count(),
            failed = result.failed_count(),
            "Workflow run finished"
        );
        Ok(result)
    }
}
