use serde::Serialize;
use tokio::sync::broadcast;

/// Lifecycle state of a node within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeState {
    Running,
    Succeeded,
    Failed,
}

/// A state change of one node, published in execution order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub node_id: String,
    pub state: NodeState,
    /// The output for `Succeeded`, the error message for `Failed`, nothing for `Running`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

impl ProgressEvent {
    pub fn running(node_id: &str) -> Self {
        Self {
            node_id: node_id.to_string(),
            state: NodeState::Running,
            payload: None,
        }
    }

    pub fn succeeded(node_id: &str, output: serde_json::Value) -> Self {
        Self {
            node_id: node_id.to_string(),
            state: NodeState::Succeeded,
            payload: Some(output),
        }
    }

    pub fn failed(node_id: &str, message: &str) -> Self {
        Self {
            node_id: node_id.to_string(),
            state: NodeState::Failed,
            payload: Some(serde_json::Value::String(message.to_string())),
        }
    }
}

/// Progress event bus using a tokio broadcast channel.
/// All subscribers receive all events.
#[derive(Debug, Clone)]
pub struct ProgressBus {
    tx: broadcast::Sender<ProgressEvent>,
}

impl ProgressBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publishes without waiting. Never fails, even with no subscribers.
    pub fn publish(&self, event: ProgressEvent) {
        // Ignore error if no receivers
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.tx.subscribe()
    }
}

impl Default for ProgressBus {
    fn default() -> Self {
        Self::new(256)
    }
}
