use crate::flow::FlowDefinition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The outcome of one workflow run.
///
/// Every node the run reached appears in exactly one of `per_node` (its output)
/// or `per_node_error` (its error message).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    /// Node ids in the order they ran.
    pub order: Vec<String>,
    pub per_node: BTreeMap<String, serde_json::Value>,
    pub per_node_error: BTreeMap<String, String>,
}

impl ExecutionResult {
    pub(crate) fn new(order: Vec<String>) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    pub(crate) fn record_output(&mut self, node_id: &str, output: serde_json::Value) {
        self.per_node_error.remove(node_id);
        self.per_node.insert(node_id.to_string(), output);
    }

    pub(crate) fn record_error(&mut self, node_id: &str, message: String) {
        self.per_node.remove(node_id);
        self.per_node_error.insert(node_id.to_string(), message);
    }

    /// `true` when no node failed.
    pub fn is_success(&self) -> bool {
        self.per_node_error.is_empty()
    }

    pub fn output(&self, node_id: &str) -> Option<&serde_json::Value> {
        self.per_node.get(node_id)
    }

    pub fn error(&self, node_id: &str) -> Option<&str> {
        self.per_node_error.get(node_id).map(String::as_str)
    }

    pub fn succeeded_count(&self) -> usize {
        self.per_node.len()
    }

    pub fn failed_count(&self) -> usize {
        self.per_node_error.len()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Human-readable rendering of a result with node labels, results first, then errors.
pub struct RunReport<'a> {
    pub result: &'a ExecutionResult,
    pub flow: &'a FlowDefinition,
}

impl<'a> RunReport<'a> {
    pub fn new(result: &'a ExecutionResult, flow: &'a FlowDefinition) -> Self {
        Self { result, flow }
    }

    fn label(&self, node_id: &str) -> &'a str {
        self.flow
            .node(node_id)
            .and_then(|n| n.label.as_deref())
            .unwrap_or("Unnamed Node")
    }
}

impl fmt::Display for RunReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Results ({})", self.result.succeeded_count())?;
        for node_id in self.result.order.iter().filter(|id| self.result.per_node.contains_key(*id)) {
            writeln!(f, "  {} ({})  ✓ Success", self.label(node_id), node_id)?;
            let output = &self.result.per_node[node_id];
            let pretty = serde_json::to_string_pretty(output).unwrap_or_else(|_| output.to_string());
            for line in pretty.lines() {
                writeln!(f, "    {}", line)?;
            }
        }

        writeln!(f, "Errors ({})", self.result.failed_count())?;
        for node_id in self
            .result
            .order
            .iter()
            .filter(|id| self.result.per_node_error.contains_key(*id))
        {
            writeln!(
                f,
                "  {} ({})  ✗ {}",
                self.label(node_id),
                node_id,
                self.result.per_node_error[node_id]
            )?;
        }
        Ok(())
    }
}
