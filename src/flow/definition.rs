use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The complete, canonical definition of a workflow, ready for execution.
/// This is the target structure for any custom data model conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowDefinition {
    pub nodes: Vec<FlowNode>,
    #[serde(default)]
    pub edges: Vec<FlowEdge>,
}

impl FlowDefinition {
    pub fn new(nodes: Vec<FlowNode>, edges: Vec<FlowEdge>) -> Self {
        Self { nodes, edges }
    }

    pub fn node(&self, id: &str) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// A single unit of work in the workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NodeRecord", into = "NodeRecord")]
pub struct FlowNode {
    pub id: String,
    /// Display name shown by the editor and the results view.
    pub label: Option<String>,
    pub kind: NodeKind,
}

impl FlowNode {
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            label: None,
            kind,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The label if one is set, otherwise the id.
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

/// The closed set of node types, each carrying its own configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Request(RequestConfig),
    Transform(TransformConfig),
    Filter(FilterConfig),
    /// A node whose type the engine does not implement. Its configuration is
    /// kept verbatim so documents round-trip; running it fails for that node only.
    Unknown {
        type_name: String,
        config: serde_json::Value,
    },
}

impl NodeKind {
    pub fn type_name(&self) -> &str {
        match self {
            NodeKind::Request(_) => NodeType::Request.as_str(),
            NodeKind::Transform(_) => NodeType::Transform.as_str(),
            NodeKind::Filter(_) => NodeType::Filter.as_str(),
            NodeKind::Unknown { type_name, .. } => type_name,
        }
    }
}

/// Names of the node types the engine implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Request,
    Transform,
    Filter,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Request => "request",
            NodeType::Transform => "transform",
            NodeType::Filter => "filter",
        }
    }

    /// Resolves a canonical or editor type name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "request" | "http" | "httpNode" => Some(NodeType::Request),
            "transform" | "transformNode" => Some(NodeType::Transform),
            "filter" | "filterNode" => Some(NodeType::Filter),
            _ => None,
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration of a `request` node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestConfig {
    #[serde(default)]
    pub method: HttpMethod,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub headers: Headers,
    /// Config keys the engine does not interpret, kept so documents round-trip.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RequestConfig {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }

    /// Parses a method name, ignoring case.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "DELETE" => Some(HttpMethod::Delete),
            "PATCH" => Some(HttpMethod::Patch),
            _ => None,
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Patch => reqwest::Method::PATCH,
        }
    }
}

/// User headers, either as free text (a JSON object or `key: value` lines) or a mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Headers {
    Text(String),
    Map(BTreeMap<String, String>),
}

impl Default for Headers {
    fn default() -> Self {
        Headers::Text(String::new())
    }
}

/// Configuration of a `transform` node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformConfig {
    #[serde(default)]
    pub expression: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TransformConfig {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            ..Self::default()
        }
    }
}

/// Configuration of a `filter` node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfig {
    #[serde(default)]
    pub mode: FilterMode,
    /// Per-element condition, used in `array` mode.
    #[serde(default)]
    pub condition: String,
    /// Fields to retain, used in `object` mode.
    #[serde(default)]
    pub keep_fields: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl FilterConfig {
    /// An `array` mode filter keeping items for which `condition` is truthy.
    pub fn array(condition: impl Into<String>) -> Self {
        Self {
            condition: condition.into(),
            ..Self::default()
        }
    }

    /// An `object` mode filter keeping only `fields`.
    pub fn object<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mode: FilterMode::Object,
            keep_fields: fields.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    Array,
    Object,
}

impl FilterMode {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "array" => Some(FilterMode::Array),
            "object" => Some(FilterMode::Object),
            _ => None,
        }
    }
}

/// Defines a dependency between two nodes: the output of `source` feeds `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowEdge {
    #[serde(default)]
    pub id: String,
    pub source: String,
    pub target: String,
}

impl FlowEdge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }

    /// Name used in diagnostics. Falls back to `source->target` when the id is empty.
    pub fn display_name(&self) -> String {
        if self.id.is_empty() {
            format!("{}->{}", self.source, self.target)
        } else {
            self.id.clone()
        }
    }
}

/// Serialized shape of a node: `{ id, type, label?, config }`.
#[derive(Serialize, Deserialize)]
struct NodeRecord {
    id: String,
    #[serde(rename = "type")]
    node_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default)]
    config: serde_json::Value,
}

/// Treats a missing config as an empty one so every field falls back to its default.
fn config_or_empty(config: serde_json::Value) -> serde_json::Value {
    if config.is_null() {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        config
    }
}

impl TryFrom<NodeRecord> for FlowNode {
    type Error = serde_json::Error;

    fn try_from(record: NodeRecord) -> Result<Self, Self::Error> {
        let kind = match NodeType::from_name(&record.node_type) {
            Some(NodeType::Request) => {
                NodeKind::Request(serde_json::from_value(config_or_empty(record.config))?)
            }
            Some(NodeType::Transform) => {
                NodeKind::Transform(serde_json::from_value(config_or_empty(record.config))?)
            }
            Some(NodeType::Filter) => {
                NodeKind::Filter(serde_json::from_value(config_or_empty(record.config))?)
            }
            None => NodeKind::Unknown {
                type_name: record.node_type,
                config: record.config,
            },
        };
        Ok(FlowNode {
            id: record.id,
            label: record.label,
            kind,
        })
    }
}

impl From<FlowNode> for NodeRecord {
    fn from(node: FlowNode) -> Self {
        // Serializing plain config structs into a JSON value cannot fail.
        let to_value = |config: serde_json::Result<serde_json::Value>| {
            config.unwrap_or(serde_json::Value::Null)
        };
        let (node_type, config) = match node.kind {
            NodeKind::Request(c) => ("request".to_string(), to_value(serde_json::to_value(c))),
            NodeKind::Transform(c) => ("transform".to_string(), to_value(serde_json::to_value(c))),
            NodeKind::Filter(c) => ("filter".to_string(), to_value(serde_json::to_value(c))),
            NodeKind::Unknown { type_name, config } => (type_name, config),
        };
        NodeRecord {
            id: node.id,
            node_type,
            label: node.label,
            config,
        }
    }
}
