use thiserror::Error;

/// Structural problems with a workflow graph. Detected before any node runs
/// and fatal to the whole run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Workflow contains a cycle involving node(s): {}", node_ids.join(", "))]
    CycleDetected { node_ids: Vec<String> },

    #[error("Edge '{edge}' references node '{missing_node_id}', which does not exist")]
    DanglingEdge {
        edge: String,
        missing_node_id: String,
    },

    #[error("Node id '{0}' is declared more than once")]
    DuplicateNodeId(String),
}

/// Errors raised while parsing or evaluating a user expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("Syntax error at position {position}: {message}")]
    Parse { message: String, position: usize },

    #[error("'{0}' is not defined")]
    UnboundName(String),

    #[error("{0}")]
    TypeError(String),
}

/// Errors raised while executing a single node. These are recorded against the
/// node and never abort the run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NodeError {
    #[error("Request node requires a URL")]
    MissingUrl,

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Expression failed: {0}")]
    Expression(#[from] ExpressionError),

    #[error("Type mismatch: expected {expected}, but found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("Unknown node type: '{0}'")]
    UnknownNodeType(String),
}

/// Errors that can occur when converting a custom user format into a `FlowDefinition`.
#[derive(Error, Debug, Clone)]
pub enum ConversionError {
    #[error("Failed to parse workflow JSON: {0}")]
    JsonParseError(String),

    #[error("Node '{node_id}' has an invalid {field}: '{value}'")]
    InvalidField {
        node_id: String,
        field: &'static str,
        value: String,
    },

    #[error("Type mapping target '{0}' is not a known node type")]
    UnknownMappingTarget(String),
}

/// Errors from reading or writing a persisted workflow document.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Could not access '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid workflow document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from loading engine configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}
