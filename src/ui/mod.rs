//! Conversion from the visual editor's saved document into a [`FlowDefinition`].

mod types;

pub use types::{FieldList, UiEdge, UiNode, UiNodeData, UiWorkflow};

use crate::error::ConversionError;
use crate::flow::{
    FilterConfig, FilterMode, FlowDefinition, FlowEdge, FlowNode, HttpMethod, IntoFlow, NodeKind,
    NodeType, RequestConfig, TransformConfig,
};
use ahash::AHashMap;
use tracing::debug;

impl UiWorkflow {
    pub fn from_json(json: &str) -> Result<Self, ConversionError> {
        serde_json::from_str(json).map_err(|e| ConversionError::JsonParseError(e.to_string()))
    }
}

impl IntoFlow for UiWorkflow {
    fn into_flow(self) -> Result<FlowDefinition, ConversionError> {
        FlowConverter::new().convert(self)
    }
}

/// Turns editor documents into workflow definitions.
///
/// Canonical (`request`, `transform`, `filter`) and editor (`httpNode`,
/// `transformNode`, `filterNode`) type names are always understood. Other names
/// can be mapped onto a canonical type with [`FlowConverter::with_type_mapping`].
#[derive(Debug, Clone, Default)]
pub struct FlowConverter {
    type_mapping: AHashMap<String, NodeType>,
}

impl FlowConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treats nodes of type `user_name` as `canonical_name` nodes.
    pub fn with_type_mapping(
        mut self,
        user_name: impl Into<String>,
        canonical_name: &str,
    ) -> Result<Self, ConversionError> {
        let node_type = NodeType::from_name(canonical_name)
            .ok_or_else(|| ConversionError::UnknownMappingTarget(canonical_name.to_string()))?;
        self.type_mapping.insert(user_name.into(), node_type);
        Ok(self)
    }

    pub fn convert(&self, workflow: UiWorkflow) -> Result<FlowDefinition, ConversionError> {
        let nodes = workflow
            .nodes
            .into_iter()
            .map(|node| self.convert_node(node))
            .collect::<Result<Vec<_>, _>>()?;
        let edges = workflow
            .edges
            .into_iter()
            .map(|edge| FlowEdge::new(edge.id, edge.source, edge.target))
            .collect();

        debug!(nodes = nodes.len(), "Converted editor workflow");
        Ok(FlowDefinition::new(nodes, edges))
    }

    fn resolve_type(&self, name: &str) -> Option<NodeType> {
        self.type_mapping
            .get(name)
            .copied()
            .or_else(|| NodeType::from_name(name))
    }

    fn convert_node(&self, node: UiNode) -> Result<FlowNode, ConversionError> {
        let Some(node_type) = self.resolve_type(&node.node_type) else {
            let label = node
                .data
                .get("label")
                .and_then(|l| l.as_str())
                .map(str::to_string);
            return Ok(FlowNode {
                id: node.id,
                label,
                kind: NodeKind::Unknown {
                    type_name: node.node_type,
                    config: node.data,
                },
            });
        };

        let data: UiNodeData = if node.data.is_null() {
            UiNodeData::default()
        } else {
            serde_json::from_value(node.data).map_err(|e| {
                ConversionError::JsonParseError(format!("node '{}': {}", node.id, e))
            })?
        };

        let kind = match node_type {
            NodeType::Request => NodeKind::Request(
                RequestConfig::new(
                    parse_method(&node.id, data.method.as_deref())?,
                    data.url.unwrap_or_default(),
                )
                .with_headers(data.headers.unwrap_or_default()),
            ),
            NodeType::Transform => {
                NodeKind::Transform(TransformConfig::new(data.expression.unwrap_or_default()))
            }
            NodeType::Filter => NodeKind::Filter(FilterConfig {
                mode: parse_mode(&node.id, data.mode.as_deref())?,
                condition: data.condition.unwrap_or_default(),
                keep_fields: data.fields.map(|f| f.names()).unwrap_or_default(),
                ..FilterConfig::default()
            }),
        };

        Ok(FlowNode {
            id: node.id,
            label: data.label,
            kind,
        })
    }
}

fn parse_method(node_id: &str, method: Option<&str>) -> Result<HttpMethod, ConversionError> {
    match method.map(str::trim) {
        None | Some("") => Ok(HttpMethod::Get),
        Some(name) => HttpMethod::parse(name).ok_or_else(|| ConversionError::InvalidField {
            node_id: node_id.to_string(),
            field: "method",
            value: name.to_string(),
        }),
    }
}

fn parse_mode(node_id: &str, mode: Option<&str>) -> Result<FilterMode, ConversionError> {
    match mode.map(str::trim) {
        None | Some("") => Ok(FilterMode::Array),
        Some(name) => FilterMode::parse(name).ok_or_else(|| ConversionError::InvalidField {
            node_id: node_id.to_string(),
            field: "filterType",
            value: name.to_string(),
        }),
    }
}
