use crate::flow::Headers;
use serde::Deserialize;

/// A workflow as the visual editor saves it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UiWorkflow {
    #[serde(default)]
    pub nodes: Vec<UiNode>,
    #[serde(default)]
    pub edges: Vec<UiEdge>,
}

/// A canvas node. `position` and other layout keys are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct UiNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    /// The node's flat settings record, kept raw so nodes of unknown types survive conversion.
    #[serde(default)]
    pub data: serde_json::Value,
}

/// The settings record of the built-in editor node types. Keys not listed here are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiNodeData {
    pub label: Option<String>,
    pub method: Option<String>,
    pub url: Option<String>,
    pub headers: Option<Headers>,
    #[serde(alias = "transformLogic")]
    pub expression: Option<String>,
    #[serde(alias = "filterType")]
    pub mode: Option<String>,
    pub condition: Option<String>,
    #[serde(alias = "keepFields")]
    pub fields: Option<FieldList>,
}

/// Fields to keep, either as the editor's comma-separated text or as a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FieldList {
    Text(String),
    List(Vec<String>),
}

impl FieldList {
    /// Trimmed, non-empty field names.
    pub fn names(&self) -> Vec<String> {
        let names: Vec<&str> = match self {
            FieldList::Text(text) => text.split(',').collect(),
            FieldList::List(list) => list.iter().map(String::as_str).collect(),
        };
        names
            .into_iter()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// A canvas connection. Handle ids are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct UiEdge {
    #[serde(default)]
    pub id: String,
    pub source: String,
    pub target: String,
}
