//! Common test utilities for building workflow definitions.
use nagare::prelude::*;

#[allow(dead_code)]
pub fn transform(id: &str, expression: &str) -> FlowNode {
    FlowNode::new(
        id,
        NodeKind::Transform(TransformConfig::new(expression)),
    )
}

#[allow(dead_code)]
pub fn array_filter(id: &str, condition: &str) -> FlowNode {
    FlowNode::new(
        id,
        NodeKind::Filter(FilterConfig::array(condition)),
    )
}

#[allow(dead_code)]
pub fn object_filter(id: &str, keep_fields: &[&str]) -> FlowNode {
    FlowNode::new(
        id,
        NodeKind::Filter(FilterConfig::object(keep_fields.iter().copied())),
    )
}

#[allow(dead_code)]
pub fn request(id: &str, method: HttpMethod, url: &str, headers: &str) -> FlowNode {
    FlowNode::new(
        id,
        NodeKind::Request(
            RequestConfig::new(method, url).with_headers(Headers::Text(headers.to_string())),
        ),
    )
}

/// An edge whose id is derived from its endpoints.
#[allow(dead_code)]
pub fn edge(source: &str, target: &str) -> FlowEdge {
    FlowEdge::new(format!("{}-{}", source, target), source, target)
}

#[allow(dead_code)]
pub fn flow(nodes: Vec<FlowNode>, edges: Vec<FlowEdge>) -> FlowDefinition {
    FlowDefinition::new(nodes, edges)
}

/// Nodes `ids`, each a transform returning its own id, chained in the given edges.
#[allow(dead_code)]
pub fn constant_flow(ids: &[&str], edges: &[(&str, &str)]) -> FlowDefinition {
    flow(
        ids.iter().map(|id| transform(id, &format!("\"{}\"", id))).collect(),
        edges.iter().map(|(s, t)| edge(s, t)).collect(),
    )
}

#[allow(dead_code)]
pub fn engine() -> Engine {
    Engine::new().expect("default engine should build")
}

/// A saved editor document: a request feeding a filter and a transform.
#[allow(dead_code)]
pub const EDITOR_WORKFLOW_JSON: &str = r#"{
  "nodes": [
    {
      "id": "fetch",
      "type": "httpNode",
      "position": { "x": 100, "y": 80 },
      "data": {
        "label": "Fetch Users",
        "description": "Loads all users",
        "method": "get",
        "url": "{{BASE_URL}}/users",
        "headers": "X-Api-Version: 2"
      }
    },
    {
      "id": "active",
      "type": "filterNode",
      "position": { "x": 320, "y": 80 },
      "data": {
        "label": "Active Users",
        "filterType": "array",
        "condition": "item.active"
      }
    },
    {
      "id": "summary",
      "type": "transformNode",
      "position": { "x": 540, "y": 80 },
      "data": {
        "label": "Summary",
        "transformLogic": "{ total: $fetch.data.length, active: $active.length, first: $active[0].name }"
      }
    }
  ],
  "edges": [
    { "id": "e1", "source": "fetch", "target": "active", "sourceHandle": "out", "targetHandle": "in" },
    { "id": "e2", "source": "fetch", "target": "summary" },
    { "id": "e3", "source": "active", "target": "summary" }
  ]
}"#;
