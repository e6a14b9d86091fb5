//! Tests for the individual node executors.
mod common;
use nagare::executor::{NodeContext, NodeExecutor, merge_headers, parse_headers};
use nagare::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    inputs: Vec<Value>,
    sources: Vec<String>,
    http: reqwest::Client,
}

impl Harness {
    fn new(inputs: Vec<Value>) -> Self {
        let sources = (0..inputs.len()).map(|i| format!("src{}", i)).collect();
        Self {
            inputs,
            sources,
            http: reqwest::Client::new(),
        }
    }

    fn with_sources(mut self, sources: &[&str]) -> Self {
        self.sources = sources.iter().map(|s| s.to_string()).collect();
        self
    }

    fn ctx(&self) -> NodeContext<'_> {
        NodeContext {
            node_id: "under-test",
            inputs: &self.inputs,
            source_node_ids: &self.sources,
            http: &self.http,
        }
    }
}

fn transform_config(expression: &str) -> TransformConfig {
    TransformConfig::new(expression)
}

fn array_filter_config(condition: &str) -> FilterConfig {
    FilterConfig::array(condition)
}

fn object_filter_config(fields: &[&str]) -> FilterConfig {
    FilterConfig::object(fields.iter().copied())
}

// --- Transform ---

#[tokio::test]
async fn test_transform_reads_inputs_by_position_and_source() {
    let harness = Harness::new(vec![Value::from(json!({ "n": 2 })), Value::Number(3.0)])
        .with_sources(&["A", "B"]);
    let config = transform_config("{ sum: $A.n + $B, same: inputs[0] == $A && inputs[1] == $B }");
    let output = config.execute(&harness.ctx()).await.unwrap();
    assert_eq!(output.to_json(), json!({ "sum": 5, "same": true }));
}

#[tokio::test]
async fn test_empty_transform_passes_first_input_through() {
    let harness = Harness::new(vec![Value::from("first"), Value::from("second")]);
    let output = transform_config("  ").execute(&harness.ctx()).await.unwrap();
    assert_eq!(output, Value::from("first"));

    let harness = Harness::new(Vec::new());
    let output = transform_config("").execute(&harness.ctx()).await.unwrap();
    assert_eq!(output, Value::Null);
}

#[tokio::test]
async fn test_transform_without_inputs_sees_empty_array() {
    let harness = Harness::new(Vec::new());
    let output = transform_config("inputs.length").execute(&harness.ctx()).await.unwrap();
    assert_eq!(output, Value::Number(0.0));
}

#[tokio::test]
async fn test_transform_errors_are_expression_errors() {
    let harness = Harness::new(vec![Value::Absent]).with_sources(&["A"]);

    let err = transform_config("inputs[0] +").execute(&harness.ctx()).await.unwrap_err();
    assert!(matches!(err, NodeError::Expression(ExpressionError::Parse { .. })));

    let err = transform_config("$A.value").execute(&harness.ctx()).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Expression failed: cannot read property 'value' of absent"
    );

    let err = transform_config("fetch").execute(&harness.ctx()).await.unwrap_err();
    assert_eq!(
        err,
        NodeError::Expression(ExpressionError::UnboundName("fetch".to_string()))
    );
}

// --- Filter ---

#[tokio::test]
async fn test_array_filter_keeps_matching_items_in_order() {
    let harness = Harness::new(vec![Value::from(json!([{ "v": 1 }, { "v": 5 }, { "v": 10 }]))]);
    let output = array_filter_config("item.v > 3").execute(&harness.ctx()).await.unwrap();
    assert_eq!(output.to_json(), json!([{ "v": 5 }, { "v": 10 }]));
}

#[tokio::test]
async fn test_array_filter_unwraps_response_data() {
    let response = json!({ "status": 200, "statusText": "OK", "data": [{ "ok": true }, { "ok": false }] });
    let harness = Harness::new(vec![Value::from(response)]);
    let output = array_filter_config("item.ok").execute(&harness.ctx()).await.unwrap();
    assert_eq!(output.to_json(), json!([{ "ok": true }]));
}

#[tokio::test]
async fn test_array_filter_with_empty_condition_returns_subject() {
    let harness = Harness::new(vec![Value::from(json!([1, 2]))]);
    let output = array_filter_config("").execute(&harness.ctx()).await.unwrap();
    assert_eq!(output.to_json(), json!([1, 2]));
}

#[tokio::test]
async fn test_array_filter_rejects_non_arrays() {
    let harness = Harness::new(vec![Value::from(json!({ "v": 1 }))]);
    let err = array_filter_config("item").execute(&harness.ctx()).await.unwrap_err();
    assert_eq!(
        err,
        NodeError::TypeMismatch {
            expected: "array".to_string(),
            found: "object".to_string()
        }
    );

    let harness = Harness::new(Vec::new());
    let err = array_filter_config("item").execute(&harness.ctx()).await.unwrap_err();
    assert_eq!(err.to_string(), "Type mismatch: expected array, but found absent");
}

#[tokio::test]
async fn test_array_filter_condition_cannot_see_inputs() {
    let harness = Harness::new(vec![Value::from(json!([1]))]);
    let err = array_filter_config("inputs.length > 0").execute(&harness.ctx()).await.unwrap_err();
    assert_eq!(
        err,
        NodeError::Expression(ExpressionError::UnboundName("inputs".to_string()))
    );
}

#[tokio::test]
async fn test_object_filter_keeps_listed_fields() {
    let harness = Harness::new(vec![Value::from(json!({ "id": 1, "name": "a", "extra": "x" }))]);
    let output = object_filter_config(&["id", " name ", "missing"])
        .execute(&harness.ctx())
        .await
        .unwrap();
    assert_eq!(output.to_json(), json!({ "id": 1, "name": "a" }));
}

#[tokio::test]
async fn test_object_filter_with_no_fields_returns_subject() {
    let harness = Harness::new(vec![Value::from(json!({ "id": 1 }))]);
    let output = object_filter_config(&["", "  "]).execute(&harness.ctx()).await.unwrap();
    assert_eq!(output.to_json(), json!({ "id": 1 }));
}

#[tokio::test]
async fn test_object_filter_rejects_arrays() {
    let harness = Harness::new(vec![Value::from(json!([{ "id": 1 }]))]);
    let err = object_filter_config(&["id"]).execute(&harness.ctx()).await.unwrap_err();
    assert!(matches!(err, NodeError::TypeMismatch { ref expected, .. } if expected == "object"));
}

// --- Headers ---

#[test]
fn test_parse_headers_from_json() {
    let headers = parse_headers(r#"{ "Authorization": "Bearer t", "X-Retries": 3 }"#);
    assert_eq!(
        headers,
        vec![
            ("Authorization".to_string(), "Bearer t".to_string()),
            ("X-Retries".to_string(), "3".to_string()),
        ]
    );
    assert_eq!(
        parse_headers(r#"{"X-Test":"1"}"#),
        vec![("X-Test".to_string(), "1".to_string())]
    );
}

#[test]
fn test_parse_headers_from_lines() {
    let headers = parse_headers("X-Test: 1\nX-Other: 2");
    assert_eq!(
        headers,
        vec![
            ("X-Test".to_string(), "1".to_string()),
            ("X-Other".to_string(), "2".to_string()),
        ]
    );

    let headers = parse_headers("  Url :  http://a:80/x \nno colon here\n: empty key\n");
    assert_eq!(headers, vec![("Url".to_string(), "http://a:80/x".to_string())]);
}

#[test]
fn test_merge_headers_user_value_wins() {
    let merged = merge_headers(&Headers::Text("content-type: text/plain\nX-A: 1".to_string()));
    assert_eq!(
        merged,
        vec![
            ("content-type".to_string(), "text/plain".to_string()),
            ("X-A".to_string(), "1".to_string()),
        ]
    );

    let merged = merge_headers(&Headers::default());
    assert_eq!(
        merged,
        vec![("Content-Type".to_string(), "application/json".to_string())]
    );
}

// --- Request ---

#[tokio::test]
async fn test_request_returns_status_and_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(header("X-Test", "1"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 1 }])))
        .expect(1)
        .mount(&server)
        .await;

    let config = RequestConfig::new(HttpMethod::Get, format!("{}/users", server.uri()))
        .with_headers(Headers::Text("X-Test: 1".to_string()));
    let harness = Harness::new(Vec::new());
    let output = config.execute(&harness.ctx()).await.unwrap();
    assert_eq!(
        output.to_json(),
        json!({ "status": 200, "statusText": "OK", "data": [{ "id": 1 }] })
    );
}

#[tokio::test]
async fn test_request_uses_configured_method() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/items/7"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "gone" })))
        .mount(&server)
        .await;

    let config = RequestConfig::new(HttpMethod::Delete, format!("{}/items/7", server.uri()));
    let harness = Harness::new(Vec::new());
    let output = config.execute(&harness.ctx()).await.unwrap();
    assert_eq!(output.to_json()["status"], json!(404));
    assert_eq!(output.to_json()["data"], json!({ "error": "gone" }));
}

#[tokio::test]
async fn test_request_without_url_fails() {
    let config = RequestConfig {
        url: "   ".to_string(),
        ..RequestConfig::default()
    };
    let harness = Harness::new(Vec::new());
    let err = config.execute(&harness.ctx()).await.unwrap_err();
    assert_eq!(err, NodeError::MissingUrl);
}

#[tokio::test]
async fn test_request_with_non_json_body_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let config = RequestConfig {
        url: server.uri(),
        ..RequestConfig::default()
    };
    let harness = Harness::new(Vec::new());
    let err = config.execute(&harness.ctx()).await.unwrap_err();
    assert!(matches!(err, NodeError::RequestFailed(_)));
}

#[tokio::test]
async fn test_unknown_node_kind_fails() {
    let kind = NodeKind::Unknown {
        type_name: "emailNode".to_string(),
        config: json!({}),
    };
    let harness = Harness::new(Vec::new());
    let err = kind.execute(&harness.ctx()).await.unwrap_err();
    assert_eq!(err, NodeError::UnknownNodeType("emailNode".to_string()));
}
