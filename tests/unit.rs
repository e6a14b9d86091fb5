//! Unit tests for core nagare types.
mod common;
use common::*;
use nagare::prelude::*;
use serde_json::json;

#[test]
fn test_value_display() {
    assert_eq!(format!("{}", Value::Number(42.0)), "42");
    assert_eq!(format!("{}", Value::Number(2.5)), "2.5");
    assert_eq!(format!("{}", Value::Bool(true)), "true");
    assert_eq!(format!("{}", Value::Null), "null");
    assert_eq!(format!("{}", Value::from("hi")), "\"hi\"");
    assert_eq!(
        format!("{}", Value::from(json!({ "a": [1, null] }))),
        "{a: [1, null]}"
    );
}

#[test]
fn test_value_truthiness() {
    assert!(!Value::Absent.is_truthy());
    assert!(!Value::Null.is_truthy());
    assert!(!Value::Number(0.0).is_truthy());
    assert!(!Value::Number(f64::NAN).is_truthy());
    assert!(!Value::from("").is_truthy());
    assert!(Value::from("0").is_truthy());
    assert!(Value::Array(Vec::new()).is_truthy());
    assert!(Value::object::<&str, _>([]).is_truthy());
}

#[test]
fn test_value_to_json() {
    let value = Value::object([
        ("kept", Value::Number(3.0)),
        ("fraction", Value::Number(0.25)),
        ("gone", Value::Absent),
        ("list", Value::Array(vec![Value::Absent, Value::Number(f64::INFINITY)])),
    ]);
    assert_eq!(
        value.to_json(),
        json!({ "kept": 3, "fraction": 0.25, "list": [null, null] })
    );
    assert_eq!(Value::Absent.to_json(), json!(null));
}

#[test]
fn test_graph_error_display() {
    let err = GraphError::CycleDetected {
        node_ids: vec!["a".to_string(), "b".to_string()],
    };
    assert_eq!(err.to_string(), "Workflow contains a cycle involving node(s): a, b");

    let err = GraphError::DanglingEdge {
        edge: "e7".to_string(),
        missing_node_id: "x".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Edge 'e7' references node 'x', which does not exist"
    );
}

#[test]
fn test_edge_display_name() {
    assert_eq!(FlowEdge::new("e1", "a", "b").display_name(), "e1");
    assert_eq!(FlowEdge::new("", "a", "b").display_name(), "a->b");
}

#[test]
fn test_node_type_names() {
    assert_eq!(NodeType::from_name("httpNode"), Some(NodeType::Request));
    assert_eq!(NodeType::from_name("transform"), Some(NodeType::Transform));
    assert_eq!(NodeType::from_name("filterNode"), Some(NodeType::Filter));
    assert_eq!(NodeType::from_name("emailNode"), None);
    assert_eq!(NodeType::Filter.to_string(), "filter");
    assert_eq!(transform("t", "1").kind.type_name(), "transform");
}

#[test]
fn test_http_method_parsing() {
    assert_eq!(HttpMethod::parse("post"), Some(HttpMethod::Post));
    assert_eq!(HttpMethod::parse(" Patch "), Some(HttpMethod::Patch));
    assert_eq!(HttpMethod::parse("TRACE"), None);
    assert_eq!(HttpMethod::default(), HttpMethod::Get);
    assert_eq!(reqwest::Method::from(HttpMethod::Put), reqwest::Method::PUT);
}

#[test]
fn test_node_display_name_prefers_label() {
    assert_eq!(transform("t1", "1").display_name(), "t1");
    assert_eq!(transform("t1", "1").with_label("Tidy").display_name(), "Tidy");
}

#[test]
fn test_engine_config_defaults() {
    let config = EngineConfig::default();
    assert_eq!(config.request_timeout_secs, 30);
    assert_eq!(config.connect_timeout_secs, 10);
    assert_eq!(config.progress_capacity, 256);
    assert!(config.user_agent.starts_with("nagare/"));
    assert_eq!(EngineConfig::from_toml_str("").unwrap(), config);
}

#[test]
fn test_engine_config_from_toml() {
    let config = EngineConfig::from_toml_str(
        r#"
request_timeout_secs = 5
user_agent = "acme-flows/1.0"
"#,
    )
    .unwrap();
    assert_eq!(config.request_timeout_secs, 5);
    assert_eq!(config.connect_timeout_secs, 10);
    assert_eq!(config.user_agent, "acme-flows/1.0");
    assert!(config.build_http_client().is_ok());
}

#[test]
fn test_engine_config_errors() {
    let err = EngineConfig::from_toml_str("request_timeout_secs = \"soon\"").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));

    let err = EngineConfig::from_file("/definitely/not/here.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
    assert!(err.to_string().contains("/definitely/not/here.toml"));
}

#[test]
fn test_execution_result_json_shape() {
    let flow = flow(vec![transform("a", "1"), transform("b", "nope")], vec![]);
    let result = tokio_test::block_on(engine().run(&flow)).unwrap();

    let encoded: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
    assert_eq!(
        encoded,
        json!({
            "order": ["a", "b"],
            "perNode": { "a": 1 },
            "perNodeError": { "b": "Expression failed: 'nope' is not defined" }
        })
    );
}

#[test]
fn test_run_report_display() {
    let flow = flow(
        vec![
            transform("a", "{ n: 1 }").with_label("Make Object"),
            transform("b", "nope"),
        ],
        vec![],
    );
    let result = tokio_test::block_on(engine().run(&flow)).unwrap();
    let report = RunReport::new(&result, &flow).to_string();

    assert!(report.starts_with("Results (1)\n  Make Object (a)  ✓ Success\n"));
    assert!(report.contains("    \"n\": 1"));
    assert!(report.contains("Errors (1)\n  Unnamed Node (b)  ✗ Expression failed: 'nope' is not defined"));
}

#[test]
fn test_progress_event_serialization() {
    let event = ProgressEvent::succeeded("n1", json!({ "ok": true }));
    assert_eq!(
        serde_json::to_value(&event).unwrap(),
        json!({ "nodeId": "n1", "state": "succeeded", "payload": { "ok": true } })
    );
    let event = ProgressEvent::running("n1");
    assert_eq!(
        serde_json::to_value(&event).unwrap(),
        json!({ "nodeId": "n1", "state": "running" })
    );
}

#[test]
fn test_progress_bus_without_subscribers() {
    let bus = ProgressBus::default();
    bus.publish(ProgressEvent::running("nobody-listens"));

    let mut late = bus.subscribe();
    bus.publish(ProgressEvent::running("heard"));
    assert_eq!(late.try_recv().unwrap().node_id, "heard");
}
