//! Unit tests for the tree model, params view, endpoint table and formatter.
mod common;
use common::*;
use flockflow::config::{DEFAULT_BACKEND_URL, DEFAULT_LISTEN, GatewayConfig};
use flockflow::gateway::Endpoint;
use flockflow::pipeline::{ColumnRef, FunctionParams};
use flockflow::prelude::*;
use serde_json::json;
use std::time::Duration;

#[test]
fn test_operator_from_json_defaults_missing_fields() {
    let tree = Operator::from_json(r#"{"id": 5, "name": "Scan", "children": null}"#).unwrap();
    assert_eq!(tree.id, 5);
    assert!(tree.is_leaf());
    assert!(!tree.is_function);
    assert!(tree.params.is_empty());
    assert_eq!(tree.description, "");
    assert!(tree.data.is_none());
}

#[test]
fn test_operator_from_json_rejects_garbage() {
    let err = Operator::from_json("{not json").unwrap_err();
    assert!(matches!(err, PipelineError::JsonParseError(_)));
}

#[test]
fn test_operator_find_is_preorder_first_match() {
    let tree = Operator::from_json(
        r#"{"id":0,"name":"Root","children":[
            {"id":1,"name":"First","children":[{"id":2,"name":"Dup","children":[]}]},
            {"id":2,"name":"Later","children":[]}
        ]}"#,
    )
    .unwrap();
    assert_eq!(tree.find(2).unwrap().name, "Dup");
    assert!(tree.find(99).is_none());
    assert_eq!(tree.node_count(), 4);
}

#[test]
fn test_operator_rows_ignores_non_record_data() {
    let mut op = Operator::new(1, "Results");
    op.data = Some(json!("not a table"));
    assert!(op.rows().is_empty());

    let op = op.with_data(vec![row(json!({"a": 1}))]);
    assert_eq!(op.rows().len(), 1);
}

#[test]
fn test_function_params_defaults() {
    let parsed = FunctionParams::from_params(&params(json!({"prompt": "p"})));
    assert_eq!(parsed.prompt.as_deref(), Some("p"));
    assert_eq!(parsed.model_name, None);
    assert_eq!(parsed.batch_size, None);
    assert_eq!(parsed.tuple_format, TupleFormat::Xml);
    assert!(parsed.columns.is_empty());
}

#[test]
fn test_function_params_column_shapes() {
    let parsed = FunctionParams::from_params(&params(json!({
        "input_columns": ["title", {"name": "body", "data": "text"}, 42]
    })));
    assert_eq!(
        parsed.columns,
        vec![
            ColumnRef {
                name: "title".to_string(),
                data: None
            },
            ColumnRef {
                name: "body".to_string(),
                data: Some("text".to_string())
            },
        ]
    );
}

#[test]
fn test_function_params_context_columns_win() {
    let parsed = FunctionParams::from_params(&params(json!({
        "input_columns": ["old"],
        "context_columns": ["new"]
    })));
    assert_eq!(parsed.columns.len(), 1);
    assert_eq!(parsed.columns[0].name, "new");
}

#[test]
fn test_function_params_invalid_batch_size_is_auto() {
    let zero = FunctionParams::from_params(&params(json!({"batch_size": 0})));
    assert_eq!(zero.batch_size, None);
    let text = FunctionParams::from_params(&params(json!({"batch_size": "many"})));
    assert_eq!(text.batch_size, None);
    let ok = FunctionParams::from_params(&params(json!({"batch_size": 32})));
    assert_eq!(ok.batch_size, Some(32));
}

#[test]
fn test_tuple_format_names() {
    for format in TupleFormat::ALL {
        assert_eq!(TupleFormat::parse(format.as_str()), Some(format));
    }
    assert_eq!(TupleFormat::parse("yaml"), None);
    assert_eq!(serde_json::to_value(TupleFormat::Xml).unwrap(), json!("XML"));
}

#[test]
fn test_endpoint_timeouts() {
    assert_eq!(
        Endpoint::GenerateResponseTable.timeout(),
        Some(Duration::from_secs(120))
    );
    assert_eq!(
        Endpoint::GenerateQueryPlan.timeout(),
        Some(Duration::from_secs(30))
    );
    assert_eq!(Endpoint::ListTables.timeout(), None);
    assert!(Endpoint::PreviewTable.takes_name());
    assert!(!Endpoint::DataStatus.takes_name());
}

#[test]
fn test_endpoint_routes_mirror_upstream() {
    for endpoint in Endpoint::ALL {
        assert_eq!(
            endpoint.route().strip_prefix("/api"),
            Some(endpoint.upstream()),
            "{:?}",
            endpoint
        );
    }
}

#[test]
fn test_timeout_detail_message() {
    assert_eq!(
        Endpoint::GenerateQueryPlan.timeout_detail(),
        "Request timeout - the query plan generation took too long"
    );
}

#[test]
fn test_gateway_config_builders() {
    let config = GatewayConfig::default()
        .with_backend_url("http://backend:9000")
        .with_timeout_override(Duration::from_millis(250));
    assert_eq!(config.backend_url, "http://backend:9000");
    assert_eq!(config.timeout_override, Some(Duration::from_millis(250)));
    assert_eq!(GatewayConfig::default().backend_url, DEFAULT_BACKEND_URL);
    assert_eq!(GatewayConfig::default().listen.to_string(), "127.0.0.1:3000");
    assert_eq!(GatewayConfig::default().listen, DEFAULT_LISTEN);
}

#[test]
fn test_gateway_error_display() {
    let err = GatewayError::new(504, "Request timeout - the query execution took too long");
    assert!(err.is_timeout());
    assert_eq!(
        err.to_string(),
        "Request timeout - the query execution took too long (HTTP 504)"
    );
}

#[test]
fn test_formatter_shows_auto_batch_size() {
    let op = Operator::new(3, "llm_filter").function(params(json!({
        "model_name": "gpt-4o",
        "prompt": "keep positive",
        "input_columns": ["review"]
    })));
    let text = NodeFormatter::format_presentation(&NodePresentation::dispatch(&op));
    assert_eq!(
        text,
        "llm_filter (function)\nmodel: gpt-4o\nprompt: keep positive\ncolumns: [review]\nbatch size: Auto\ntuple format: XML"
    );
}

#[test]
fn test_formatter_layout_lists_edges() {
    let tree = create_chain_tree();
    let layout = LayoutEngine::builder(LayoutConfig::default())
        .build()
        .layout(&tree);
    let text = NodeFormatter::format_layout(&layout);
    assert!(text.starts_with("[0] @ (0, 0)\n    Sink\n"));
    assert!(text.contains("[2] @ (600, 0)\n    Scan\n"));
    assert!(text.ends_with("edges: 0 -> 1, 1 -> 2\n"));
}
