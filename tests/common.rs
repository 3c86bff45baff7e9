//! Common test utilities for building operator trees, prompt data and backends.
#![allow(dead_code)]

use flockflow::prelude::*;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::result::Result;
use std::sync::Mutex;

/// Builds a `Row` from a `json!` object literal.
pub fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        other => panic!("row fixture must be an object, got {other}"),
    }
}

/// Builds a params bag from a `json!` object literal.
pub fn params(value: Value) -> serde_json::Map<String, Value> {
    row(value)
}

/// Sink -> llm_filter(prompt "p") -> Scan
pub fn create_chain_tree() -> Pipeline {
    Operator::from_json(
        r#"{"id":0,"name":"Sink","children":[
            {"id":1,"name":"llm_filter","is_function":true,"params":{"prompt":"p"},"children":[
                {"id":2,"name":"Scan","children":[]}
            ]}
        ]}"#,
    )
    .unwrap()
}

/// A root with three children, the middle one holding a function with its own scan.
///
/// ```text
/// 10 Projection
///  ├─ 11 Scan reviews
///  ├─ 12 llm_complete ── 14 Scan products
///  └─ 13 Scan orders
/// ```
pub fn create_wide_tree() -> Pipeline {
    let function = Operator::new(12, "llm_complete")
        .function(params(json!({
            "model_name": "gpt-4o-mini",
            "prompt": "Summarize",
            "context_columns": [{"name": "review", "data": "text"}],
            "batch_size": 8,
            "tuple_format": "JSON"
        })))
        .with_child(Operator::new(14, "Scan").with_description("products"));

    std::sync::Arc::new(
        Operator::new(10, "Projection")
            .with_child(Operator::new(11, "Scan").with_description("reviews"))
            .with_child(function)
            .with_child(Operator::new(13, "Scan").with_description("orders")),
    )
}

pub fn create_prompt_data() -> PromptData {
    PromptData {
        prompt: "Which products have the best reviews?".to_string(),
        query: "SELECT product, score FROM reviews".to_string(),
        table: vec![
            row(json!({"product": "lamp", "score": 4.5})),
            row(json!({"product": "desk", "score": 3.0})),
        ],
        execution_time: 0.42,
    }
}

pub fn create_other_prompt_data() -> PromptData {
    PromptData {
        prompt: "Count orders".to_string(),
        query: "SELECT count(*) AS n FROM orders".to_string(),
        table: vec![row(json!({"n": 7}))],
        execution_time: 0.05,
    }
}

/// A backend that answers requests from a queue of canned results and records
/// every request it receives.
#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<Response, GatewayError>>>,
    pub received: Mutex<Vec<Request>>,
}

impl ScriptedBackend {
    pub fn new(replies: Vec<Result<Response, GatewayError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn push(&self, reply: Result<Response, GatewayError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn received(&self) -> Vec<Request> {
        self.received.lock().unwrap().clone()
    }
}

impl Backend for ScriptedBackend {
    async fn send(&self, request: Request) -> Result<Response, GatewayError> {
        self.received.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::new(500, "no scripted reply")))
    }
}
