//! Round trips through the proxy against an in-process mock backend.
mod common;
use axum::body::Bytes;
use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use common::*;
use flockflow::gateway::{GenerateRequest, RegenerateRequest, UploadFile, proxy};
use flockflow::prelude::*;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::time::Duration;
use tokio::net::TcpListener;

async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn mock_backend() -> Router {
    Router::new()
        .route(
            "/data/tables",
            get(|| async {
                Json(json!({"tables": [
                    {"table_name": "reviews", "row_count": 2, "columns": ["product", "score"]}
                ]}))
            }),
        )
        .route(
            "/data/tables/:name/preview",
            get(
                |Path(name): Path<String>, Query(q): Query<HashMap<String, String>>| async move {
                    let limit: u64 = q.get("limit").and_then(|l| l.parse().ok()).unwrap_or(0);
                    Json(json!({"table_name": name, "columns": [], "data": [], "showing": limit}))
                },
            ),
        )
        .route(
            "/data/tables/:name",
            delete(|Path(name): Path<String>| async move {
                Json(json!({"message": format!("deleted {name}")}))
            }),
        )
        .route(
            "/data/upload-csv",
            post(|headers: HeaderMap, body: Bytes| async move {
                let content_type = headers
                    .get(header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                let text = String::from_utf8_lossy(&body).to_string();
                Json(json!({
                    "message": format!(
                        "multipart={} has_file={}",
                        content_type.starts_with("multipart/form-data"),
                        text.contains("filename=\"reviews.csv\"")
                    )
                }))
            }),
        )
        .route(
            "/generate-response-table",
            post(|Json(body): Json<Value>| async move {
                Json(json!({
                    "prompt": body["prompt"],
                    "query": "SELECT 1 AS one",
                    "table": [{"one": 1}],
                    "execution_time": 0.1
                }))
            }),
        )
        .route(
            "/regenerate-response-table",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"detail": "SQL syntax error"})),
                )
            }),
        )
        .route(
            "/generate-input-query-response-table",
            post(|| async {
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({"detail": [{"loc": ["body", "query"], "msg": "field required"}]})),
                )
            }),
        )
        .route(
            "/generate-query-plan",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                Json(json!({"pipeline": {"id": 0, "name": "Scan", "children": []}}))
            }),
        )
        .route(
            "/run-query-with-refinement",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
}

/// Mock backend behind the proxy; returns the proxy's base URL.
async fn proxy_url(timeout_override: Option<Duration>) -> String {
    let backend_url = spawn(mock_backend()).await;
    let mut config = GatewayConfig::default().with_backend_url(backend_url);
    if let Some(timeout) = timeout_override {
        config = config.with_timeout_override(timeout);
    }
    spawn(proxy::router(proxy::upstream(&config).unwrap())).await
}

async fn client_through_proxy(timeout_override: Option<Duration>) -> GatewayClient {
    GatewayClient::new(&proxy_url(timeout_override).await).unwrap()
}

#[tokio::test]
async fn test_list_tables_passthrough() {
    let client = client_through_proxy(None).await;
    let tables = client.list_tables().await.unwrap();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].table_name, "reviews");
    assert_eq!(tables[0].row_count, 2);
}

#[tokio::test]
async fn test_preview_limit_defaults_and_passes_through() {
    let client = client_through_proxy(None).await;
    let preview = client.preview_table("reviews", 25).await.unwrap();
    assert_eq!(preview.table_name, "reviews");
    assert_eq!(preview.showing, 25);

    // A caller that omits the limit gets the default.
    let base = proxy_url(None).await;
    let raw: Value = reqwest::get(format!("{base}/api/data/tables/reviews/preview"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(raw["showing"], 10);
}

#[tokio::test]
async fn test_malformed_json_body_gets_detail() {
    let base = proxy_url(None).await;
    let response = reqwest::Client::new()
        .post(format!("{base}/api/generate-query-plan"))
        .header(header::CONTENT_TYPE, "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "Failed to generate query plan");
}

#[tokio::test]
async fn test_invalid_preview_limit_gets_detail() {
    let base = proxy_url(None).await;
    let response = reqwest::get(format!("{base}/api/data/tables/t/preview?limit=abc"))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "Failed to fetch table preview");
}

#[tokio::test]
async fn test_table_name_is_encoded() {
    let client = client_through_proxy(None).await;
    let ack = client.delete_table("my table").await.unwrap();
    assert_eq!(ack.message, "deleted my table");
}

#[tokio::test]
async fn test_upload_csv_is_relayed_as_multipart() {
    let client = client_through_proxy(None).await;
    let ack = client
        .upload_csv(vec![UploadFile {
            file_name: "reviews.csv".to_string(),
            bytes: b"product,score\nlamp,4\n".to_vec(),
        }])
        .await
        .unwrap();
    assert_eq!(ack.message, "multipart=true has_file=true");
}

#[tokio::test]
async fn test_generate_round_trip() {
    let client = client_through_proxy(None).await;
    let data = client
        .generate(&GenerateRequest {
            prompt: "one".to_string(),
            selected_tables: vec![],
        })
        .await
        .unwrap();
    assert_eq!(data.prompt, "one");
    assert_eq!(data.query, "SELECT 1 AS one");
    assert_eq!(data.table, vec![row(json!({"one": 1}))]);
}

#[tokio::test]
async fn test_upstream_detail_is_verbatim() {
    let client = client_through_proxy(None).await;
    let err = client
        .regenerate(&RegenerateRequest {
            prompt: "p".to_string(),
            generated_query: "SELEC".to_string(),
            selected_tables: vec![],
        })
        .await
        .unwrap_err();
    assert_eq!(err, GatewayError::new(400, "SQL syntax error"));
}

#[tokio::test]
async fn test_structured_detail_is_stringified() {
    let client = client_through_proxy(None).await;
    let err = client
        .run_query(&flockflow::gateway::QueryRequest {
            query: String::new(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.status, 422);
    assert!(err.detail.contains("field required"), "{}", err.detail);
}

#[tokio::test]
async fn test_body_without_detail_uses_fallback() {
    let client = client_through_proxy(None).await;
    let err = client
        .run_with_refinement(&flockflow::gateway::RefinementRequest {
            query: "SELECT 1".to_string(),
            pipeline: create_chain_tree(),
        })
        .await
        .unwrap_err();
    assert_eq!(
        err,
        GatewayError::new(500, "Failed to run query with refinement")
    );
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let client = client_through_proxy(Some(Duration::from_millis(200))).await;
    let err = client
        .query_plan(&flockflow::gateway::QueryRequest {
            query: "SELECT 1".to_string(),
        })
        .await
        .unwrap_err();
    assert!(err.is_timeout());
    assert_eq!(
        err.detail,
        "Request timeout - the query plan generation took too long"
    );
}

#[tokio::test]
async fn test_unreachable_backend_uses_fallback() {
    // Reserve a port and close it so nothing is listening there.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let config = GatewayConfig::default().with_backend_url(dead);
    let url = spawn(proxy::router(proxy::upstream(&config).unwrap())).await;
    let client = GatewayClient::new(&url).unwrap();

    let err = client.list_tables().await.unwrap_err();
    assert_eq!(err, GatewayError::new(500, "Failed to fetch tables"));
}

#[tokio::test]
async fn test_session_drives_real_client() {
    let client = client_through_proxy(None).await;
    let mut session = Session::new(client);

    assert_eq!(session.refresh_tables().await.unwrap(), Outcome::Applied);
    assert_eq!(session.state().tables().len(), 1);

    assert_eq!(session.submit_prompt("one").await.unwrap(), Outcome::Applied);
    assert_eq!(session.state().view(), View::ResultsReady);

    assert_eq!(
        session.regenerate("one", "SELEC 1").await.unwrap(),
        Outcome::Failed
    );
    assert_eq!(
        session.state().error(Action::Regenerate).unwrap().detail,
        "SQL syntax error"
    );
    assert_eq!(session.state().prompt_data().unwrap().query, "SELECT 1 AS one");
}
