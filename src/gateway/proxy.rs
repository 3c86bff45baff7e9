//! Thin pass-through routes forwarding `/api/...` to the configured backend.

use super::client::DEFAULT_PREVIEW_LIMIT;
use super::endpoint::Endpoint;
use super::normalize;
use super::transport::{Body, HttpTransport, Target};
use crate::config::GatewayConfig;
use crate::error::GatewayError;
use axum::body::Bytes;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, header};
use axum::routing::{MethodRouter, delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::net::TcpListener;

type Upstream = Arc<HttpTransport>;

#[derive(Deserialize)]
struct PreviewParams {
    limit: Option<u32>,
}

/// Builds the transport the proxy uses to reach the backend.
pub fn upstream(config: &GatewayConfig) -> Result<HttpTransport, GatewayError> {
    Ok(HttpTransport::new(&config.backend_url, Target::Backend)?
        .with_timeout_override(config.timeout_override))
}

pub fn router(upstream: HttpTransport) -> Router {
    Router::new()
        .route("/api/data/tables", get(list_tables))
        .route("/api/data/upload-csv", raw_route(Endpoint::UploadCsv))
        .route("/api/data/upload-duckdb", raw_route(Endpoint::UploadDuckdb))
        .route("/api/data/status", get(data_status))
        .route("/api/data/tables/:name", delete(delete_table))
        .route("/api/data/tables/:name/preview", get(preview_table))
        .route("/api/data/tables/:name/schema", get(table_schema))
        .route(
            "/api/generate-response-table",
            json_route(Endpoint::GenerateResponseTable),
        )
        .route(
            "/api/regenerate-response-table",
            json_route(Endpoint::RegenerateResponseTable),
        )
        .route(
            "/api/generate-input-query-response-table",
            json_route(Endpoint::RunInputQuery),
        )
        .route(
            "/api/generate-query-plan",
            json_route(Endpoint::GenerateQueryPlan),
        )
        .route(
            "/api/run-query-with-refinement",
            json_route(Endpoint::RunWithRefinement),
        )
        .route(
            "/api/generate-plot-config",
            json_route(Endpoint::GeneratePlotConfig),
        )
        .with_state(Arc::new(upstream))
}

/// Binds `config.listen` and serves the proxy until ctrl-c.
pub async fn serve(config: GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(upstream(&config)?);
    let listener = TcpListener::bind(config.listen).await?;
    tracing::info!(
        listen = %listener.local_addr()?,
        backend = %config.backend_url,
        "gateway listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;
    Ok(())
}

async fn forward(
    upstream: &HttpTransport,
    endpoint: Endpoint,
    name: Option<&str>,
    query: &[(&str, String)],
    body: Body,
) -> Result<Json<Value>, GatewayError> {
    tracing::info!(route = endpoint.route(), "forwarding");
    match upstream.call(endpoint, name, query, body).await {
        Ok(value) => Ok(Json(value)),
        Err(err) => {
            tracing::warn!(route = endpoint.route(), status = err.status, detail = %err.detail, "upstream failed");
            Err(err)
        }
    }
}

fn json_route(endpoint: Endpoint) -> MethodRouter<Upstream> {
    post(
        move |State(upstream): State<Upstream>, body: Result<Json<Value>, JsonRejection>| async move {
            let body = match body {
                Ok(Json(body)) => body,
                Err(rejection) => return Err(normalize::rejected(endpoint, &rejection)),
            };
            forward(&upstream, endpoint, None, &[], Body::Json(body)).await
        },
    )
}

fn raw_route(endpoint: Endpoint) -> MethodRouter<Upstream> {
    post(
        move |State(upstream): State<Upstream>, headers: HeaderMap, bytes: Bytes| async move {
            let content_type = headers
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("application/octet-stream")
                .to_string();
            forward(
                &upstream,
                endpoint,
                None,
                &[],
                Body::Raw {
                    content_type,
                    bytes,
                },
            )
            .await
        },
    )
}

async fn list_tables(State(upstream): State<Upstream>) -> Result<Json<Value>, GatewayError> {
    forward(&upstream, Endpoint::ListTables, None, &[], Body::Empty).await
}

async fn data_status(State(upstream): State<Upstream>) -> Result<Json<Value>, GatewayError> {
    forward(&upstream, Endpoint::DataStatus, None, &[], Body::Empty).await
}

async fn delete_table(
    State(upstream): State<Upstream>,
    Path(name): Path<String>,
) -> Result<Json<Value>, GatewayError> {
    forward(&upstream, Endpoint::DeleteTable, Some(&name), &[], Body::Empty).await
}

async fn preview_table(
    State(upstream): State<Upstream>,
    Path(name): Path<String>,
    params: Result<Query<PreviewParams>, QueryRejection>,
) -> Result<Json<Value>, GatewayError> {
    let Query(params) = params.map_err(|e| normalize::rejected(Endpoint::PreviewTable, &e))?;
    let limit = params.limit.unwrap_or(DEFAULT_PREVIEW_LIMIT);
    forward(
        &upstream,
        Endpoint::PreviewTable,
        Some(&name),
        &[("limit", limit.to_string())],
        Body::Empty,
    )
    .await
}

async fn table_schema(
    State(upstream): State<Upstream>,
    Path(name): Path<String>,
) -> Result<Json<Value>, GatewayError> {
    forward(&upstream, Endpoint::TableSchema, Some(&name), &[], Body::Empty).await
}
