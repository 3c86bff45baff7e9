use super::endpoint::{Endpoint, NAME_PARAM};
use super::normalize;
use crate::error::GatewayError;
use axum::body::Bytes;
use reqwest::{Client, StatusCode, Url, multipart};
use serde_json::Value;
use std::time::Duration;

/// Which side of the proxy a transport talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The proxy's public `/api/...` routes.
    Proxy,
    /// The backend service itself.
    Backend,
}

/// Outgoing request body.
pub enum Body {
    Empty,
    Json(Value),
    /// Forwarded untouched, e.g. a multipart upload relayed by the proxy.
    Raw { content_type: String, bytes: Bytes },
    Multipart(multipart::Form),
}

/// JSON-over-HTTP calls to one base URL with per-endpoint timeouts and
/// normalized errors.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
    base_url: Url,
    target: Target,
    timeout_override: Option<Duration>,
}

impl HttpTransport {
    pub fn new(base_url: &str, target: Target) -> Result<Self, GatewayError> {
        let base_url = Url::parse(base_url).map_err(|e| {
            GatewayError::new(
                StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                format!("Invalid base URL '{}': {}", base_url, e),
            )
        })?;
        Ok(Self {
            http: Client::new(),
            base_url,
            target,
            timeout_override: None,
        })
    }

    /// Replaces every endpoint's timeout with `timeout`.
    pub fn with_timeout_override(mut self, timeout: Option<Duration>) -> Self {
        self.timeout_override = timeout;
        self
    }

    /// Resolves the endpoint's path template against the base URL.
    ///
    /// The table name is pushed as a single, percent-encoded path segment.
    pub fn url(&self, endpoint: Endpoint, name: Option<&str>) -> Result<Url, GatewayError> {
        let template = match self.target {
            Target::Proxy => endpoint.route(),
            Target::Backend => endpoint.upstream(),
        };
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                GatewayError::new(
                    StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                    format!("Base URL '{}' cannot carry a path", self.base_url),
                )
            })?;
            segments.pop_if_empty();
            for segment in template.split('/').filter(|s| !s.is_empty()) {
                if segment == NAME_PARAM {
                    segments.push(name.unwrap_or_default());
                } else {
                    segments.push(segment);
                }
            }
        }
        Ok(url)
    }

    pub async fn call(
        &self,
        endpoint: Endpoint,
        name: Option<&str>,
        query: &[(&str, String)],
        body: Body,
    ) -> Result<Value, GatewayError> {
        let url = self.url(endpoint, name)?;
        let mut request = self.http.request(endpoint.method(), url.clone());
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(timeout) = self.timeout_override.or(endpoint.timeout()) {
            request = request.timeout(timeout);
        }
        request = match body {
            Body::Empty => request,
            Body::Json(json) => request.json(&json),
            Body::Raw {
                content_type,
                bytes,
            } => request
                .header(reqwest::header::CONTENT_TYPE, content_type)
                .body(bytes),
            Body::Multipart(form) => request.multipart(form),
        };

        tracing::debug!(?endpoint, %url, "sending request");
        let response = request
            .send()
            .await
            .map_err(|e| normalize::from_transport(endpoint, &e))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| normalize::from_transport(endpoint, &e))?;

        if !status.is_success() {
            return Err(normalize::from_upstream(endpoint, status.as_u16(), &bytes));
        }
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| normalize::malformed(endpoint, &e))
    }
}
