//! Maps transport failures and upstream error bodies onto [`GatewayError`].
//!
//! - slow or dropped connections: 504 with the endpoint's "took too long" message
//! - upstream 4xx/5xx carrying `detail`: that detail, verbatim, with the upstream status
//! - anything else: the endpoint's fallback message

use super::endpoint::Endpoint;
use crate::error::GatewayError;
use reqwest::StatusCode;
use serde_json::Value;
use std::error::Error as _;
use std::fmt;
use std::io;

pub(crate) fn from_transport(endpoint: Endpoint, err: &reqwest::Error) -> GatewayError {
    if err.is_timeout() || is_connection_drop(err) {
        GatewayError::new(
            StatusCode::GATEWAY_TIMEOUT.as_u16(),
            endpoint.timeout_detail(),
        )
    } else {
        GatewayError::new(
            StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            endpoint.fallback_detail(),
        )
    }
}

/// Walks the source chain looking for a reset, aborted or timed-out socket.
fn is_connection_drop(err: &reqwest::Error) -> bool {
    let mut source = err.source();
    while let Some(cause) = source {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            if matches!(
                io_err.kind(),
                io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::TimedOut
            ) {
                return true;
            }
        }
        source = cause.source();
    }
    false
}

pub(crate) fn from_upstream(endpoint: Endpoint, status: u16, body: &[u8]) -> GatewayError {
    let detail = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|json| json.get("detail").cloned())
        .and_then(|detail| match detail {
            Value::String(s) if !s.is_empty() => Some(s),
            Value::String(_) | Value::Null => None,
            other => Some(other.to_string()),
        });
    GatewayError::new(
        status,
        detail.unwrap_or_else(|| endpoint.fallback_detail().to_string()),
    )
}

/// A 2xx body that is not the JSON we expected.
pub(crate) fn malformed(endpoint: Endpoint, err: &serde_json::Error) -> GatewayError {
    tracing::warn!(?endpoint, error = %err, "malformed response body");
    GatewayError::new(
        StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
        endpoint.fallback_detail(),
    )
}

/// An incoming proxy request the extractors could not decode.
pub(crate) fn rejected(endpoint: Endpoint, rejection: &impl fmt::Display) -> GatewayError {
    tracing::warn!(?endpoint, error = %rejection, "rejected request");
    GatewayError::new(
        StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
        endpoint.fallback_detail(),
    )
}
