use crate::state::{Action, View};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors that can occur while loading a pipeline or prompt data snapshot.
#[derive(Error, Debug, Clone)]
pub enum PipelineError {
    #[error("Failed to parse pipeline JSON: {0}")]
    JsonParseError(String),

    #[error("Could not read '{path}': {message}")]
    Io { path: String, message: String },
}

/// A backend failure normalized to the `{detail}` shape the UI consumes.
///
/// Every failure path (timeouts, upstream errors, unusable bodies) ends up here,
/// so the proxy and the client agree on status codes and messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{detail} (HTTP {status})")]
pub struct GatewayError {
    pub status: u16,
    pub detail: String,
}

impl GatewayError {
    pub fn new(status: u16, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    /// True for failures caused by a slow or dropped upstream connection.
    pub fn is_timeout(&self) -> bool {
        self.status == StatusCode::GATEWAY_TIMEOUT.as_u16()
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(serde_json::json!({ "detail": self.detail }))).into_response()
    }
}

/// Errors raised when an action is not valid in the current view.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Action '{action}' is not available while the view is {view:?}")]
    InvalidTransition { view: View, action: Action },

    #[error("Prompt cannot be empty")]
    EmptyPrompt,

    #[error("No results are loaded")]
    NoResults,

    #[error("No query plan is loaded")]
    NoPipeline,

    #[error("Nothing to retry for action '{0}'")]
    NothingToRetry(Action),

    #[error("Response for '{response}' does not answer a '{request}' request")]
    MismatchedResponse { request: Action, response: Action },
}

/// Errors that can occur while exporting a result table.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("There are no rows to export")]
    EmptyTable,

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Could not write export file: {0}")]
    Io(#[from] std::io::Error),
}
