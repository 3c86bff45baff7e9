//! Request/response adapters between the UI state machine and the backend.
//!
//! The same endpoint table drives both directions: [`GatewayClient`] calls the
//! proxy's public routes, and [`proxy::router`] forwards those routes to the
//! backend. Failures on either side are normalized to
//! [`GatewayError`](crate::error::GatewayError).

pub mod api;
pub mod client;
pub mod endpoint;
mod normalize;
pub mod proxy;
pub mod transport;

pub use api::*;
pub use client::GatewayClient;
pub use endpoint::Endpoint;

use crate::error::GatewayError;
use std::future::Future;

/// Anything that can answer the state machine's requests.
pub trait Backend {
    fn send(&self, request: Request) -> impl Future<Output = Result<Response, GatewayError>> + Send;
}
