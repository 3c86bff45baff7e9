use std::env;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_LISTEN: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(127, 0, 0, 1), 3000));

/// Settings for the proxy and for clients talking through it.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    /// Base URL every `/api/...` route is forwarded to.
    pub backend_url: String,
    pub listen: SocketAddr,
    /// Replaces the per-endpoint timeouts when set.
    pub timeout_override: Option<Duration>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            listen: DEFAULT_LISTEN,
            timeout_override: None,
        }
    }
}

impl GatewayConfig {
    /// Reads `BACKEND_URL` and `FLOCKFLOW_LISTEN`, keeping defaults for anything unset or invalid.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = env::var("BACKEND_URL") {
            if !url.trim().is_empty() {
                config.backend_url = url.trim().to_string();
            }
        }
        if let Ok(listen) = env::var("FLOCKFLOW_LISTEN") {
            match listen.parse() {
                Ok(addr) => config.listen = addr,
                Err(e) => tracing::warn!(value = %listen, error = %e, "ignoring invalid FLOCKFLOW_LISTEN"),
            }
        }
        config
    }

    pub fn with_backend_url(mut self, url: impl Into<String>) -> Self {
        self.backend_url = url.into();
        self
    }

    pub fn with_listen(mut self, listen: SocketAddr) -> Self {
        self.listen = listen;
        self
    }

    pub fn with_timeout_override(mut self, timeout: Duration) -> Self {
        self.timeout_override = Some(timeout);
        self
    }
}
