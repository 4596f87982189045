use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Headroom the gateway keeps after the completion call gives up, so the
/// failure is still answered and logged inside the request timeout.
const PROVIDER_TIMEOUT_MARGIN: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Gateway port (default: 3000)
    #[serde(default = "default_gateway_port")]
    pub port: u16,
    /// Gateway host (default: 127.0.0.1)
    #[serde(default = "default_gateway_host")]
    pub host: String,
    /// Allow binding to non-localhost (default: false)
    #[serde(default)]
    pub allow_public_bind: bool,
    /// Whole-request timeout. The completion call gets [`GatewayConfig::provider_timeout`].
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Browser origins allowed to call the API cross-origin. Empty disables CORS.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_gateway_port() -> u16 {
    3000
}

fn default_gateway_host() -> String {
    "127.0.0.1".into()
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl GatewayConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Budget for one completion call. Always strictly shorter than
    /// [`request_timeout`](Self::request_timeout): the margin, capped at half.
    pub fn provider_timeout(&self) -> Duration {
        let total = self.request_timeout();
        total.saturating_sub(PROVIDER_TIMEOUT_MARGIN).max(total / 2)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_gateway_port(),
            host: default_gateway_host(),
            allow_public_bind: false,
            request_timeout_secs: default_request_timeout_secs(),
            cors_origins: Vec::new(),
        }
    }
}
