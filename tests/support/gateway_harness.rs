use larder::config::{Config, StoreBackendKind};
use larder::gateway::run_gateway_with_listener;
use reqwest::StatusCode;
use std::time::Duration;
use tempfile::TempDir;

/// A gateway on an ephemeral loopback port, backed by a throwaway workspace.
pub struct GatewayTestServer {
    pub port: u16,
    pub workspace: TempDir,
    handle: tokio::task::JoinHandle<anyhow::Result<()>>,
}

impl GatewayTestServer {
    /// `provider_url` is the base URL of an OpenAI-compatible endpoint,
    /// usually a `wiremock` server.
    pub async fn start(provider_url: &str, backend: StoreBackendKind) -> Self {
        let workspace = TempDir::new().expect("temp workspace should be created");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("ephemeral gateway listener should bind");
        let port = listener
            .local_addr()
            .expect("ephemeral gateway listener should expose local address")
            .port();

        let mut config = Config::default();
        config.workspace_dir = workspace.path().to_path_buf();
        config.config_path = workspace.path().join("config.toml");
        config.default_provider = Some("compatible".to_string());
        config.provider_base_url = Some(provider_url.to_string());
        config.api_key = Some("sk-test-key".to_string());
        config.store.backend = backend;
        config.gateway.request_timeout_secs = 5;

        let host = "127.0.0.1".to_string();
        let handle =
            tokio::spawn(async move { run_gateway_with_listener(&host, listener, config).await });

        wait_until_gateway_ready(port).await;

        Self {
            port,
            workspace,
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{path}", self.port)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://127.0.0.1:{}/ws", self.port)
    }
}

impl Drop for GatewayTestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn wait_until_gateway_ready(port: u16) {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .expect("reqwest client should be built");

    for _ in 0..80 {
        let health = client
            .get(format!("http://127.0.0.1:{port}/health"))
            .send()
            .await;
        if matches!(health, Ok(resp) if resp.status() == StatusCode::OK) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    panic!("gateway did not become ready on port {port}");
}

/// Poll `check` until it holds or about a second passes.
pub async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..100 {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
