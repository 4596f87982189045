use reqwest::Client;
use std::time::Duration;

/// Shared HTTP client settings for completion providers.
///
/// `timeout` bounds the whole completion request.
pub fn build_provider_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .unwrap_or_else(|error| {
            tracing::warn!("falling back to default HTTP client: {error}");
            Client::new()
        })
}
