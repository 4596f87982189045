use super::http_client::build_provider_client;
use super::openai::OpenAiProvider;
use super::traits::Provider;
use crate::config::Config;
use std::sync::Arc;

/// Build the provider named by `config.default_provider`.
///
/// The HTTP client gives up before the gateway request timeout does, so a
/// slow provider surfaces as a generation failure rather than a bare 408.
pub fn create_provider(config: &Config) -> anyhow::Result<Arc<dyn Provider>> {
    let api_key = config.api_key.as_deref();
    let client = build_provider_client(config.gateway.provider_timeout());

    match config.provider_name() {
        "openai" => Ok(Arc::new(OpenAiProvider::new(api_key, client))),
        "compatible" | "openai-compatible" => {
            let Some(base_url) = config
                .provider_base_url
                .as_deref()
                .map(str::trim)
                .filter(|url| !url.is_empty())
            else {
                anyhow::bail!("provider \"compatible\" requires provider_base_url in config");
            };
            Ok(Arc::new(OpenAiProvider::compatible(
                "compatible",
                base_url,
                api_key,
                client,
            )))
        }
        other => anyhow::bail!("Unknown provider: {other}. Supported: openai, compatible"),
    }
}
