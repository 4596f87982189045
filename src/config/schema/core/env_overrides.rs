use super::Config;
use std::path::PathBuf;

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) =
            std::env::var("LARDER_API_KEY").or_else(|_| std::env::var("OPENAI_API_KEY"))
            && !key.is_empty()
        {
            self.api_key = Some(key);
        }

        if let Ok(provider) = std::env::var("LARDER_PROVIDER")
            && !provider.is_empty()
        {
            self.default_provider = Some(provider);
        }

        if let Ok(model) = std::env::var("LARDER_MODEL")
            && !model.is_empty()
        {
            self.default_model = Some(model);
        }

        if let Ok(backend) = std::env::var("LARDER_STORE_BACKEND") {
            match backend.parse() {
                Ok(kind) => self.store.backend = kind,
                Err(error) => tracing::warn!("ignoring LARDER_STORE_BACKEND: {error}"),
            }
        }

        if let Ok(workspace) = std::env::var("LARDER_WORKSPACE")
            && !workspace.is_empty()
        {
            self.workspace_dir = PathBuf::from(workspace);
        }

        if let Ok(port_str) =
            std::env::var("LARDER_GATEWAY_PORT").or_else(|_| std::env::var("PORT"))
            && let Ok(port) = port_str.parse::<u16>()
        {
            self.gateway.port = port;
        }

        if let Ok(host) = std::env::var("LARDER_GATEWAY_HOST")
            && !host.is_empty()
        {
            self.gateway.host = host;
        }

        if let Ok(level) = std::env::var("LARDER_LOG")
            && !level.is_empty()
        {
            self.observability.log_level = level;
        }
    }
}
