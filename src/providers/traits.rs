use crate::config::Config;
use async_trait::async_trait;

/// Sampling parameters sent with every completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl GenerationParams {
    pub fn from_config(config: &Config) -> Self {
        Self {
            model: config.model().to_string(),
            temperature: config.default_temperature,
            max_tokens: config.max_tokens,
        }
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// A text-completion service.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    async fn chat(&self, message: &str, params: &GenerationParams) -> anyhow::Result<String> {
        self.chat_with_system(None, message, params).await
    }

    /// One completion round trip. Implementations must not retry.
    async fn chat_with_system(
        &self,
        system_prompt: Option<&str>,
        message: &str,
        params: &GenerationParams,
    ) -> anyhow::Result<String>;
}
