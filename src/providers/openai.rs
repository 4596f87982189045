use super::scrub::api_error;
use super::traits::{GenerationParams, Provider};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI chat-completions client. Also serves any endpoint speaking the
/// same wire format under a different base URL.
pub struct OpenAiProvider {
    name: String,
    base_url: String,
    /// Pre-computed `"Bearer <key>"` header value.
    cached_auth_header: Option<String>,
    /// Whether a missing key is an error before any request is sent.
    requires_key: bool,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiProvider {
    pub fn new(api_key: Option<&str>, client: Client) -> Self {
        Self {
            name: "OpenAI".to_string(),
            base_url: OPENAI_BASE_URL.to_string(),
            cached_auth_header: bearer(api_key),
            requires_key: true,
            client,
        }
    }

    /// Self-hosted or third-party endpoint; the key is optional.
    pub fn compatible(name: &str, base_url: &str, api_key: Option<&str>, client: Client) -> Self {
        Self {
            name: name.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            cached_auth_header: bearer(api_key),
            requires_key: false,
            client,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_request<'a>(
        system_prompt: Option<&'a str>,
        message: &'a str,
        params: &'a GenerationParams,
    ) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system_prompt {
            messages.push(Message {
                role: "system",
                content: system,
            });
        }
        messages.push(Message {
            role: "user",
            content: message,
        });

        ChatRequest {
            model: &params.model,
            messages,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        }
    }

    fn extract_text(&self, response: ChatResponse) -> anyhow::Result<String> {
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .with_context(|| format!("No response from {}", self.name))
    }
}

fn bearer(api_key: Option<&str>) -> Option<String> {
    api_key
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(|key| format!("Bearer {key}"))
}

#[async_trait]
impl Provider for OpenAiProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn chat_with_system(
        &self,
        system_prompt: Option<&str>,
        message: &str,
        params: &GenerationParams,
    ) -> anyhow::Result<String> {
        if self.requires_key && self.cached_auth_header.is_none() {
            anyhow::bail!(
                "{} API key not set. Set OPENAI_API_KEY or api_key in ~/.larder/config.toml.",
                self.name
            );
        }

        let request = Self::build_request(system_prompt, message, params);
        let mut builder = self.client.post(self.endpoint()).json(&request);
        if let Some(auth) = &self.cached_auth_header {
            builder = builder.header("Authorization", auth);
        }

        let response = builder
            .send()
            .await
            .with_context(|| format!("{} request failed", self.name))?;
        if !response.status().is_success() {
            return Err(api_error(&self.name, response).await);
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .with_context(|| format!("{} returned an unreadable response", self.name))?;
        self.extract_text(chat_response)
    }
}
