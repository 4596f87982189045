use super::super::{GatewayConfig, ObservabilityConfig, StoreConfig};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub(super) const DEFAULT_PROVIDER: &str = "openai";
pub(super) const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Workspace directory - computed from home, not serialized
    #[serde(skip)]
    pub workspace_dir: PathBuf,
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,
    pub api_key: Option<String>,
    pub default_provider: Option<String>,
    pub default_model: Option<String>,
    #[serde(default = "default_temperature")]
    pub default_temperature: f64,
    /// Upper bound on generated tokens per recipe
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Base URL for an OpenAI-compatible endpoint (provider "compatible")
    #[serde(default)]
    pub provider_base_url: Option<String>,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workspace_dir: PathBuf::from("."),
            config_path: PathBuf::from("config.toml"),
            api_key: None,
            default_provider: Some(DEFAULT_PROVIDER.into()),
            default_model: Some(DEFAULT_MODEL.into()),
            default_temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            provider_base_url: None,
            store: StoreConfig::default(),
            gateway: GatewayConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Config {
    pub fn provider_name(&self) -> &str {
        self.default_provider.as_deref().unwrap_or(DEFAULT_PROVIDER)
    }

    pub fn model(&self) -> &str {
        self.default_model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.default_temperature) {
            return Err(ConfigError::Validation(format!(
                "default_temperature must be within 0.0..=2.0, got {}",
                self.default_temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::Validation(
                "max_tokens must be greater than zero".into(),
            ));
        }
        if self.gateway.request_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "gateway.request_timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
