//! Primary generator backend configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::generator::HttpGeneratorConfig;

/// Configuration for the primary text-generation backend.
///
/// The primary tier is optional: with `enabled = false` the dispatcher
/// runs cache + pattern fallback only, which is a supported deployment.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    /// Whether a primary backend should be constructed at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Bearer token for the backend, if it requires one
    pub api_key: Option<String>,

    /// Model name sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the generation endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on retryable failures
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

impl GeneratorConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build the adapter-level configuration from this section.
    pub fn to_http_config(&self) -> HttpGeneratorConfig {
        let mut config = HttpGeneratorConfig::new()
            .with_model(self.model.clone())
            .with_base_url(self.base_url.clone())
            .with_timeout(self.timeout())
            .with_max_retries(self.max_retries);
        if let Some(key) = &self.api_key {
            config = config.with_api_key(key.clone());
        }
        config
    }

    /// Validate generator configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.enabled {
            return Ok(());
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if self.model.is_empty() {
            return Err(ValidationError::MissingRequired("GENERATOR__MODEL"));
        }
        Ok(())
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_model() -> String {
    "llama3.2".to_string()
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_retries() -> u32 {
    1
}
