//! HTTP Generator - Implementation of Generator for local model servers.
//!
//! Talks the Ollama-style `/api/generate` protocol: a single flattened
//! prompt string in, a single JSON response out. This is the primary
//! backend for journal dialogue; when it fails, the dispatcher falls
//! back to pattern replies without surfacing the error.
//!
//! # Configuration
//!
//! ```ignore
//! let config = HttpGeneratorConfig::new()
//!     .with_model("llama3.2")
//!     .with_base_url("http://localhost:11434");
//!
//! let generator = HttpGenerator::new(config);
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::dialogue::Role;
use crate::ports::{GeneratedText, GenerationRequest, Generator, GeneratorError, ProviderInfo};

/// Default system instruction for journal dialogue.
///
/// Sent with every request unless the caller supplies its own.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are a warm, supportive companion for \
someone keeping a recovery journal. Respond with empathy in two or three sentences. \
Never give medical advice, never mention numbers, weights, or calories, and gently \
encourage reflection.";

/// Configuration for the HTTP generator.
#[derive(Debug, Clone)]
pub struct HttpGeneratorConfig {
    /// Optional bearer token for authenticated deployments.
    api_key: Option<Secret<String>>,
    /// Model to use (e.g. "llama3.2").
    pub model: String,
    /// Base URL for the server (default: http://localhost:11434).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
}

impl HttpGeneratorConfig {
    /// Creates a configuration with local-server defaults.
    pub fn new() -> Self {
        Self {
            api_key: None,
            model: "llama3.2".to_string(),
            base_url: "http://localhost:11434".to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 1,
        }
    }

    /// Sets the bearer token.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(Secret::new(api_key.into()));
        self
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

impl Default for HttpGeneratorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP generator implementation.
pub struct HttpGenerator {
    config: HttpGeneratorConfig,
    client: Client,
}

impl HttpGenerator {
    /// Creates a new generator with the given configuration.
    pub fn new(config: HttpGeneratorConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Builds the generate endpoint URL.
    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.config.base_url)
    }

    /// Flattens a transcript into the single prompt string the protocol wants.
    ///
    /// System instruction first, then the conversation as labeled turns,
    /// then an open `Assistant:` line for the model to complete.
    fn build_prompt(&self, request: &GenerationRequest) -> String {
        let mut prompt = String::new();

        let instruction = request
            .system_instruction
            .as_deref()
            .unwrap_or(DEFAULT_SYSTEM_INSTRUCTION);
        prompt.push_str(instruction);
        prompt.push_str("\n\n");

        for msg in &request.messages {
            let label = match msg.role {
                Role::System => "Instruction",
                Role::User => "User",
                Role::Assistant => "Assistant",
            };
            prompt.push_str(label);
            prompt.push_str(": ");
            prompt.push_str(&msg.content);
            prompt.push('\n');
        }

        prompt.push_str("Assistant:");
        prompt
    }

    /// Converts our request to the wire format.
    fn to_wire_request(&self, request: &GenerationRequest) -> WireRequest {
        WireRequest {
            model: self.config.model.clone(),
            prompt: self.build_prompt(request),
            stream: false,
            options: WireOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        }
    }

    /// Sends a request and classifies transport failures.
    async fn send_request(&self, request: &GenerationRequest) -> Result<Response, GeneratorError> {
        let wire_request = self.to_wire_request(request);

        let mut builder = self
            .client
            .post(self.generate_url())
            .header("Content-Type", "application/json")
            .json(&wire_request);

        if let Some(ref key) = self.config.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", key.expose_secret()));
        }

        builder.send().await.map_err(|e| {
            if e.is_timeout() {
                GeneratorError::timeout(self.config.timeout.as_secs() as u32)
            } else if e.is_connect() {
                GeneratorError::unavailable(format!("Connection failed: {}", e))
            } else {
                GeneratorError::network(e.to_string())
            }
        })
    }

    /// Maps non-success statuses to typed errors.
    async fn handle_response_status(
        &self,
        response: Response,
    ) -> Result<Response, GeneratorError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        match status.as_u16() {
            401 | 403 => Err(GeneratorError::AuthenticationFailed),
            500..=599 => {
                let body = response.text().await.unwrap_or_default();
                Err(GeneratorError::unavailable(format!(
                    "Server error {}: {}",
                    status, body
                )))
            }
            other => Err(GeneratorError::http(other)),
        }
    }

    /// Parses the completed response body.
    async fn parse_response(&self, response: Response) -> Result<GeneratedText, GeneratorError> {
        let response = self.handle_response_status(response).await?;

        let wire: WireResponse = response
            .json()
            .await
            .map_err(|e| GeneratorError::malformed(format!("Failed to parse response: {}", e)))?;

        let content = wire.response.trim().to_string();
        if content.is_empty() {
            return Err(GeneratorError::malformed("Empty completion in response"));
        }

        Ok(GeneratedText::new(content, wire.model))
    }
}

#[async_trait]
impl Generator for HttpGenerator {
    async fn complete(&self, request: GenerationRequest) -> Result<GeneratedText, GeneratorError> {
        let mut last_error = GeneratorError::network("No attempts made");
        let mut retry_count = 0;

        while retry_count <= self.config.max_retries {
            match self.send_request(&request).await {
                Ok(response) => match self.parse_response(response).await {
                    Ok(text) => return Ok(text),
                    Err(err) => {
                        if !err.is_retryable() || retry_count >= self.config.max_retries {
                            return Err(err);
                        }
                        tracing::warn!("generation attempt {} failed: {}", retry_count + 1, err);
                        last_error = err;
                    }
                },
                Err(err) => {
                    if !err.is_retryable() || retry_count >= self.config.max_retries {
                        return Err(err);
                    }
                    tracing::warn!("generation attempt {} failed: {}", retry_count + 1, err);
                    last_error = err;
                }
            }

            // Exponential backoff: 1s, 2s, 4s, ...
            let delay = Duration::from_secs(1 << retry_count);
            sleep(delay).await;
            retry_count += 1;
        }

        Err(last_error)
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("ollama", &self.config.model)
    }
}

// ----- Wire types -----

#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: WireOptions,
}

#[derive(Debug, Serialize)]
struct WireOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    model: String,
    response: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dialogue::Message;

    #[test]
    fn config_builder_works() {
        let config = HttpGeneratorConfig::new()
            .with_model("mistral")
            .with_base_url("http://model-server:11434")
            .with_timeout(Duration::from_secs(10))
            .with_max_retries(2);

        assert_eq!(config.model, "mistral");
        assert_eq!(config.base_url, "http://model-server:11434");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.max_retries, 2);
    }

    #[test]
    fn prompt_flattens_transcript_with_labels() {
        let generator = HttpGenerator::new(HttpGeneratorConfig::new());
        let request = GenerationRequest::new()
            .with_message(Message::user("I skipped breakfast"))
            .with_message(Message::assistant("That sounds hard. What was going on?"))
            .with_message(Message::user("I was anxious about work"));

        let prompt = generator.build_prompt(&request);

        assert!(prompt.starts_with(DEFAULT_SYSTEM_INSTRUCTION));
        assert!(prompt.contains("User: I skipped breakfast\n"));
        assert!(prompt.contains("Assistant: That sounds hard. What was going on?\n"));
        assert!(prompt.ends_with("Assistant:"));
    }

    #[test]
    fn prompt_uses_caller_instruction_when_set() {
        let generator = HttpGenerator::new(HttpGeneratorConfig::new());
        let request = GenerationRequest::new()
            .with_system_instruction("Summarize in one sentence.")
            .with_message(Message::user("Today was better"));

        let prompt = generator.build_prompt(&request);

        assert!(prompt.starts_with("Summarize in one sentence."));
        assert!(!prompt.contains(DEFAULT_SYSTEM_INSTRUCTION));
    }

    #[test]
    fn wire_request_omits_unset_options() {
        let generator = HttpGenerator::new(HttpGeneratorConfig::new());
        let request = GenerationRequest::new().with_message(Message::user("hi"));

        let wire = generator.to_wire_request(&request);
        let json = serde_json::to_string(&wire).unwrap();

        assert!(json.contains("\"stream\":false"));
        assert!(!json.contains("temperature"));
        assert!(!json.contains("num_predict"));
    }

    #[test]
    fn provider_info_names_backend() {
        let generator =
            HttpGenerator::new(HttpGeneratorConfig::new().with_model("llama3.2"));
        let info = generator.provider_info();
        assert_eq!(info.name, "ollama");
        assert_eq!(info.model, "llama3.2");
    }
}
