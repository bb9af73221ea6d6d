//! Generator port - interface for language-model backends.
//!
//! Abstracts all interactions with the text-generation service so the
//! dialogue pipeline can run against a local model server, a hosted API,
//! or a mock without caring which.
//!
//! # Design
//!
//! - Non-streaming only: journal prompts are short and the pipeline needs
//!   a whole reply before it can classify and cache it
//! - Provider-agnostic message format from the dialogue domain
//! - Error variants carry enough structure for the dispatcher to decide
//!   whether the next tier should take over

use async_trait::async_trait;

use crate::domain::dialogue::Message;

/// Port for language-model text generation.
///
/// Implementations connect to an external model server and translate
/// between its wire format and our domain types.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a single completion for a conversation transcript.
    async fn complete(&self, request: GenerationRequest) -> Result<GeneratedText, GeneratorError>;

    /// Get backend information (name, model).
    fn provider_info(&self) -> ProviderInfo;
}

/// Request for text generation.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Conversation transcript (history + current user message).
    pub messages: Vec<Message>,
    /// System instruction to guide model behavior.
    pub system_instruction: Option<String>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Temperature for response randomness.
    pub temperature: Option<f32>,
}

impl GenerationRequest {
    /// Creates an empty request.
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            system_instruction: None,
            max_tokens: None,
            temperature: None,
        }
    }

    /// Creates a request from an existing transcript.
    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self {
            messages,
            system_instruction: None,
            max_tokens: None,
            temperature: None,
        }
    }

    /// Adds a message to the transcript.
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Sets the system instruction.
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Sets the maximum tokens to generate.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Sets the temperature.
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self::new()
    }
}

/// Completed generation from the backend.
#[derive(Debug, Clone)]
pub struct GeneratedText {
    /// Generated content.
    pub content: String,
    /// Model that produced the response.
    pub model: String,
}

impl GeneratedText {
    /// Creates a new generated-text result.
    pub fn new(content: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: model.into(),
        }
    }
}

/// Backend information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderInfo {
    /// Backend name (e.g. "ollama", "mock").
    pub name: String,
    /// Model identifier (e.g. "llama3.2").
    pub model: String,
}

impl ProviderInfo {
    /// Creates new provider info.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// Generator errors.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Backend is unavailable.
    #[error("backend unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// Backend returned a non-success HTTP status.
    #[error("http error: status {status}")]
    Http {
        /// HTTP status code.
        status: u16,
    },

    /// Failed to parse the backend response.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),
}

impl GeneratorError {
    /// Creates a timeout error.
    pub fn timeout(timeout_secs: u32) -> Self {
        Self::Timeout { timeout_secs }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates an HTTP status error.
    pub fn http(status: u16) -> Self {
        Self::Http { status }
    }

    /// Creates a malformed-response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GeneratorError::Timeout { .. }
                | GeneratorError::Unavailable { .. }
                | GeneratorError::Network(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = GenerationRequest::new()
            .with_message(Message::user("I skipped lunch today"))
            .with_system_instruction("Be warm and supportive")
            .with_max_tokens(256)
            .with_temperature(0.7);

        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.system_instruction.as_deref(), Some("Be warm and supportive"));
        assert_eq!(request.max_tokens, Some(256));
        assert_eq!(request.temperature, Some(0.7));
    }

    #[test]
    fn test_timeout_is_retryable() {
        assert!(GeneratorError::timeout(30).is_retryable());
        assert!(GeneratorError::unavailable("connection refused").is_retryable());
        assert!(GeneratorError::network("dns failure").is_retryable());
    }

    #[test]
    fn test_auth_failure_is_not_retryable() {
        assert!(!GeneratorError::AuthenticationFailed.is_retryable());
        assert!(!GeneratorError::http(400).is_retryable());
        assert!(!GeneratorError::malformed("missing field").is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = GeneratorError::timeout(30);
        assert_eq!(err.to_string(), "request timed out after 30s");

        let err = GeneratorError::http(503);
        assert_eq!(err.to_string(), "http error: status 503");
    }
}
