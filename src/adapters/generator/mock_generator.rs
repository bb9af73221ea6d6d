//! Mock Generator for testing.
//!
//! Configurable implementation of the Generator port so pipeline and
//! service tests can run without a model server.
//!
//! # Features
//!
//! - Pre-configured responses, consumed in order
//! - Simulated delays for timeout testing
//! - Error injection for failover testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let generator = MockGenerator::new()
//!     .with_response("That sounds like a hard morning.")
//!     .with_delay(Duration::from_millis(50));
//!
//! let text = generator.complete(request).await?;
//! assert_eq!(text.content, "That sounds like a hard morning.");
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{GeneratedText, GenerationRequest, Generator, GeneratorError, ProviderInfo};

/// Mock generator for testing.
#[derive(Debug, Clone)]
pub struct MockGenerator {
    /// Pre-configured responses (consumed in order).
    responses: Arc<Mutex<VecDeque<MockOutcome>>>,
    /// Provider info to return.
    info: ProviderInfo,
    /// Simulated latency per request.
    delay: Duration,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<GenerationRequest>>>,
}

/// A configured mock outcome.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Return a successful completion.
    Success { content: String },
    /// Return an error.
    Error(MockError),
}

/// Mock error types for failover testing.
#[derive(Debug, Clone)]
pub enum MockError {
    /// Simulate a timeout.
    Timeout { timeout_secs: u32 },
    /// Simulate authentication failure.
    AuthenticationFailed,
    /// Simulate backend unavailable.
    Unavailable { message: String },
    /// Simulate an HTTP status failure.
    Http { status: u16 },
    /// Simulate an unparseable response.
    MalformedResponse { message: String },
    /// Simulate a network error.
    Network { message: String },
}

impl From<MockError> for GeneratorError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::Timeout { timeout_secs } => GeneratorError::timeout(timeout_secs),
            MockError::AuthenticationFailed => GeneratorError::AuthenticationFailed,
            MockError::Unavailable { message } => GeneratorError::unavailable(message),
            MockError::Http { status } => GeneratorError::http(status),
            MockError::MalformedResponse { message } => GeneratorError::malformed(message),
            MockError::Network { message } => GeneratorError::network(message),
        }
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGenerator {
    /// Creates a new mock generator with default settings.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            info: ProviderInfo::new("mock", "mock-model-1"),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Adds a successful response to the queue.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        let mut responses = self.responses.lock().unwrap();
        responses.push_back(MockOutcome::Success {
            content: content.into(),
        });
        drop(responses);
        self
    }

    /// Adds an error outcome to the queue.
    pub fn with_error(self, error: MockError) -> Self {
        let mut responses = self.responses.lock().unwrap();
        responses.push_back(MockOutcome::Error(error));
        drop(responses);
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of calls made to this generator.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<GenerationRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Clears the call history.
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Gets the next outcome or a default success.
    fn next_outcome(&self) -> MockOutcome {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| MockOutcome::Success {
                content: "Mock response".to_string(),
            })
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn complete(&self, request: GenerationRequest) -> Result<GeneratedText, GeneratorError> {
        self.calls.lock().unwrap().push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_outcome() {
            MockOutcome::Success { content } => {
                Ok(GeneratedText::new(content, self.info.model.clone()))
            }
            MockOutcome::Error(err) => Err(err.into()),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dialogue::Message;

    fn request(text: &str) -> GenerationRequest {
        GenerationRequest::new().with_message(Message::user(text))
    }

    #[tokio::test]
    async fn responses_consumed_in_order() {
        let generator = MockGenerator::new()
            .with_response("first")
            .with_response("second");

        let a = generator.complete(request("one")).await.unwrap();
        let b = generator.complete(request("two")).await.unwrap();

        assert_eq!(a.content, "first");
        assert_eq!(b.content, "second");
    }

    #[tokio::test]
    async fn default_response_when_queue_empty() {
        let generator = MockGenerator::new();
        let text = generator.complete(request("hi")).await.unwrap();
        assert_eq!(text.content, "Mock response");
    }

    #[tokio::test]
    async fn injected_error_is_returned() {
        let generator = MockGenerator::new().with_error(MockError::Timeout { timeout_secs: 30 });
        let err = generator.complete(request("hi")).await.unwrap_err();
        assert!(matches!(err, GeneratorError::Timeout { timeout_secs: 30 }));
    }

    #[tokio::test]
    async fn calls_are_tracked() {
        let generator = MockGenerator::new();
        let _ = generator.complete(request("one")).await;
        let _ = generator.complete(request("two")).await;

        assert_eq!(generator.call_count(), 2);
        assert_eq!(generator.get_calls()[1].messages[0].content, "two");

        generator.clear_calls();
        assert_eq!(generator.call_count(), 0);
    }
}
