//! Generator adapters.
//!
//! Implementations of the Generator port: an HTTP adapter for
//! Ollama-style model servers and a configurable mock for tests.

mod http_generator;
mod mock_generator;

pub use http_generator::{HttpGenerator, HttpGeneratorConfig, DEFAULT_SYSTEM_INSTRUCTION};
pub use mock_generator::{MockError, MockGenerator, MockOutcome};
