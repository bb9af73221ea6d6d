//! Ports - interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `Generator` - language-model text generation
//! - `ChainStore` - conversation chain persistence
//! - `DiscardLog` - write-once discarded-prompt records
//! - `ProgressStore` - per-user module progress persistence

mod chain_store;
mod discard_log;
mod generator;
mod progress_store;

pub use chain_store::{ChainError, ChainStore};
pub use discard_log::DiscardLog;
pub use generator::{
    GeneratedText, GenerationRequest, Generator, GeneratorError, ProviderInfo,
};
pub use progress_store::ProgressStore;
