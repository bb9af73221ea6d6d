//! In-memory store adapters.
//!
//! Stand-ins for a document store behind the persistence ports. Suitable
//! for tests, development, and single-process deployments.

mod in_memory_chain_store;
mod in_memory_discard_log;
mod in_memory_progress_store;

pub use in_memory_chain_store::InMemoryChainStore;
pub use in_memory_discard_log::InMemoryDiscardLog;
pub use in_memory_progress_store::InMemoryProgressStore;
