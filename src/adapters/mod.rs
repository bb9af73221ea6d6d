//! Adapters - implementations of ports against concrete technology.
//!
//! - `generator` - HTTP model-server adapter and test mock
//! - `store` - in-memory persistence adapters

pub mod generator;
pub mod store;
