//! Core domain model: pure types and logic with no I/O.
//!
//! Everything in here is deterministic and synchronous. Persistence and
//! language-model access live behind the traits in [`crate::ports`].

pub mod chain;
pub mod dialogue;
pub mod foundation;
pub mod progress;
