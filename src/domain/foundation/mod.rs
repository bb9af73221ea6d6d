//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types that form the
//! vocabulary of the Hearthside domain.

mod errors;
mod ids;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{EntryId, ModuleId, SessionId, SubmoduleId, UserId};
pub use timestamp::Timestamp;
