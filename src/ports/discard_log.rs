//! Discard log port - write-once records of replaced prompts.
//!
//! Every shuffled or timed-out assistant prompt leaves a
//! [`DiscardedPromptRecord`] behind. The log is append-only and scoped the
//! same way chains are, so later analysis can line records up against the
//! chain they came from.

use async_trait::async_trait;

use crate::domain::chain::{ChainScope, DiscardedPromptRecord};
use crate::domain::foundation::DomainError;

/// Port for persisting discarded-prompt records.
#[async_trait]
pub trait DiscardLog: Send + Sync {
    /// Append a record to the scope's log.
    ///
    /// # Errors
    ///
    /// Returns a `STORE_ERROR` on persistence failure.
    async fn record(
        &self,
        scope: &ChainScope,
        record: DiscardedPromptRecord,
    ) -> Result<(), DomainError>;

    /// List all records for a scope in recording order.
    ///
    /// An unknown scope yields an empty list.
    async fn list(&self, scope: &ChainScope) -> Result<Vec<DiscardedPromptRecord>, DomainError>;
}
