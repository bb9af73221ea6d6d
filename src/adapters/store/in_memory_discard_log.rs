//! In-Memory Discard Log Adapter
//!
//! Append-only record store for replaced prompts, keyed by chain scope.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::chain::{ChainScope, DiscardedPromptRecord};
use crate::domain::foundation::DomainError;
use crate::ports::DiscardLog;

/// In-memory discard log.
#[derive(Debug, Clone)]
pub struct InMemoryDiscardLog {
    records: Arc<RwLock<HashMap<ChainScope, Vec<DiscardedPromptRecord>>>>,
}

impl InMemoryDiscardLog {
    /// Create a new in-memory log
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Total records across all scopes (useful for tests)
    pub async fn record_count(&self) -> usize {
        self.records.read().await.values().map(Vec::len).sum()
    }
}

impl Default for InMemoryDiscardLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DiscardLog for InMemoryDiscardLog {
    async fn record(
        &self,
        scope: &ChainScope,
        record: DiscardedPromptRecord,
    ) -> Result<(), DomainError> {
        let mut records = self.records.write().await;
        records.entry(scope.clone()).or_default().push(record);
        Ok(())
    }

    async fn list(&self, scope: &ChainScope) -> Result<Vec<DiscardedPromptRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records.get(scope).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chain::DiscardReason;
    use crate::domain::foundation::{SessionId, UserId};

    fn scope() -> ChainScope {
        ChainScope::session(UserId::new("user-1").unwrap(), SessionId::new())
    }

    #[tokio::test]
    async fn records_accumulate_in_order() {
        let log = InMemoryDiscardLog::new();
        let scope = scope();

        log.record(
            &scope,
            DiscardedPromptRecord::new(
                "What did breakfast feel like?",
                "I skipped it",
                DiscardReason::Shuffled,
                2,
                None,
                1,
            ),
        )
        .await
        .unwrap();
        log.record(
            &scope,
            DiscardedPromptRecord::new(
                "What would help tomorrow morning?",
                "I skipped it",
                DiscardReason::Shuffled,
                3,
                None,
                2,
            ),
        )
        .await
        .unwrap();

        let records = log.list(&scope).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].shuffle_count, 1);
        assert_eq!(records[1].shuffle_count, 2);
    }

    #[tokio::test]
    async fn unknown_scope_lists_empty() {
        let log = InMemoryDiscardLog::new();
        assert!(log.list(&scope()).await.unwrap().is_empty());
    }
}
