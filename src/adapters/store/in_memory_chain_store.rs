//! In-Memory Chain Store Adapter
//!
//! Stores conversation chains in memory, one ordered vector per scope.
//! Useful for testing and development; the write lock covers position
//! assignment and parent linkage so appends stay race-free.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::chain::{ChainEntry, ChainScope, DiscardReason};
use crate::domain::foundation::{EntryId, Timestamp};
use crate::ports::{ChainError, ChainStore};

/// In-memory chain storage.
#[derive(Debug, Clone)]
pub struct InMemoryChainStore {
    chains: Arc<RwLock<HashMap<ChainScope, Vec<ChainEntry>>>>,
}

impl InMemoryChainStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self {
            chains: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Clear all stored chains (useful for tests)
    pub async fn clear(&self) {
        self.chains.write().await.clear();
    }

    /// Get the number of scopes with at least one entry
    pub async fn scope_count(&self) -> usize {
        self.chains.read().await.len()
    }
}

impl Default for InMemoryChainStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChainStore for InMemoryChainStore {
    async fn append(
        &self,
        scope: &ChainScope,
        mut entry: ChainEntry,
    ) -> Result<ChainEntry, ChainError> {
        let mut chains = self.chains.write().await;
        let chain = chains.entry(scope.clone()).or_default();

        // Position assignment and parent linkage happen under the same
        // write lock, so positions are gap-free and strictly increasing.
        let next_position = chain
            .iter()
            .map(|e| e.chain_position)
            .max()
            .map_or(1, |max| max + 1);

        if let Some(parent_id) = entry.parent_id {
            let parent = chain
                .iter_mut()
                .find(|e| e.id == parent_id)
                .ok_or(ChainError::EntryNotFound { id: parent_id })?;
            parent.add_child(entry.id);
        }

        entry.chain_position = next_position;
        chain.push(entry.clone());
        Ok(entry)
    }

    async fn list_by_scope(&self, scope: &ChainScope) -> Result<Vec<ChainEntry>, ChainError> {
        let chains = self.chains.read().await;
        let mut entries = chains.get(scope).cloned().unwrap_or_default();
        entries.sort_by_key(|e| e.chain_position);
        Ok(entries)
    }

    async fn discard(
        &self,
        scope: &ChainScope,
        id: EntryId,
        reason: DiscardReason,
    ) -> Result<ChainEntry, ChainError> {
        let mut chains = self.chains.write().await;
        let chain = chains
            .get_mut(scope)
            .ok_or(ChainError::EntryNotFound { id })?;

        let entry = chain
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(ChainError::EntryNotFound { id })?;

        entry.discard(reason)?;
        entry.updated_at = Timestamp::now();
        Ok(entry.clone())
    }

    async fn find(&self, scope: &ChainScope, id: EntryId) -> Result<ChainEntry, ChainError> {
        let chains = self.chains.read().await;
        chains
            .get(scope)
            .and_then(|chain| chain.iter().find(|e| e.id == id))
            .cloned()
            .ok_or(ChainError::EntryNotFound { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chain::EntryKind;
    use crate::domain::foundation::{SessionId, UserId};

    fn scope() -> ChainScope {
        ChainScope::session(UserId::new("user-1").unwrap(), SessionId::new())
    }

    fn entry(content: &str, kind: EntryKind, parent: Option<EntryId>) -> ChainEntry {
        ChainEntry::new(content, kind, 0, parent).unwrap()
    }

    #[tokio::test]
    async fn append_assigns_increasing_positions() {
        let store = InMemoryChainStore::new();
        let scope = scope();

        let first = store
            .append(&scope, entry("first", EntryKind::UserResponse, None))
            .await
            .unwrap();
        let second = store
            .append(&scope, entry("second", EntryKind::AssistantPrompt, Some(first.id)))
            .await
            .unwrap();

        assert_eq!(first.chain_position, 1);
        assert_eq!(second.chain_position, 2);
    }

    #[tokio::test]
    async fn append_links_parent_to_child() {
        let store = InMemoryChainStore::new();
        let scope = scope();

        let parent = store
            .append(&scope, entry("hello", EntryKind::UserResponse, None))
            .await
            .unwrap();
        let child = store
            .append(&scope, entry("prompt", EntryKind::AssistantPrompt, Some(parent.id)))
            .await
            .unwrap();

        let stored_parent = store.find(&scope, parent.id).await.unwrap();
        assert!(stored_parent.child_ids.contains(&child.id));
    }

    #[tokio::test]
    async fn append_with_unknown_parent_fails() {
        let store = InMemoryChainStore::new();
        let scope = scope();

        let orphan = entry("prompt", EntryKind::AssistantPrompt, Some(EntryId::new()));
        let err = store.append(&scope, orphan).await.unwrap_err();
        assert!(matches!(err, ChainError::EntryNotFound { .. }));
    }

    #[tokio::test]
    async fn list_includes_discarded_entries_in_order() {
        let store = InMemoryChainStore::new();
        let scope = scope();

        let first = store
            .append(&scope, entry("one", EntryKind::UserResponse, None))
            .await
            .unwrap();
        let second = store
            .append(&scope, entry("two", EntryKind::AssistantPrompt, Some(first.id)))
            .await
            .unwrap();

        store
            .discard(&scope, second.id, DiscardReason::Shuffled)
            .await
            .unwrap();

        let entries = store.list_by_scope(&scope).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[1].discarded);
        assert_eq!(entries[1].chain_position, 2);
    }

    #[tokio::test]
    async fn discard_twice_fails() {
        let store = InMemoryChainStore::new();
        let scope = scope();

        let e = store
            .append(&scope, entry("one", EntryKind::UserResponse, None))
            .await
            .unwrap();
        store
            .discard(&scope, e.id, DiscardReason::Shuffled)
            .await
            .unwrap();

        let err = store
            .discard(&scope, e.id, DiscardReason::Shuffled)
            .await
            .unwrap_err();
        assert!(matches!(err, ChainError::Store(_)));
    }

    #[tokio::test]
    async fn unknown_scope_lists_empty() {
        let store = InMemoryChainStore::new();
        let entries = store.list_by_scope(&scope()).await.unwrap();
        assert!(entries.is_empty());
    }
}
