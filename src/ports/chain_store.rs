//! Chain store port - persistence for branching conversation chains.
//!
//! One chain per scope (a journaling session or a module submodule).
//! Entries are append-only; removal is a soft delete that flips the
//! `discarded` flag in place.
//!
//! # Design
//!
//! - **Store-assigned positions**: `append` computes `chain_position` as
//!   max-in-scope + 1 under a single store-level write lock, so ordering
//!   is race-free without caller coordination
//! - **Soft delete only**: discarded entries stay in the chain and keep
//!   their position
//! - **Parent linkage**: appending an entry with a `parent_id` also adds
//!   the new id to the parent's `child_ids`

use async_trait::async_trait;

use crate::domain::chain::{ChainEntry, ChainScope, DiscardReason};
use crate::domain::foundation::{DomainError, EntryId};

/// Errors from chain persistence and chain-level invariants.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// The scope has no entries.
    #[error("chain scope is empty: {scope}")]
    ScopeEmpty {
        /// Display form of the scope.
        scope: String,
    },

    /// No entry with the given id exists in the scope.
    #[error("entry not found: {id}")]
    EntryNotFound {
        /// The missing entry id.
        id: EntryId,
    },

    /// The operation requires the last live entry to be a user response.
    #[error("last entry in scope is not a user response")]
    NotAUserResponse,

    /// Concurrent append detected by a multi-writer store.
    #[error("chain write conflict in scope: {scope}")]
    WriteConflict {
        /// Display form of the scope.
        scope: String,
    },

    /// Underlying store failure.
    #[error("store error: {0}")]
    Store(#[from] DomainError),
}

impl ChainError {
    /// Creates a scope-empty error.
    pub fn scope_empty(scope: &ChainScope) -> Self {
        Self::ScopeEmpty {
            scope: scope.to_string(),
        }
    }

    /// Creates an entry-not-found error.
    pub fn entry_not_found(id: EntryId) -> Self {
        Self::EntryNotFound { id }
    }

    /// Creates a write-conflict error.
    pub fn write_conflict(scope: &ChainScope) -> Self {
        Self::WriteConflict {
            scope: scope.to_string(),
        }
    }
}

/// Port for conversation chain persistence.
#[async_trait]
pub trait ChainStore: Send + Sync {
    /// Append an entry to a scope's chain.
    ///
    /// The store assigns `chain_position` and links the entry to its
    /// parent. Returns the entry as stored.
    ///
    /// # Errors
    ///
    /// - `EntryNotFound` if `parent_id` names an entry not in the scope
    /// - `WriteConflict` if a concurrent append won the position race
    /// - `Store` on persistence failure
    async fn append(&self, scope: &ChainScope, entry: ChainEntry)
        -> Result<ChainEntry, ChainError>;

    /// List all entries in a scope, position-ascending, discarded included.
    ///
    /// An unknown scope yields an empty list, not an error.
    async fn list_by_scope(&self, scope: &ChainScope) -> Result<Vec<ChainEntry>, ChainError>;

    /// Soft-delete an entry, recording why.
    ///
    /// Returns the entry as stored after the discard.
    ///
    /// # Errors
    ///
    /// - `EntryNotFound` if the entry is not in the scope
    /// - `Store` wrapping `ALREADY_DISCARDED` if it was discarded before
    async fn discard(
        &self,
        scope: &ChainScope,
        id: EntryId,
        reason: DiscardReason,
    ) -> Result<ChainEntry, ChainError>;

    /// Find a single entry by id within a scope.
    async fn find(&self, scope: &ChainScope, id: EntryId) -> Result<ChainEntry, ChainError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;

    #[test]
    fn test_scope_empty_display() {
        let scope = ChainScope::session(
            UserId::new("user-1").unwrap(),
            crate::domain::foundation::SessionId::new(),
        );
        let err = ChainError::scope_empty(&scope);
        assert!(err.to_string().starts_with("chain scope is empty"));
    }

    #[test]
    fn test_store_error_conversion() {
        let inner = DomainError::store("write failed");
        let err: ChainError = inner.into();
        assert!(matches!(err, ChainError::Store(_)));
    }
}
