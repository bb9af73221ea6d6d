//! In-Memory Progress Store Adapter
//!
//! Per-user module progress, keyed by `(user, module)`.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ModuleId, UserId};
use crate::domain::progress::ModuleProgress;
use crate::ports::ProgressStore;

/// In-memory progress storage.
#[derive(Debug, Clone)]
pub struct InMemoryProgressStore {
    records: Arc<RwLock<HashMap<(UserId, ModuleId), ModuleProgress>>>,
}

impl InMemoryProgressStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Clear all stored progress (useful for tests)
    pub async fn clear(&self) {
        self.records.write().await.clear();
    }
}

impl Default for InMemoryProgressStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProgressStore for InMemoryProgressStore {
    async fn load(
        &self,
        user: &UserId,
        module: &ModuleId,
    ) -> Result<Option<ModuleProgress>, DomainError> {
        let records = self.records.read().await;
        Ok(records.get(&(user.clone(), module.clone())).cloned())
    }

    async fn load_all(
        &self,
        user: &UserId,
    ) -> Result<Vec<(ModuleId, ModuleProgress)>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|((u, _), _)| u == user)
            .map(|((_, m), p)| (m.clone(), p.clone()))
            .collect())
    }

    async fn save(
        &self,
        user: &UserId,
        module: &ModuleId,
        progress: ModuleProgress,
    ) -> Result<(), DomainError> {
        let mut records = self.records.write().await;
        records.insert((user.clone(), module.clone()), progress);
        Ok(())
    }
}
