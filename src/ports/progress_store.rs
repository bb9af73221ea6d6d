//! Progress store port - per-user module progress persistence.
//!
//! Progress is keyed by `(user, module)`. Stores hold one
//! [`ModuleProgress`] per key; the unlock policy lives in the application
//! layer, not here.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ModuleId, UserId};
use crate::domain::progress::ModuleProgress;

/// Port for module progress persistence.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Load a user's progress for one module, if any exists.
    async fn load(
        &self,
        user: &UserId,
        module: &ModuleId,
    ) -> Result<Option<ModuleProgress>, DomainError>;

    /// Load all of a user's module progress records.
    async fn load_all(&self, user: &UserId)
        -> Result<Vec<(ModuleId, ModuleProgress)>, DomainError>;

    /// Save (insert or replace) a user's progress for one module.
    async fn save(
        &self,
        user: &UserId,
        module: &ModuleId,
        progress: ModuleProgress,
    ) -> Result<(), DomainError>;
}
