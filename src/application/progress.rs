//! Progress service - module unlocking on top of the state machine.
//!
//! The state machine in the domain layer tracks one module; this service
//! owns the single cross-module rule: when a module's last incomplete
//! submodule completes, the next module in catalog order is unlocked.
//! Unlocking is best-effort and idempotent, so a failed unlock is
//! retried on the user's next access instead of blocking the completion
//! that triggered it.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, ModuleId, SubmoduleId, UserId};
use crate::domain::progress::{ModuleCatalog, ModuleProgress, SubmoduleStatus};
use crate::ports::ProgressStore;

/// Application service for per-user module progress.
pub struct ProgressService {
    store: Arc<dyn ProgressStore>,
    catalog: ModuleCatalog,
}

impl ProgressService {
    /// Creates a progress service over the default catalog.
    pub fn new(store: Arc<dyn ProgressStore>) -> Self {
        Self::with_catalog(store, ModuleCatalog::with_defaults())
    }

    /// Creates a progress service over a specific catalog.
    pub fn with_catalog(store: Arc<dyn ProgressStore>, catalog: ModuleCatalog) -> Self {
        Self { store, catalog }
    }

    /// The catalog this service resolves modules against.
    pub fn catalog(&self) -> &ModuleCatalog {
        &self.catalog
    }

    /// Loads a user's progress for a module, creating the record lazily.
    ///
    /// The catalog's first module starts unlocked; everything else starts
    /// locked until its predecessor completes. Loading also retries any
    /// unlock that a previous completion failed to persist.
    pub async fn progress(
        &self,
        user: &UserId,
        module: &ModuleId,
    ) -> Result<ModuleProgress, DomainError> {
        self.require_module(module)?;

        if let Some(mut progress) = self.store.load(user, module).await? {
            // A completed predecessor means this module should be
            // unlocked even if the original unlock write was lost.
            if !progress.is_unlocked() && self.predecessor_completed(user, module).await? {
                progress.unlock();
                self.store.save(user, module, progress.clone()).await?;
                tracing::debug!(user = %user.as_str(), module = %module.as_str(), "unlock retried on access");
            }
            return Ok(progress);
        }

        let is_first = self
            .catalog
            .first()
            .map(|m| &m.id == module)
            .unwrap_or(false);
        let progress = if is_first || self.predecessor_completed(user, module).await? {
            ModuleProgress::unlocked()
        } else {
            ModuleProgress::locked()
        };
        self.store.save(user, module, progress.clone()).await?;
        Ok(progress)
    }

    /// Marks a submodule in progress on its first entry.
    ///
    /// # Errors
    ///
    /// - `MODULE_NOT_FOUND` / `SUBMODULE_NOT_FOUND` for unknown ids
    /// - `INVALID_STATE_TRANSITION` when the module is still locked
    pub async fn start_submodule(
        &self,
        user: &UserId,
        module: &ModuleId,
        submodule: &SubmoduleId,
        position: u64,
    ) -> Result<(), DomainError> {
        self.require_submodule(module, submodule)?;

        let mut progress = self.progress(user, module).await?;
        if !progress.is_unlocked() {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Module is locked",
            )
            .with_detail("module", module.as_str()));
        }

        progress.start_submodule(submodule, position);
        self.store.save(user, module, progress).await
    }

    /// Marks a submodule completed, unlocking the next module when this
    /// was the module's last incomplete submodule.
    ///
    /// Whether a submodule qualifies as complete (word counts etc.) is
    /// the caller's policy; this method only records the transition.
    pub async fn complete_submodule(
        &self,
        user: &UserId,
        module: &ModuleId,
        submodule: &SubmoduleId,
    ) -> Result<(), DomainError> {
        let declared = self.require_module(module)?.submodule_ids();
        self.require_submodule(module, submodule)?;

        let mut progress = self.progress(user, module).await?;
        if !progress.is_unlocked() {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Module is locked",
            )
            .with_detail("module", module.as_str()));
        }

        progress.complete_submodule(submodule);
        let module_done = progress.all_completed(&declared);
        self.store.save(user, module, progress).await?;

        if module_done {
            // Best effort: a failure here is logged and repaired on the
            // next progress() call, never surfaced to the completion.
            if let Err(err) = self.unlock_next(user, module).await {
                tracing::warn!(
                    user = %user.as_str(),
                    module = %module.as_str(),
                    error = %err,
                    "failed to unlock next module"
                );
            }
        }

        Ok(())
    }

    /// All of a user's modules in catalog order, paired with their
    /// stored progress where any exists.
    ///
    /// Read-only: modules the user never touched come back as `None`
    /// rather than being created.
    pub async fn overview(
        &self,
        user: &UserId,
    ) -> Result<Vec<(ModuleId, Option<ModuleProgress>)>, DomainError> {
        let mut stored: std::collections::HashMap<ModuleId, ModuleProgress> =
            self.store.load_all(user).await?.into_iter().collect();

        Ok(self
            .catalog
            .modules()
            .iter()
            .map(|m| (m.id.clone(), stored.remove(&m.id)))
            .collect())
    }

    /// Status of one submodule without mutating anything.
    pub async fn submodule_status(
        &self,
        user: &UserId,
        module: &ModuleId,
        submodule: &SubmoduleId,
    ) -> Result<SubmoduleStatus, DomainError> {
        self.require_submodule(module, submodule)?;
        let progress = self.progress(user, module).await?;
        Ok(progress.status_of(submodule))
    }

    async fn unlock_next(&self, user: &UserId, module: &ModuleId) -> Result<(), DomainError> {
        let Some(next) = self.catalog.next_after(module) else {
            return Ok(());
        };

        let mut progress = self
            .store
            .load(user, &next.id)
            .await?
            .unwrap_or_else(ModuleProgress::locked);
        progress.unlock();
        self.store.save(user, &next.id, progress).await?;
        tracing::info!(
            user = %user.as_str(),
            module = %next.id.as_str(),
            "module unlocked"
        );
        Ok(())
    }

    async fn predecessor_completed(
        &self,
        user: &UserId,
        module: &ModuleId,
    ) -> Result<bool, DomainError> {
        let Some(prev) = self.predecessor(module) else {
            return Ok(false);
        };
        let Some(prev_progress) = self.store.load(user, &prev.id).await? else {
            return Ok(false);
        };
        Ok(prev_progress.all_completed(&prev.submodule_ids()))
    }

    fn predecessor(&self, module: &ModuleId) -> Option<&crate::domain::progress::Module> {
        self.catalog
            .modules()
            .iter()
            .take_while(|m| &m.id != module)
            .last()
    }

    fn require_module(
        &self,
        module: &ModuleId,
    ) -> Result<&crate::domain::progress::Module, DomainError> {
        self.catalog.module(module).ok_or_else(|| {
            DomainError::new(ErrorCode::ModuleNotFound, "Unknown module")
                .with_detail("module", module.as_str())
        })
    }

    fn require_submodule(
        &self,
        module: &ModuleId,
        submodule: &SubmoduleId,
    ) -> Result<(), DomainError> {
        let declared = self.require_module(module)?;
        if declared.submodule(submodule).is_none() {
            return Err(
                DomainError::new(ErrorCode::SubmoduleNotFound, "Unknown submodule")
                    .with_detail("module", module.as_str())
                    .with_detail("submodule", submodule.as_str()),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::store::InMemoryProgressStore;

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    fn module(id: &str) -> ModuleId {
        ModuleId::new(id).unwrap()
    }

    fn sub(id: &str) -> SubmoduleId {
        SubmoduleId::new(id).unwrap()
    }

    fn service() -> ProgressService {
        ProgressService::new(Arc::new(InMemoryProgressStore::new()))
    }

    async fn complete_module(service: &ProgressService, user: &UserId, module_id: &ModuleId) {
        let ids = service.catalog().module(module_id).unwrap().submodule_ids();
        for id in ids {
            service
                .complete_submodule(user, module_id, &id)
                .await
                .unwrap();
        }
    }

    mod lifecycle {
        use super::*;

        #[tokio::test]
        async fn first_module_starts_unlocked() {
            let service = service();
            let progress = service.progress(&user(), &module("introduction")).await.unwrap();
            assert!(progress.is_unlocked());
        }

        #[tokio::test]
        async fn later_module_starts_locked() {
            let service = service();
            let progress = service.progress(&user(), &module("awareness")).await.unwrap();
            assert!(!progress.is_unlocked());
        }

        #[tokio::test]
        async fn unknown_module_is_rejected() {
            let service = service();
            let err = service.progress(&user(), &module("nonexistent")).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::ModuleNotFound);
        }

        #[tokio::test]
        async fn starting_in_locked_module_is_rejected() {
            let service = service();
            let err = service
                .start_submodule(&user(), &module("awareness"), &sub("noticing"), 1)
                .await
                .unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidStateTransition);
        }

        #[tokio::test]
        async fn start_then_status_is_in_progress() {
            let service = service();
            let user = user();
            let module = module("introduction");

            service
                .start_submodule(&user, &module, &sub("welcome"), 1)
                .await
                .unwrap();

            let status = service
                .submodule_status(&user, &module, &sub("welcome"))
                .await
                .unwrap();
            assert_eq!(status, SubmoduleStatus::InProgress);
        }
    }

    mod unlocking {
        use super::*;

        #[tokio::test]
        async fn completing_final_submodule_unlocks_next_module() {
            let service = service();
            let user = user();

            complete_module(&service, &user, &module("introduction")).await;

            let next = service.progress(&user, &module("awareness")).await.unwrap();
            assert!(next.is_unlocked());
        }

        #[tokio::test]
        async fn partial_completion_does_not_unlock() {
            let service = service();
            let user = user();

            service
                .complete_submodule(&user, &module("introduction"), &sub("welcome"))
                .await
                .unwrap();

            let next = service.progress(&user, &module("awareness")).await.unwrap();
            assert!(!next.is_unlocked());
        }

        #[tokio::test]
        async fn re_completion_is_idempotent() {
            let service = service();
            let user = user();
            let module = module("introduction");

            complete_module(&service, &user, &module).await;
            let first_unlock = service
                .progress(&user, &ModuleId::new("awareness").unwrap())
                .await
                .unwrap()
                .unlocked_at;

            // Completing again must not move the unlock timestamp.
            service
                .complete_submodule(&user, &module, &sub("welcome"))
                .await
                .unwrap();
            let second_unlock = service
                .progress(&user, &ModuleId::new("awareness").unwrap())
                .await
                .unwrap()
                .unlocked_at;

            assert_eq!(first_unlock, second_unlock);
        }

        #[tokio::test]
        async fn lost_unlock_is_repaired_on_access() {
            let store = Arc::new(InMemoryProgressStore::new());
            let service = ProgressService::new(store.clone());
            let user = user();

            complete_module(&service, &user, &module("introduction")).await;

            // Simulate a lost unlock write.
            store
                .save(&user, &module("awareness"), ModuleProgress::locked())
                .await
                .unwrap();

            let repaired = service.progress(&user, &module("awareness")).await.unwrap();
            assert!(repaired.is_unlocked());
        }

        #[tokio::test]
        async fn completing_last_module_has_no_next_to_unlock() {
            let service = service();
            let user = user();

            complete_module(&service, &user, &module("introduction")).await;
            complete_module(&service, &user, &module("awareness")).await;

            let last = service.progress(&user, &module("awareness")).await.unwrap();
            let declared = service
                .catalog()
                .module(&module("awareness"))
                .unwrap()
                .submodule_ids();
            assert!(last.all_completed(&declared));
        }
    }
}
