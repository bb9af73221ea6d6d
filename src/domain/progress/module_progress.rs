//! Per-module progress state machine.
//!
//! Submodules move `not_started → in_progress → completed` with no back
//! transitions. The tracker records state; the completion policy (word
//! counts etc.) belongs to the caller.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::foundation::{SubmoduleId, Timestamp};

/// Status of one submodule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmoduleStatus {
    NotStarted,
    InProgress,
    Completed,
}

/// Progress through one submodule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmoduleProgress {
    pub status: SubmoduleStatus,
    pub completed_at: Option<Timestamp>,
    /// The chain position the user last worked at.
    pub current_position: u64,
}

impl SubmoduleProgress {
    fn fresh() -> Self {
        Self {
            status: SubmoduleStatus::NotStarted,
            completed_at: None,
            current_position: 0,
        }
    }
}

/// Progress record for one (user, module) pair.
///
/// Created lazily on first access; mutated only by entry-creation and
/// completion events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleProgress {
    pub submodules: HashMap<SubmoduleId, SubmoduleProgress>,
    pub last_accessed: Timestamp,
    pub unlocked_at: Option<Timestamp>,
}

impl ModuleProgress {
    /// Creates a locked, empty progress record.
    pub fn locked() -> Self {
        Self {
            submodules: HashMap::new(),
            last_accessed: Timestamp::now(),
            unlocked_at: None,
        }
    }

    /// Creates an unlocked, empty progress record.
    pub fn unlocked() -> Self {
        Self {
            unlocked_at: Some(Timestamp::now()),
            ..Self::locked()
        }
    }

    /// True once the module has been unlocked.
    pub fn is_unlocked(&self) -> bool {
        self.unlocked_at.is_some()
    }

    /// Marks the module unlocked. Idempotent: a second unlock keeps the
    /// original timestamp.
    pub fn unlock(&mut self) {
        if self.unlocked_at.is_none() {
            self.unlocked_at = Some(Timestamp::now());
        }
    }

    /// Moves a submodule to `in_progress` on first entry creation.
    ///
    /// Idempotent; never demotes a completed submodule.
    pub fn start_submodule(&mut self, submodule: &SubmoduleId, position: u64) {
        self.last_accessed = Timestamp::now();
        let progress = self
            .submodules
            .entry(submodule.clone())
            .or_insert_with(SubmoduleProgress::fresh);

        if progress.status == SubmoduleStatus::NotStarted {
            progress.status = SubmoduleStatus::InProgress;
        }
        if progress.status != SubmoduleStatus::Completed {
            progress.current_position = position;
        }
    }

    /// Marks a submodule `completed`.
    ///
    /// Idempotent: re-completing keeps the original timestamp. There is
    /// no path back out of `completed`.
    pub fn complete_submodule(&mut self, submodule: &SubmoduleId) {
        self.last_accessed = Timestamp::now();
        let progress = self
            .submodules
            .entry(submodule.clone())
            .or_insert_with(SubmoduleProgress::fresh);

        if progress.status != SubmoduleStatus::Completed {
            progress.status = SubmoduleStatus::Completed;
            progress.completed_at = Some(Timestamp::now());
        }
    }

    /// True when every submodule in the given declared set is completed.
    ///
    /// Submodules never touched count as incomplete.
    pub fn all_completed(&self, declared: &[SubmoduleId]) -> bool {
        !declared.is_empty()
            && declared.iter().all(|id| {
                self.submodules
                    .get(id)
                    .map(|p| p.status == SubmoduleStatus::Completed)
                    .unwrap_or(false)
            })
    }

    /// Status of one submodule (`not_started` when never touched).
    pub fn status_of(&self, submodule: &SubmoduleId) -> SubmoduleStatus {
        self.submodules
            .get(submodule)
            .map(|p| p.status)
            .unwrap_or(SubmoduleStatus::NotStarted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(id: &str) -> SubmoduleId {
        SubmoduleId::new(id).unwrap()
    }

    #[test]
    fn fresh_record_is_locked_and_empty() {
        let progress = ModuleProgress::locked();
        assert!(!progress.is_unlocked());
        assert_eq!(progress.status_of(&sub("welcome")), SubmoduleStatus::NotStarted);
    }

    #[test]
    fn start_moves_not_started_to_in_progress() {
        let mut progress = ModuleProgress::unlocked();
        progress.start_submodule(&sub("welcome"), 1);
        assert_eq!(progress.status_of(&sub("welcome")), SubmoduleStatus::InProgress);
    }

    #[test]
    fn start_updates_position_but_not_completed_state() {
        let mut progress = ModuleProgress::unlocked();
        progress.start_submodule(&sub("welcome"), 1);
        progress.complete_submodule(&sub("welcome"));

        progress.start_submodule(&sub("welcome"), 9);

        assert_eq!(progress.status_of(&sub("welcome")), SubmoduleStatus::Completed);
        assert_eq!(progress.submodules[&sub("welcome")].current_position, 1);
    }

    #[test]
    fn complete_sets_timestamp_once() {
        let mut progress = ModuleProgress::unlocked();
        progress.complete_submodule(&sub("welcome"));
        let first = progress.submodules[&sub("welcome")].completed_at;

        progress.complete_submodule(&sub("welcome"));
        assert_eq!(progress.submodules[&sub("welcome")].completed_at, first);
    }

    #[test]
    fn all_completed_requires_every_declared_submodule() {
        let mut progress = ModuleProgress::unlocked();
        let declared = vec![sub("a"), sub("b")];

        progress.complete_submodule(&sub("a"));
        assert!(!progress.all_completed(&declared));

        progress.complete_submodule(&sub("b"));
        assert!(progress.all_completed(&declared));
    }

    #[test]
    fn all_completed_is_false_for_empty_declaration() {
        let progress = ModuleProgress::unlocked();
        assert!(!progress.all_completed(&[]));
    }

    #[test]
    fn unlock_is_idempotent() {
        let mut progress = ModuleProgress::locked();
        progress.unlock();
        let first = progress.unlocked_at;

        progress.unlock();
        assert_eq!(progress.unlocked_at, first);
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&SubmoduleStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }
}
