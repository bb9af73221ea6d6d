//! Chain service - appends, branching, and the reprompt protocol.
//!
//! Wraps the chain store with the rules that keep a scope's chain
//! well-formed: user responses answer the live assistant prompt,
//! assistant prompts answer the latest user response, and shuffling
//! replaces a prompt by soft-deleting it and appending a sibling with
//! the same parent.
//!
//! Reprompting is the one operation here that is allowed to fail
//! outward: when follow-up generation fails there is no honest reply to
//! substitute, so the caller gets a typed error plus a discard record
//! documenting the attempt.

use std::sync::Arc;

use crate::domain::chain::{
    ChainEntry, ChainScope, DiscardReason, DiscardedPromptRecord, EntryKind, PromptContext,
};
use crate::domain::dialogue::{follow_up_instruction, parse_follow_up_questions};
use crate::ports::{
    ChainError, ChainStore, DiscardLog, GenerationRequest, Generator, GeneratorError,
};

/// Errors from the reprompt protocol.
#[derive(Debug, thiserror::Error)]
pub enum RepromptError {
    /// Follow-up generation failed; a timeout discard record was written.
    #[error("follow-up generation failed: {source}")]
    GenerationFailed {
        #[source]
        source: GeneratorError,
    },

    /// The chain rejected the operation.
    #[error(transparent)]
    Chain(#[from] ChainError),
}

/// Outcome of a successful reprompt.
#[derive(Debug, Clone)]
pub struct RepromptOutcome {
    /// The replacement prompt, as appended to the chain.
    pub entry: ChainEntry,
    /// All generated follow-up questions; `entry.content` is the first.
    pub questions: Vec<String>,
}

/// Application service for conversation chains.
pub struct ChainService {
    store: Arc<dyn ChainStore>,
    discard_log: Arc<dyn DiscardLog>,
    generator: Arc<dyn Generator>,
}

impl ChainService {
    /// Creates a chain service.
    pub fn new(
        store: Arc<dyn ChainStore>,
        discard_log: Arc<dyn DiscardLog>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self {
            store,
            discard_log,
            generator,
        }
    }

    /// Appends a user response to the scope's chain.
    ///
    /// The response is parented to the live assistant prompt it answers,
    /// or left unparented when the chain has none (the opening entry of
    /// a free-form session).
    pub async fn record_response(
        &self,
        scope: &ChainScope,
        content: impl Into<String>,
    ) -> Result<ChainEntry, ChainError> {
        let entries = self.store.list_by_scope(scope).await?;
        let parent = last_live(&entries)
            .filter(|e| e.is_assistant_prompt())
            .map(|e| e.id);

        let entry = ChainEntry::new(content, EntryKind::UserResponse, 0, parent)?;
        self.store.append(scope, entry).await
    }

    /// Appends an assistant prompt, parented to the latest live user
    /// response when one exists.
    pub async fn record_prompt(
        &self,
        scope: &ChainScope,
        content: impl Into<String>,
    ) -> Result<ChainEntry, ChainError> {
        let entries = self.store.list_by_scope(scope).await?;
        let parent = last_live(&entries)
            .filter(|e| e.is_user_response())
            .map(|e| e.id);

        let entry = ChainEntry::new(content, EntryKind::AssistantPrompt, 0, parent)?;
        self.store.append(scope, entry).await
    }

    /// Full chain for a scope, position-ascending, discarded included.
    pub async fn list(&self, scope: &ChainScope) -> Result<Vec<ChainEntry>, ChainError> {
        self.store.list_by_scope(scope).await
    }

    /// Discard records written for a scope, in recording order.
    pub async fn discard_history(
        &self,
        scope: &ChainScope,
    ) -> Result<Vec<DiscardedPromptRecord>, ChainError> {
        self.discard_log
            .list(scope)
            .await
            .map_err(ChainError::Store)
    }

    /// Replaces the live follow-up prompt with a freshly generated one.
    ///
    /// The shuffle anchors on the latest user response: either the last
    /// live entry is that response itself (no prompt to replace yet), or
    /// it is a live assistant prompt answering it, which is soft-deleted
    /// as shuffled with a discard record capturing its features. The
    /// replacement is appended with the response as parent, so every
    /// generated alternative hangs off the response it answers.
    ///
    /// # Errors
    ///
    /// - `Chain(ScopeEmpty)` when the scope has no live entries
    /// - `Chain(NotAUserResponse)` when no anchoring user response exists
    /// - `GenerationFailed` when the model call fails; a timeout discard
    ///   record is written first
    pub async fn reprompt(&self, scope: &ChainScope) -> Result<RepromptOutcome, RepromptError> {
        let entries = self.store.list_by_scope(scope).await?;

        let last = last_live(&entries).ok_or_else(|| ChainError::scope_empty(scope))?;

        // Anchor on the latest user response and find the prompt being
        // replaced, if one is live.
        let (response, live_child) = if last.is_user_response() {
            (last.clone(), None)
        } else {
            let parent = last
                .parent_id
                .and_then(|id| entries.iter().find(|e| e.id == id))
                .filter(|e| e.is_user_response())
                .ok_or(ChainError::NotAUserResponse)?;
            (parent.clone(), Some(last.clone()))
        };

        // The prompt the user originally answered, for generation context.
        let answered_prompt = response
            .parent_id
            .and_then(|id| entries.iter().find(|e| e.id == id))
            .map(|e| e.content.clone())
            .unwrap_or_default();

        // Shuffles already recorded against this response.
        let prior_shuffles = entries
            .iter()
            .filter(|e| e.parent_id == Some(response.id))
            .filter(|e| e.discard_reason == Some(DiscardReason::Shuffled))
            .count() as u32;
        let shuffle_count = prior_shuffles + 1;

        if let Some(ref old_prompt) = live_child {
            let discarded = self
                .store
                .discard(scope, old_prompt.id, DiscardReason::Shuffled)
                .await?;
            tracing::debug!(
                scope = %scope,
                entry_id = %old_prompt.id,
                shuffle_count,
                "discarded prompt for shuffle"
            );
            self.discard_log
                .record(
                    scope,
                    DiscardedPromptRecord::new(
                        &discarded.content,
                        &response.content,
                        DiscardReason::Shuffled,
                        discarded.chain_position,
                        discarded.parent_id,
                        shuffle_count,
                    ),
                )
                .await
                .map_err(ChainError::Store)?;
        }

        let original_prompt = live_child
            .as_ref()
            .map(|e| e.content.clone())
            .unwrap_or(answered_prompt);

        let questions = match self.generate_follow_ups(&original_prompt, &response.content).await
        {
            Ok(questions) => questions,
            Err(err) => {
                tracing::warn!(scope = %scope, error = %err, "follow-up generation failed");
                self.discard_log
                    .record(
                        scope,
                        DiscardedPromptRecord::new(
                            format!("generation failed: {}", err),
                            &response.content,
                            DiscardReason::Timeout,
                            response.chain_position,
                            response.parent_id,
                            shuffle_count,
                        ),
                    )
                    .await
                    .map_err(ChainError::Store)?;
                return Err(RepromptError::GenerationFailed { source: err });
            }
        };

        let context = PromptContext {
            original_prompt,
            triggering_response: response.content.clone(),
            shuffle_count,
        };
        let entry = ChainEntry::new(
            questions[0].clone(),
            EntryKind::AssistantPrompt,
            0,
            Some(response.id),
        )
        .map_err(ChainError::Store)?
        .with_prompt_context(context);

        let entry = self.store.append(scope, entry).await?;
        Ok(RepromptOutcome { entry, questions })
    }

    async fn generate_follow_ups(
        &self,
        original_prompt: &str,
        user_response: &str,
    ) -> Result<Vec<String>, GeneratorError> {
        let request = GenerationRequest::new()
            .with_system_instruction(follow_up_instruction(original_prompt, user_response))
            .with_temperature(0.9);

        let generated = self.generator.complete(request).await?;
        Ok(parse_follow_up_questions(&generated.content))
    }
}

/// Last entry in position order that has not been discarded.
fn last_live(entries: &[ChainEntry]) -> Option<&ChainEntry> {
    entries.iter().rev().find(|e| e.is_live())
}
