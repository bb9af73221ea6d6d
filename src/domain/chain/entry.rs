//! Chain entry - the central entity of the conversation chain.
//!
//! Every prompt and response is an ordered, linkable entry. Entries are
//! never physically removed: discarding flags them so branch history
//! stays available for later analysis.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::foundation::{DomainError, EntryId, Timestamp};

/// What an entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Text the user wrote.
    UserResponse,
    /// A generated (or templated) follow-up prompt.
    AssistantPrompt,
}

/// Why an entry was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscardReason {
    /// Replaced by a reprompt ("shuffle").
    Shuffled,
    /// Regeneration failed; the attempt is retained for provenance.
    Timeout,
}

/// Generation context attached to assistant prompts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptContext {
    /// The submodule's (or session's synthetic) original prompt.
    pub original_prompt: String,
    /// The user response that triggered this generation.
    pub triggering_response: String,
    /// How many times the user has shuffled at this point in the chain.
    pub shuffle_count: u32,
}

/// Counts words the way the journaling UI does: whitespace-separated,
/// empty fragments ignored.
pub fn word_count(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}

/// An entry in a conversation chain.
///
/// # Invariants
///
/// - `chain_position` strictly increases with creation order inside one
///   scope; assigned by the store as max existing + 1
/// - discarding never changes `id` or `chain_position`
/// - `word_count` is derived from `content` and recomputed on write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainEntry {
    pub id: EntryId,
    pub content: String,
    pub word_count: u32,
    pub kind: EntryKind,
    pub chain_position: u64,
    pub parent_id: Option<EntryId>,
    pub child_ids: BTreeSet<EntryId>,
    pub discarded: bool,
    pub discard_reason: Option<DiscardReason>,
    pub prompt_context: Option<PromptContext>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ChainEntry {
    /// Creates a new entry at the given position.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if content is empty
    pub fn new(
        content: impl Into<String>,
        kind: EntryKind,
        chain_position: u64,
        parent_id: Option<EntryId>,
    ) -> Result<Self, DomainError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(DomainError::validation(
                "content",
                "Entry content cannot be empty",
            ));
        }

        let now = Timestamp::now();
        Ok(Self {
            id: EntryId::new(),
            word_count: word_count(&content),
            content,
            kind,
            chain_position,
            parent_id,
            child_ids: BTreeSet::new(),
            discarded: false,
            discard_reason: None,
            prompt_context: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Attaches generation context (assistant prompts only).
    pub fn with_prompt_context(mut self, context: PromptContext) -> Self {
        self.prompt_context = Some(context);
        self
    }

    /// Registers a child entry id. Back-reference set when the child is
    /// created; the model allows several children per parent even though
    /// only one is live at a time.
    pub fn add_child(&mut self, child: EntryId) {
        self.child_ids.insert(child);
        self.updated_at = Timestamp::now();
    }

    /// Soft-discards the entry, keeping id and position.
    ///
    /// # Errors
    ///
    /// - `AlreadyDiscarded` if the entry was discarded before
    pub fn discard(&mut self, reason: DiscardReason) -> Result<(), DomainError> {
        if self.discarded {
            return Err(DomainError::new(
                crate::domain::foundation::ErrorCode::AlreadyDiscarded,
                format!("Entry {} is already discarded", self.id),
            ));
        }
        self.discarded = true;
        self.discard_reason = Some(reason);
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// True for live (non-discarded) entries.
    pub fn is_live(&self) -> bool {
        !self.discarded
    }

    /// True for user responses.
    pub fn is_user_response(&self) -> bool {
        self.kind == EntryKind::UserResponse
    }

    /// True for assistant prompts.
    pub fn is_assistant_prompt(&self) -> bool {
        self.kind == EntryKind::AssistantPrompt
    }
}
