//! Discarded prompt records - provenance for replaced assistant prompts.
//!
//! When an assistant prompt is shuffled away or a regeneration fails, the
//! attempt is captured here with derived features. Records are
//! write-once, append-only, and never updated or deleted; they exist for
//! downstream analysis and training, not for the UI.

use serde::{Deserialize, Serialize};

use crate::domain::chain::{word_count, DiscardReason};
use crate::domain::foundation::{EntryId, Timestamp};

/// Coarse shape of the question a prompt asks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// Exploratory phrasing (how/what/why/...).
    Open,
    /// Yes/no phrasing (is/are/do/can/...).
    Closed,
    /// Contains a question mark but fits neither opening.
    Other,
    /// No question mark at all.
    None,
}

/// Features derived from a discarded prompt's text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptFeatures {
    pub word_count: u32,
    pub has_question_mark: bool,
    pub has_personal_pronoun: bool,
    pub starts_with_question: bool,
    pub ends_with_question: bool,
    pub multiple_questions: bool,
    pub average_word_length: f32,
    /// Fraction of emotional vocabulary, clamped to [0, 1].
    pub emotional_intensity: f32,
    /// Second-person density, clamped to [0, 1].
    pub personalization_level: f32,
    pub question_type: QuestionType,
}

const PERSONAL_PRONOUNS: &[&str] = &["i", "me", "my", "mine", "we", "us", "our", "ours"];

const SECOND_PERSON: &[&str] = &["you", "your", "yours", "yourself"];

const EMOTIONAL_WORDS: &[&str] = &[
    "feel", "feeling", "feelings", "emotion", "emotions", "afraid", "scared", "anxious",
    "sad", "angry", "ashamed", "guilty", "lonely", "hope", "hopeful", "proud", "love",
    "hurt", "pain", "comfort", "safe", "overwhelmed", "grief", "joy",
];

const OPEN_STARTERS: &[&str] = &["how", "what", "why", "tell", "describe", "where", "when"];

const CLOSED_STARTERS: &[&str] = &[
    "is", "are", "was", "were", "do", "does", "did", "can", "could", "would", "will",
    "have", "has", "had",
];

impl PromptFeatures {
    /// Derives all features from the prompt text.
    pub fn derive(prompt: &str) -> Self {
        let trimmed = prompt.trim();
        let words: Vec<String> = trimmed
            .split_whitespace()
            .map(|w| {
                w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                    .to_lowercase()
            })
            .filter(|w| !w.is_empty())
            .collect();

        let total = words.len().max(1) as f32;
        let question_marks = trimmed.matches('?').count();
        let pronoun_hits = words
            .iter()
            .filter(|w| PERSONAL_PRONOUNS.contains(&w.as_str()))
            .count();
        let second_person_hits = words
            .iter()
            .filter(|w| SECOND_PERSON.contains(&w.as_str()))
            .count();
        let emotional_hits = words
            .iter()
            .filter(|w| EMOTIONAL_WORDS.contains(&w.as_str()))
            .count();

        let average_word_length = if words.is_empty() {
            0.0
        } else {
            words.iter().map(|w| w.len()).sum::<usize>() as f32 / total
        };

        Self {
            word_count: word_count(trimmed),
            has_question_mark: question_marks > 0,
            has_personal_pronoun: pronoun_hits > 0,
            starts_with_question: trimmed.starts_with('?'),
            ends_with_question: trimmed.ends_with('?'),
            multiple_questions: question_marks > 1,
            average_word_length,
            // Density scales: a handful of emotional words in a short
            // prompt should already read as intense.
            emotional_intensity: (emotional_hits as f32 * 4.0 / total).clamp(0.0, 1.0),
            personalization_level: (second_person_hits as f32 * 4.0 / total).clamp(0.0, 1.0),
            question_type: Self::classify_question(&words, question_marks),
        }
    }

    fn classify_question(words: &[String], question_marks: usize) -> QuestionType {
        if question_marks == 0 {
            return QuestionType::None;
        }
        match words.first().map(String::as_str) {
            Some(first) if OPEN_STARTERS.contains(&first) => QuestionType::Open,
            Some(first) if CLOSED_STARTERS.contains(&first) => QuestionType::Closed,
            _ => QuestionType::Other,
        }
    }
}

/// Write-once record of a discarded assistant prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscardedPromptRecord {
    /// The replaced prompt's text.
    pub discarded_prompt: String,
    /// Features derived from the prompt at discard time.
    pub features: PromptFeatures,
    /// The user response that triggered the regeneration.
    pub user_response: String,
    /// Why the prompt was discarded.
    pub reason: DiscardReason,
    /// The discarded entry's chain position.
    pub chain_position: u64,
    /// The user response entry both old and new prompts answer.
    pub parent_id: Option<EntryId>,
    /// How many shuffles this parent has seen, including this one.
    pub shuffle_count: u32,
    pub recorded_at: Timestamp,
}

impl DiscardedPromptRecord {
    /// Builds a record, deriving features from the prompt text.
    pub fn new(
        discarded_prompt: impl Into<String>,
        user_response: impl Into<String>,
        reason: DiscardReason,
        chain_position: u64,
        parent_id: Option<EntryId>,
        shuffle_count: u32,
    ) -> Self {
        let discarded_prompt = discarded_prompt.into();
        Self {
            features: PromptFeatures::derive(&discarded_prompt),
            discarded_prompt,
            user_response: user_response.into(),
            reason,
            chain_position,
            parent_id,
            shuffle_count,
            recorded_at: Timestamp::now(),
        }
    }
}
