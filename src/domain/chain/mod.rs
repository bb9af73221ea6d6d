//! Conversation chain domain - entries, scopes, and discard provenance.

mod discarded;
mod entry;
mod scope;

pub use discarded::{DiscardedPromptRecord, PromptFeatures, QuestionType};
pub use entry::{word_count, ChainEntry, DiscardReason, EntryKind, PromptContext};
pub use scope::ChainScope;
