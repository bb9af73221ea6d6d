//! Application layer - services orchestrating domain logic over ports.
//!
//! - `DialogueDispatcher` - the tiered, never-fail reply pipeline
//! - `ResponseCache` - transcript-keyed memoization of replies
//! - `ChainService` - chain appends and the reprompt protocol
//! - `ProgressService` - module unlocking policy
//! - `EntrySummarizer` - short entry summaries with local fallback

mod cache;
mod chain;
mod dispatcher;
mod progress;
mod summarizer;

pub use cache::{CachedResponse, ResponseCache, DEFAULT_TTL};
pub use chain::{ChainService, RepromptError, RepromptOutcome};
pub use dispatcher::{
    DialogueDispatcher, HealthStatus, DEFAULT_UNHEALTHY_AFTER, PRIMARY_CONFIDENCE,
};
pub use progress::ProgressService;
pub use summarizer::{EntrySummarizer, SUMMARY_WORD_LIMIT};
