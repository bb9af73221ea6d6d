//! Dialogue domain - messages, pipeline results, and the pure tiers.
//!
//! The safety classifier and pattern library live here because they are
//! pure domain logic: no I/O, injected configuration, fully testable in
//! isolation. The dispatcher that orchestrates them is an application
//! concern.

mod followup;
mod message;
mod patterns;
mod result;
mod safety;

pub use followup::{
    follow_up_instruction, parse_follow_up_questions, FALLBACK_QUESTIONS, FOLLOW_UP_COUNT,
};
pub use message::{last_user_message, Message, Role};
pub use patterns::{
    basic_fallback_response, default_categories, PatternCategory, PatternLibrary, PatternReply,
    BASIC_FALLBACK_RESPONSES, GENERAL_CATEGORY,
};
pub use result::{DialogueResult, ResponseSource};
pub use safety::{
    SafetyClassifier, SafetyVerdict, CRISIS_RESOURCE_MESSAGE, DEFAULT_CRISIS_KEYWORDS,
};
