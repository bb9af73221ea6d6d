//! Follow-up question generation support.
//!
//! Reprompting asks the model for exactly three alternative reflective
//! questions. Models are unreliable about format, so the parser here is
//! deliberately forgiving: it strips list markers, drops preamble lines,
//! keeps only actual questions, and pads from fixed fallbacks so callers
//! always get exactly [`FOLLOW_UP_COUNT`] questions back.

/// How many follow-up questions a reprompt produces.
pub const FOLLOW_UP_COUNT: usize = 3;

/// Stand-in questions used when the model returns fewer than three.
pub const FALLBACK_QUESTIONS: &[&str] = &[
    "How does that make you feel?",
    "What else is on your mind?",
    "How are you feeling about this?",
];

/// Builds the generation instruction for follow-up questions.
///
/// `original_prompt` is the question being replaced; `user_response` is
/// the journal entry both the old and new prompts answer.
pub fn follow_up_instruction(original_prompt: &str, user_response: &str) -> String {
    format!(
        "The journaler was asked: \"{original_prompt}\"\n\
         They wrote: \"{user_response}\"\n\n\
         Write exactly three different gentle follow-up questions that invite \
         deeper reflection on what they wrote. One question per line. \
         Questions only, no introduction and no numbering."
    )
}

/// Extracts up to three questions from raw model output, padding from
/// [`FALLBACK_QUESTIONS`] when fewer survive the filter.
pub fn parse_follow_up_questions(raw: &str) -> Vec<String> {
    let mut questions: Vec<String> = raw
        .lines()
        .map(strip_list_marker)
        .filter(|line| !line.is_empty())
        .filter(|line| line.ends_with('?'))
        .map(|line| line.to_string())
        .take(FOLLOW_UP_COUNT)
        .collect();

    for fallback in FALLBACK_QUESTIONS {
        if questions.len() >= FOLLOW_UP_COUNT {
            break;
        }
        if !questions.iter().any(|q| q == fallback) {
            questions.push((*fallback).to_string());
        }
    }

    questions
}

/// Removes leading list markers ("1.", "1)", "-", "*") and surrounding
/// whitespace from a line.
fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();
    let unmarked = line
        .strip_prefix(|c: char| c.is_ascii_digit())
        .map(|rest| rest.trim_start_matches(|c: char| c.is_ascii_digit()))
        .and_then(|rest| rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')))
        .or_else(|| line.strip_prefix('-'))
        .or_else(|| line.strip_prefix('*'))
        .unwrap_or(line);
    unmarked.trim()
}
