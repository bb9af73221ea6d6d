//! Entry summarizer - short factual summaries of journal entries.
//!
//! Summaries feed prompts and progress views, so they must always come
//! back with something: the generator path produces the good version,
//! and any failure falls back to a local extract of the entry itself.
//! Like the dispatcher, this never fails outward.

use std::sync::Arc;

use crate::ports::{GenerationRequest, Generator};

/// Upper bound on summary length, in words.
pub const SUMMARY_WORD_LIMIT: usize = 30;

const SUMMARY_INSTRUCTION: &str = "Summarize the following journal entry in at most \
30 words. State only what the writer said, in neutral clinical language. No advice, \
no interpretation, no second person.";

/// Produces short summaries of journal entries.
pub struct EntrySummarizer {
    generator: Option<Arc<dyn Generator>>,
}

impl EntrySummarizer {
    /// Creates a summarizer backed by a generator.
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self {
            generator: Some(generator),
        }
    }

    /// Creates a summarizer that only uses the local extract.
    pub fn local_only() -> Self {
        Self { generator: None }
    }

    /// Summarizes an entry. Never fails: generator problems degrade to a
    /// local extract of the entry text.
    pub async fn summarize(&self, entry_text: &str) -> String {
        if let Some(ref generator) = self.generator {
            let request = GenerationRequest::new()
                .with_system_instruction(SUMMARY_INSTRUCTION)
                .with_message(crate::domain::dialogue::Message::user(entry_text))
                .with_temperature(0.2);

            match generator.complete(request).await {
                Ok(generated) => return clamp_words(generated.content.trim()),
                Err(err) => {
                    tracing::warn!(error = %err, "summary generation failed, using local extract");
                }
            }
        }

        local_summary(entry_text)
    }
}

/// First sentence of the entry, clamped to the word limit.
fn local_summary(text: &str) -> String {
    let trimmed = text.trim();
    let first_sentence = trimmed
        .split_inclusive(['.', '!', '?'])
        .next()
        .unwrap_or(trimmed);
    clamp_words(first_sentence.trim())
}

/// Cuts text down to [`SUMMARY_WORD_LIMIT`] words, marking the cut.
fn clamp_words(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= SUMMARY_WORD_LIMIT {
        return words.join(" ");
    }
    let mut clamped = words[..SUMMARY_WORD_LIMIT].join(" ");
    clamped.push_str("...");
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::generator::{MockError, MockGenerator};

    #[tokio::test]
    async fn uses_generator_when_available() {
        let generator = MockGenerator::new().with_response("Writer reported a calm day.");
        let summarizer = EntrySummarizer::new(Arc::new(generator));

        let summary = summarizer.summarize("Today was calm, honestly.").await;
        assert_eq!(summary, "Writer reported a calm day.");
    }

    #[tokio::test]
    async fn falls_back_to_first_sentence_on_failure() {
        let generator = MockGenerator::new().with_error(MockError::Unavailable {
            message: "down".to_string(),
        });
        let summarizer = EntrySummarizer::new(Arc::new(generator));

        let summary = summarizer
            .summarize("I ate lunch with my sister. It went better than expected.")
            .await;
        assert_eq!(summary, "I ate lunch with my sister.");
    }

    #[tokio::test]
    async fn local_only_extracts_first_sentence() {
        let summarizer = EntrySummarizer::local_only();
        let summary = summarizer.summarize("Rough morning! But it got easier.").await;
        assert_eq!(summary, "Rough morning!");
    }

    #[tokio::test]
    async fn long_unpunctuated_text_is_clamped() {
        let summarizer = EntrySummarizer::local_only();
        let text = "word ".repeat(50);

        let summary = summarizer.summarize(&text).await;
        assert_eq!(summary.split_whitespace().count(), SUMMARY_WORD_LIMIT);
        assert!(summary.ends_with("..."));
    }

    #[tokio::test]
    async fn generator_output_is_clamped_too() {
        let long = "word ".repeat(60);
        let generator = MockGenerator::new().with_response(long);
        let summarizer = EntrySummarizer::new(Arc::new(generator));

        let summary = summarizer.summarize("anything").await;
        assert!(summary.split_whitespace().count() <= SUMMARY_WORD_LIMIT);
    }
}
