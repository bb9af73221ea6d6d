//! Safety interceptor - crisis keyword classification.
//!
//! Classifies raw user text for crisis indicators before anything else in
//! the pipeline runs. Purely lexical by design: a case-insensitive
//! substring scan over a configured keyword list. No I/O, no model calls,
//! and no way to disable it at runtime.

use serde::{Deserialize, Serialize};

/// Default crisis indicator keywords.
///
/// Matched case-insensitively as substrings of the user's text.
pub const DEFAULT_CRISIS_KEYWORDS: &[&str] = &[
    "suicide",
    "kill myself",
    "want to die",
    "end it all",
    "no reason to live",
    "self-harm",
    "cut myself",
    "hurt myself",
    "better off dead",
    "give up",
    "hopeless",
    "worthless",
    "no point",
    "can't take it anymore",
];

/// Fixed resource message returned on crisis interception.
///
/// Never generated; the user's raw content is not forwarded anywhere.
pub const CRISIS_RESOURCE_MESSAGE: &str = "\
I notice you're expressing some concerning thoughts. While I'm here to \
support you, it's important to reach out to professional help if you're \
struggling.

Immediate resources:
- National Eating Disorders Association (NEDA) Helpline: 1-800-931-2237
- Crisis Text Line: Text HOME to 741741
- National Suicide Prevention Lifeline: 988

Would you like to talk about what's going on, or would you prefer to \
connect with a crisis counselor? I'm here to listen either way.";

/// Result of classifying one piece of user text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyVerdict {
    /// True when at least one crisis keyword matched.
    pub is_crisis: bool,
    /// The keywords that matched, in configuration order.
    pub matched_keywords: Vec<String>,
}

impl SafetyVerdict {
    /// A verdict with no matches.
    pub fn clear() -> Self {
        Self {
            is_crisis: false,
            matched_keywords: Vec::new(),
        }
    }
}

/// Keyword-based crisis classifier.
///
/// Constructed once with its keyword list (injected so tests and
/// deployments can swap lexicons) and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct SafetyClassifier {
    keywords: Vec<String>,
}

impl SafetyClassifier {
    /// Creates a classifier with the given keyword list.
    ///
    /// Keywords are lowercased once at construction.
    pub fn new(keywords: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.into().to_lowercase())
                .collect(),
        }
    }

    /// Creates a classifier with the built-in default lexicon.
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_CRISIS_KEYWORDS.iter().copied())
    }

    /// Classifies text for crisis indicators.
    ///
    /// Pure function: case-insensitive substring scan, O(|keywords|).
    pub fn classify(&self, text: &str) -> SafetyVerdict {
        let lowered = text.to_lowercase();
        let matched_keywords: Vec<String> = self
            .keywords
            .iter()
            .filter(|k| lowered.contains(k.as_str()))
            .cloned()
            .collect();

        SafetyVerdict {
            is_crisis: !matched_keywords.is_empty(),
            matched_keywords,
        }
    }

    /// Number of configured keywords.
    pub fn keyword_count(&self) -> usize {
        self.keywords.len()
    }
}

impl Default for SafetyClassifier {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_direct_crisis_phrase() {
        let classifier = SafetyClassifier::with_defaults();
        let verdict = classifier.classify("I want to kill myself");

        assert!(verdict.is_crisis);
        assert!(verdict
            .matched_keywords
            .contains(&"kill myself".to_string()));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let classifier = SafetyClassifier::with_defaults();
        assert!(classifier.classify("I feel HOPELESS today").is_crisis);
    }

    #[test]
    fn matches_inside_longer_sentences() {
        let classifier = SafetyClassifier::with_defaults();
        let verdict =
            classifier.classify("honestly some days there is just no point to any of it");
        assert!(verdict.is_crisis);
    }

    #[test]
    fn benign_text_is_clear() {
        let classifier = SafetyClassifier::with_defaults();
        let verdict = classifier.classify("I had a good breakfast today");

        assert!(!verdict.is_crisis);
        assert!(verdict.matched_keywords.is_empty());
    }

    #[test]
    fn reports_all_matching_keywords() {
        let classifier = SafetyClassifier::with_defaults();
        let verdict = classifier.classify("it feels hopeless and worthless");

        assert!(verdict.is_crisis);
        assert_eq!(verdict.matched_keywords.len(), 2);
    }

    #[test]
    fn custom_lexicon_replaces_defaults() {
        let classifier = SafetyClassifier::new(["red flag"]);

        assert!(classifier.classify("this is a Red Flag").is_crisis);
        assert!(!classifier.classify("I want to kill myself").is_crisis);
    }

    #[test]
    fn empty_text_is_clear() {
        let classifier = SafetyClassifier::with_defaults();
        assert_eq!(classifier.classify(""), SafetyVerdict::clear());
    }
}
