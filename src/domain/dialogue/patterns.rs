//! Pattern fallback generator - rule-engine template replies.
//!
//! Scores a message against weighted keyword categories and selects a
//! templated reply. This tier has no I/O and never fails; it is the
//! pipeline's workhorse when the primary backend is down, and in some
//! deployments the sole generator.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// One weighted keyword category with its reply templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternCategory {
    /// Stable category name (e.g. `meal`, `body-image`).
    pub name: String,
    /// Keywords matched case-insensitively as substrings.
    pub keywords: Vec<String>,
    /// Reply templates sampled uniformly when this category wins.
    pub templates: Vec<String>,
    /// Confidence attached to replies from this category.
    pub base_confidence: f32,
}

impl PatternCategory {
    /// Creates a category from string slices.
    pub fn new(
        name: impl Into<String>,
        keywords: &[&str],
        templates: &[&str],
        base_confidence: f32,
    ) -> Self {
        Self {
            name: name.into(),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            templates: templates.iter().map(|s| s.to_string()).collect(),
            base_confidence,
        }
    }

    /// Counts keyword occurrences in the (pre-lowercased) text.
    fn match_count(&self, lowered: &str) -> usize {
        self.keywords
            .iter()
            .filter(|k| lowered.contains(k.to_lowercase().as_str()))
            .count()
    }
}

/// A reply produced by the pattern generator.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternReply {
    pub text: String,
    pub confidence: f32,
    /// The category that won the scoring, or `basic-fallback` when no
    /// category (including `general`) could supply a template.
    pub matched_category: String,
}

/// Name of the designated catch-all category.
pub const GENERAL_CATEGORY: &str = "general";

/// Last-resort fixed replies, used when the pattern generator itself has
/// nothing to offer and by the dispatcher's terminal tier.
pub const BASIC_FALLBACK_RESPONSES: &[&str] = &[
    "I'm here to listen and support you. What's coming up for you right now?",
    "I hear you, and I'm here to listen. What would be most helpful for you right now?",
    "Thank you for sharing that with me. How can I best support you in this moment?",
    "I want to make sure I'm giving you my full attention. Could you tell me more about what's on your mind?",
];

/// Samples one of the basic fallback replies uniformly.
pub fn basic_fallback_response() -> String {
    let idx = rand::thread_rng().gen_range(0..BASIC_FALLBACK_RESPONSES.len());
    BASIC_FALLBACK_RESPONSES[idx].to_string()
}

/// Ordered library of pattern categories.
///
/// Categories are injected at construction (configuration data, not
/// scattered literals) so they stay testable and swappable.
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    categories: Vec<PatternCategory>,
}

impl PatternLibrary {
    /// Creates a library from the given categories, in scoring order.
    pub fn new(categories: Vec<PatternCategory>) -> Self {
        Self { categories }
    }

    /// Creates a library with the built-in default categories.
    pub fn with_defaults() -> Self {
        Self::new(default_categories())
    }

    /// Number of configured categories.
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Generates a templated reply for the given user text.
    ///
    /// Scoring: count keyword hits per category, keep categories with at
    /// least one hit, order by `(match_count desc, base_confidence desc)`,
    /// then sample the winner's templates uniformly. Falls back to the
    /// `general` category, then to a fixed basic reply. Never fails.
    pub fn generate(&self, text: &str) -> PatternReply {
        match self.select_category(text) {
            Some(category) => Self::sample(category),
            None => PatternReply {
                text: basic_fallback_response(),
                confidence: 0.5,
                matched_category: "basic-fallback".to_string(),
            },
        }
    }

    /// Deterministic half of `generate`: picks the winning category
    /// without sampling a template.
    pub fn select_category(&self, text: &str) -> Option<&PatternCategory> {
        let lowered = text.to_lowercase();

        let mut candidates: Vec<(usize, &PatternCategory)> = self
            .categories
            .iter()
            .map(|c| (c.match_count(&lowered), c))
            .filter(|(count, _)| *count > 0)
            .collect();

        // Tie on both keys is implementation-defined; stable sort keeps
        // configuration order in that case.
        candidates.sort_by(|(count_a, cat_a), (count_b, cat_b)| {
            count_b.cmp(count_a).then(
                cat_b
                    .base_confidence
                    .partial_cmp(&cat_a.base_confidence)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
        });

        if let Some((_, winner)) = candidates.first() {
            if !winner.templates.is_empty() {
                return Some(winner);
            }
        }

        self.categories
            .iter()
            .find(|c| c.name == GENERAL_CATEGORY && !c.templates.is_empty())
    }

    fn sample(category: &PatternCategory) -> PatternReply {
        let idx = rand::thread_rng().gen_range(0..category.templates.len());
        PatternReply {
            text: category.templates[idx].clone(),
            confidence: category.base_confidence,
            matched_category: category.name.clone(),
        }
    }
}

impl Default for PatternLibrary {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// The built-in category set, tuned for recovery-focused journaling.
pub fn default_categories() -> Vec<PatternCategory> {
    vec![
        PatternCategory::new(
            "meal",
            &[
                "meal", "eat", "food", "breakfast", "lunch", "dinner", "snack", "hungry",
                "full", "appetite",
            ],
            &[
                "I hear that meal times can be challenging. Remember that every meal is a step toward healing, no matter how small it feels. What's making this meal particularly difficult for you right now?",
                "Meal times can bring up so many emotions. It's completely normal to feel this way. What would it feel like to approach this meal with a little more self-compassion?",
                "I understand that eating can feel overwhelming. Your body deserves nourishment, and you deserve to eat. What's coming up for you around this meal?",
                "Every time you eat, you're taking care of yourself. That's something to be proud of. What might help you feel a little more supported during this meal?",
            ],
            0.8,
        ),
        PatternCategory::new(
            "body-image",
            &[
                "body", "weight", "look", "mirror", "fat", "skinny", "ugly", "beautiful",
                "appearance", "clothes", "size",
            ],
            &[
                "I understand that body image can be really difficult. You are so much more than how you look. What would it feel like to offer yourself the same compassion you give others?",
                "Body image struggles are so common in recovery. Your worth isn't determined by your appearance. What might help you see yourself with more kindness today?",
                "I hear how much this is affecting you. You deserve to feel comfortable in your body. What would it feel like to focus on what your body can do rather than how it looks?",
            ],
            0.8,
        ),
        PatternCategory::new(
            "anxiety",
            &[
                "anxious", "worried", "stress", "panic", "nervous", "scared", "fear",
                "overwhelmed", "tense", "jittery",
            ],
            &[
                "Anxiety can feel overwhelming. It's completely normal to feel this way. What might help you feel a little more grounded right now?",
                "I hear how anxious you're feeling. Anxiety is a natural response, and it will pass. What would feel most supportive to you in this moment?",
                "It sounds like you're dealing with a lot of anxiety. That's really hard. What might help you feel a little more calm or centered?",
            ],
            0.7,
        ),
        PatternCategory::new(
            "recovery",
            &[
                "recovery", "heal", "better", "progress", "improve", "journey", "path",
                "goal", "hope", "future",
            ],
            &[
                "Recovery is a journey, and every step you take matters. Even the small victories are worth celebrating. What's one thing you're proud of today, no matter how small?",
                "I hear how much you want to heal. Recovery isn't linear, and that's okay. What would it feel like to acknowledge how far you've already come?",
                "Your recovery journey is unique to you. There's no timeline or perfect way to heal. What feels most important to you right now in your recovery?",
            ],
            0.8,
        ),
        PatternCategory::new(
            "relationships",
            &[
                "friend", "family", "relationship", "support", "alone", "lonely", "people",
                "social", "connection", "love",
            ],
            &[
                "Relationships can be complicated, especially during recovery. It's okay to need support. What would it feel like to reach out to someone you trust?",
                "I hear how important relationships are to you. Connection can be such a powerful part of healing. What kind of support feels most helpful right now?",
                "Relationships and recovery can be challenging to balance. You deserve to be surrounded by people who support your healing. What feels most important to you in your relationships?",
            ],
            0.7,
        ),
        PatternCategory::new(
            "self-compassion",
            &[
                "hate", "disgust", "shame", "guilt", "failure", "disappointment", "judge",
                "criticize", "blame",
            ],
            &[
                "I hear how much you're struggling with self-judgment. You deserve kindness, especially from yourself. What would it feel like to offer yourself the same compassion you'd give a friend?",
                "Self-criticism can be so painful. You're doing the best you can, and that's enough. What might help you be a little gentler with yourself today?",
                "Self-judgment can be such a challenging part of recovery. Remember that healing takes time and patience. What would help you feel more accepting of yourself?",
            ],
            0.8,
        ),
        PatternCategory::new(
            "triggers",
            &[
                "trigger", "urge", "temptation", "cope", "manage", "handle", "deal",
                "resist", "control", "avoid",
            ],
            &[
                "Triggers can feel overwhelming, but you have more strength than you know. What coping strategies have worked for you in the past?",
                "I hear how challenging this trigger is for you. It's okay to feel this way. What might help you ride out this urge without acting on it?",
                "Triggers are a normal part of recovery. You're not alone in this. What would feel most supportive to you right now?",
            ],
            0.7,
        ),
        PatternCategory::new(
            GENERAL_CATEGORY,
            &[
                "help", "support", "need", "want", "feel", "think", "wonder", "question",
                "confused", "lost",
            ],
            &[
                "I hear you, and I'm here to listen. What would be most helpful for you right now?",
                "Thank you for sharing that with me. How can I best support you in this moment?",
                "I want to make sure I'm giving you my full attention. Could you tell me more about what's on your mind?",
                "I'm here to listen and support you. What's coming up for you right now?",
            ],
            0.6,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn higher_match_count_wins() {
        let library = PatternLibrary::with_defaults();
        // Three meal keywords against one body-image keyword.
        let winner = library
            .select_category("I skipped breakfast, had no lunch, and dreaded dinner while thinking about my weight")
            .unwrap();
        assert_eq!(winner.name, "meal");
    }

    #[test]
    fn confidence_breaks_match_count_ties() {
        let library = PatternLibrary::new(vec![
            PatternCategory::new("low", &["spark"], &["low reply"], 0.6),
            PatternCategory::new("high", &["spark"], &["high reply"], 0.9),
        ]);

        let winner = library.select_category("a spark of something").unwrap();
        assert_eq!(winner.name, "high");
    }

    #[test]
    fn meal_message_generates_meal_reply() {
        let library = PatternLibrary::with_defaults();
        let reply = library.generate("I had a good breakfast today");

        assert_eq!(reply.matched_category, "meal");
        assert!((reply.confidence - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn unmatched_text_falls_back_to_general() {
        let library = PatternLibrary::with_defaults();
        // "wonder" is a general keyword.
        let reply = library.generate("I wonder about the sky");
        assert_eq!(reply.matched_category, GENERAL_CATEGORY);
    }

    #[test]
    fn no_match_at_all_still_falls_back_to_general() {
        let library = PatternLibrary::with_defaults();
        let reply = library.generate("zzzz qqqq");
        assert_eq!(reply.matched_category, GENERAL_CATEGORY);
    }

    #[test]
    fn empty_library_uses_basic_fallback() {
        let library = PatternLibrary::new(Vec::new());
        let reply = library.generate("anything at all");

        assert_eq!(reply.matched_category, "basic-fallback");
        assert!(BASIC_FALLBACK_RESPONSES.contains(&reply.text.as_str()));
    }

    #[test]
    fn winner_with_empty_templates_defers_to_general() {
        let library = PatternLibrary::new(vec![
            PatternCategory::new("empty", &["spark"], &[], 0.9),
            PatternCategory::new(GENERAL_CATEGORY, &["anything"], &["general reply"], 0.6),
        ]);

        let reply = library.generate("a spark");
        assert_eq!(reply.matched_category, GENERAL_CATEGORY);
    }

    #[test]
    fn template_comes_from_winning_category() {
        let library = PatternLibrary::with_defaults();
        let winner = library.select_category("I feel so anxious and worried").unwrap();

        for _ in 0..20 {
            let reply = library.generate("I feel so anxious and worried");
            assert!(winner.templates.contains(&reply.text));
        }
    }

    #[test]
    fn matching_is_case_insensitive() {
        let library = PatternLibrary::with_defaults();
        let winner = library.select_category("EATING FOOD AT DINNER").unwrap();
        assert_eq!(winner.name, "meal");
    }
}
