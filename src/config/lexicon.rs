//! Lexicon configuration - crisis keywords and pattern categories as data.
//!
//! Both lexicons ship with built-in defaults; deployments may replace
//! either via a YAML override file referenced by `LEXICON__PATH`.

use serde::Deserialize;
use std::path::PathBuf;

use super::error::{ConfigError, ValidationError};
use crate::domain::dialogue::{
    default_categories, PatternCategory, PatternLibrary, SafetyClassifier, DEFAULT_CRISIS_KEYWORDS,
};

/// Lexicon configuration section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LexiconConfig {
    /// Path to a YAML override file; built-in defaults when unset
    pub path: Option<PathBuf>,
}

impl LexiconConfig {
    /// Load the effective lexicon: the override file when configured,
    /// built-in defaults otherwise.
    pub fn load(&self) -> Result<Lexicon, ConfigError> {
        match &self.path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                let file: LexiconFile = serde_yaml::from_str(&raw)?;
                let lexicon = Lexicon::from(file);
                lexicon.validate()?;
                Ok(lexicon)
            }
            None => Ok(Lexicon::default()),
        }
    }
}

/// On-disk shape of a lexicon override.
///
/// Either section may be omitted, in which case the built-in default
/// for that section is kept.
#[derive(Debug, Clone, Deserialize)]
struct LexiconFile {
    crisis_keywords: Option<Vec<String>>,
    categories: Option<Vec<PatternCategory>>,
}

/// The effective lexicon after defaults are applied.
#[derive(Debug, Clone)]
pub struct Lexicon {
    pub crisis_keywords: Vec<String>,
    pub categories: Vec<PatternCategory>,
}

impl Lexicon {
    /// Build the safety classifier from this lexicon.
    pub fn safety_classifier(&self) -> SafetyClassifier {
        SafetyClassifier::new(self.crisis_keywords.iter().cloned())
    }

    /// Build the pattern library from this lexicon.
    pub fn pattern_library(&self) -> PatternLibrary {
        PatternLibrary::new(self.categories.clone())
    }

    /// Validate lexicon contents
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.crisis_keywords.is_empty() {
            return Err(ValidationError::EmptyCrisisLexicon);
        }
        for category in &self.categories {
            if !(0.0..=1.0).contains(&category.base_confidence) {
                return Err(ValidationError::InvalidCategoryConfidence(
                    category.name.clone(),
                ));
            }
            if category.templates.is_empty() {
                return Err(ValidationError::EmptyCategoryTemplates(
                    category.name.clone(),
                ));
            }
        }
        Ok(())
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            crisis_keywords: DEFAULT_CRISIS_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            categories: default_categories(),
        }
    }
}

impl From<LexiconFile> for Lexicon {
    fn from(file: LexiconFile) -> Self {
        let defaults = Lexicon::default();
        Self {
            crisis_keywords: file.crisis_keywords.unwrap_or(defaults.crisis_keywords),
            categories: file.categories.unwrap_or(defaults.categories),
        }
    }
}
