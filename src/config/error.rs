//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    #[error("Failed to read lexicon file: {0}")]
    LexiconIo(#[from] std::io::Error),

    #[error("Failed to parse lexicon file: {0}")]
    LexiconParse(#[from] serde_yaml::Error),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Generator base URL must start with http:// or https://")]
    InvalidBaseUrl,

    #[error("Cache TTL must be greater than zero")]
    InvalidCacheTtl,

    #[error("Cache max_entries must be greater than zero when set")]
    InvalidCacheBound,

    #[error("Unhealthy threshold must be greater than zero")]
    InvalidUnhealthyThreshold,

    #[error("Lexicon crisis keyword list is empty")]
    EmptyCrisisLexicon,

    #[error("Pattern category '{0}' has confidence outside 0.0..=1.0")]
    InvalidCategoryConfidence(String),

    #[error("Pattern category '{0}' has no reply templates")]
    EmptyCategoryTemplates(String),
}
