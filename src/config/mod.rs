//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `HEARTHSIDE` prefix and nested values use double underscores as
//! separators.
//!
//! # Example
//!
//! ```no_run
//! use hearthside::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod cache;
mod dispatcher;
mod error;
mod generator;
mod lexicon;

pub use cache::CacheConfig;
pub use dispatcher::DispatcherConfig;
pub use error::{ConfigError, ValidationError};
pub use generator::GeneratorConfig;
pub use lexicon::{Lexicon, LexiconConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has working defaults, so an empty environment yields a
/// runnable local configuration (pattern fallback plus a localhost
/// generator backend).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Primary generator backend
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Response cache
    #[serde(default)]
    pub cache: CacheConfig,

    /// Dispatcher health reporting
    #[serde(default)]
    pub dispatcher: DispatcherConfig,

    /// Crisis keywords and pattern categories
    #[serde(default)]
    pub lexicon: LexiconConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads a `.env` file if present, then reads environment variables
    /// with the `HEARTHSIDE` prefix, using `__` to separate nested
    /// values:
    ///
    /// - `HEARTHSIDE__GENERATOR__MODEL=llama3.2` -> `generator.model`
    /// - `HEARTHSIDE__CACHE__TTL_SECS=600` -> `cache.ttl_secs`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into the
    /// expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("HEARTHSIDE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.generator.validate()?;
        self.cache.validate()?;
        self.dispatcher.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var("HEARTHSIDE__GENERATOR__MODEL");
        env::remove_var("HEARTHSIDE__GENERATOR__TIMEOUT_SECS");
        env::remove_var("HEARTHSIDE__CACHE__TTL_SECS");
        env::remove_var("HEARTHSIDE__DISPATCHER__UNHEALTHY_AFTER");
    }

    #[test]
    fn test_load_with_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.generator.model, "llama3.2");
        assert_eq!(config.cache.ttl_secs, 30 * 60);
    }

    #[test]
    fn test_nested_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("HEARTHSIDE__GENERATOR__MODEL", "mistral");
        env::set_var("HEARTHSIDE__CACHE__TTL_SECS", "600");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.generator.model, "mistral");
        assert_eq!(config.cache.ttl_secs, 600);
    }

    #[test]
    fn test_invalid_section_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("HEARTHSIDE__DISPATCHER__UNHEALTHY_AFTER", "0");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_err());
    }
}
