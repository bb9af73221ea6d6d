//! Response cache configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Response cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Entry time-to-live in seconds
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,

    /// Optional hard bound on entry count; unbounded when unset
    pub max_entries: Option<usize>,
}

impl CacheConfig {
    /// Get TTL as Duration
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Validate cache configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.ttl_secs == 0 {
            return Err(ValidationError::InvalidCacheTtl);
        }
        if self.max_entries == Some(0) {
            return Err(ValidationError::InvalidCacheBound);
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl(),
            max_entries: None,
        }
    }
}

fn default_ttl() -> u64 {
    30 * 60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(CacheConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_ttl() {
        let config = CacheConfig {
            ttl_secs: 0,
            max_entries: None,
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidCacheTtl)
        ));
    }

    #[test]
    fn rejects_zero_bound() {
        let config = CacheConfig {
            ttl_secs: 60,
            max_entries: Some(0),
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidCacheBound)
        ));
    }
}
