//! Dispatcher health configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::application::DEFAULT_UNHEALTHY_AFTER;

/// Dispatcher health-reporting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DispatcherConfig {
    /// Consecutive primary-backend failures before health reports unhealthy
    #[serde(default = "default_unhealthy_after")]
    pub unhealthy_after: u32,
}

impl DispatcherConfig {
    /// Validate dispatcher configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.unhealthy_after == 0 {
            return Err(ValidationError::InvalidUnhealthyThreshold);
        }
        Ok(())
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            unhealthy_after: default_unhealthy_after(),
        }
    }
}

fn default_unhealthy_after() -> u32 {
    DEFAULT_UNHEALTHY_AFTER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = DispatcherConfig::default();
        assert_eq!(config.unhealthy_after, DEFAULT_UNHEALTHY_AFTER);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_threshold() {
        let config = DispatcherConfig { unhealthy_after: 0 };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidUnhealthyThreshold)
        ));
    }
}
