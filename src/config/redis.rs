//! Redis configuration (usage store)

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Redis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL
    pub url: String,

    /// Per-command timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Prefix for usage hash keys
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl RedisConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Validate Redis configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("FINCOACH__REDIS__URL"));
        }
        if !self.url.starts_with("redis://") && !self.url.starts_with("rediss://") {
            return Err(ValidationError::InvalidRedisUrl);
        }
        if self.timeout_ms == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.key_prefix.trim().is_empty() {
            return Err(ValidationError::MissingRequired("FINCOACH__REDIS__KEY_PREFIX"));
        }
        Ok(())
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_ms: default_timeout_ms(),
            key_prefix: default_key_prefix(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    500
}

fn default_key_prefix() -> String {
    "ai_usage".to_string()
}
