//! AI quota configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::quota::DEFAULT_LEARNING_PERIOD_DAYS;

/// Which backend holds usage records.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UsageStoreBackend {
    /// Process-local map; usage is lost on restart
    #[default]
    Memory,
    Postgres,
    Redis,
}

impl UsageStoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            UsageStoreBackend::Memory => "memory",
            UsageStoreBackend::Postgres => "postgres",
            UsageStoreBackend::Redis => "redis",
        }
    }
}

/// Quota enforcement settings
#[derive(Debug, Clone, Deserialize)]
pub struct QuotaConfig {
    #[serde(default)]
    pub store: UsageStoreBackend,

    /// Allow AI requests when the usage store cannot be read
    #[serde(default = "default_fail_open")]
    pub fail_open: bool,

    /// Days a new basic-plan user waits before AI unlocks
    #[serde(default = "default_learning_period_days")]
    pub learning_period_days: u32,

    /// Extra attempts after a conflicting concurrent increment (0 means a single attempt)
    #[serde(default = "default_max_increment_retries")]
    pub max_increment_retries: u32,
}

impl QuotaConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.learning_period_days > 365 {
            return Err(ValidationError::InvalidLearningPeriod);
        }
        if self.max_increment_retries > 10 {
            return Err(ValidationError::InvalidRetryCount);
        }
        Ok(())
    }
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            store: UsageStoreBackend::default(),
            fail_open: default_fail_open(),
            learning_period_days: default_learning_period_days(),
            max_increment_retries: default_max_increment_retries(),
        }
    }
}

fn default_fail_open() -> bool {
    true
}

fn default_learning_period_days() -> u32 {
    DEFAULT_LEARNING_PERIOD_DAYS
}

fn default_max_increment_retries() -> u32 {
    3
}
