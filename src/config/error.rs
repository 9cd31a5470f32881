//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Invalid Redis URL format")]
    InvalidRedisUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Learning period must be between 0 and 365 days")]
    InvalidLearningPeriod,

    #[error("Increment retries must be between 0 and 10")]
    InvalidRetryCount,

    #[error("Usage store '{store}' requires the {section} configuration section")]
    StoreNotConfigured {
        store: &'static str,
        section: &'static str,
    },

    #[error("Invalid admin email: {0}")]
    InvalidAdminEmail(String),
}
