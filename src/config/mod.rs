//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables with the
//! `config` and `dotenvy` crates. Variables use the `FINCOACH` prefix and
//! `__` between nested keys.
//!
//! # Example
//!
//! ```no_run
//! use fincoach::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod admin;
mod database;
mod error;
mod quota;
mod redis;
mod server;

pub use admin::AdminConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use quota::{QuotaConfig, UsageStoreBackend};
pub use self::redis::RedisConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL, required by the postgres usage store
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Redis, required by the redis usage store
    #[serde(default)]
    pub redis: Option<RedisConfig>,

    /// Quota enforcement settings
    #[serde(default)]
    pub quota: QuotaConfig,

    /// Administrator allowlist
    #[serde(default)]
    pub admin: AdminConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `FINCOACH` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `FINCOACH__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `FINCOACH__QUOTA__STORE=redis` -> `quota.store = redis`
    /// - `FINCOACH__REDIS__URL=...` -> `redis.url = ...`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("FINCOACH")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Checks each section, then that the selected usage store has the
    /// connection settings it needs.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.quota.validate()?;
        self.admin.validate()?;

        if let Some(database) = &self.database {
            database.validate()?;
        }
        if let Some(redis) = &self.redis {
            redis.validate()?;
        }

        match self.quota.store {
            UsageStoreBackend::Postgres if self.database.is_none() => {
                Err(ValidationError::StoreNotConfigured {
                    store: "postgres",
                    section: "database",
                })
            }
            UsageStoreBackend::Redis if self.redis.is_none() => {
                Err(ValidationError::StoreNotConfigured {
                    store: "redis",
                    section: "redis",
                })
            }
            _ => Ok(()),
        }
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
