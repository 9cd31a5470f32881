//! Service composition - builds adapters from configuration and the router.

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::get;
use axum::{Json, Router};
use thiserror::Error;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::adapters::http::{ai_usage_router, AiUsageAppState};
use crate::adapters::{
    AllowlistAdminPolicy, InMemoryAccountReader, InMemoryUsageStore, PostgresAccountReader,
    PostgresUsageStore, RedisUsageStore, SystemClock,
};
use crate::config::{AppConfig, ConfigError, ServerConfig, UsageStoreBackend, ValidationError};
use crate::domain::quota::{LearningPeriodPolicy, QuotaEngine, StandardPlanCatalog};
use crate::ports::{AccountReader, UsageStore};

/// Errors that stop the service from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database connection failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Redis connection failed: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Builds the shared state for the AI usage endpoints.
///
/// Accounts come from PostgreSQL whenever a database is configured, even
/// when usage lives in Redis or memory.
pub async fn build_state(config: &AppConfig) -> Result<AiUsageAppState, StartupError> {
    let pool = match &config.database {
        Some(database) => {
            let pool = database.pool_options().connect(&database.url).await?;
            if database.run_migrations {
                sqlx::migrate!("./migrations").run(&pool).await?;
                info!("Database migrations applied");
            }
            Some(pool)
        }
        None => None,
    };

    let accounts: Arc<dyn AccountReader> = match &pool {
        Some(pool) => Arc::new(PostgresAccountReader::new(pool.clone())),
        None => {
            warn!("No database configured, using an empty in-memory account reader");
            Arc::new(InMemoryAccountReader::new())
        }
    };

    let usage_store: Arc<dyn UsageStore> = match (config.quota.store, &pool, &config.redis) {
        (UsageStoreBackend::Postgres, Some(pool), _) => {
            Arc::new(PostgresUsageStore::new(pool.clone()))
        }
        (UsageStoreBackend::Redis, _, Some(redis_config)) => {
            let client = redis::Client::open(redis_config.url.as_str())?;
            let conn = client.get_multiplexed_tokio_connection().await?;
            Arc::new(
                RedisUsageStore::new(conn, redis_config.timeout())
                    .with_key_prefix(redis_config.key_prefix.clone()),
            )
        }
        (UsageStoreBackend::Memory, _, _) => Arc::new(InMemoryUsageStore::new()),
        (backend, _, _) => {
            let section = match backend {
                UsageStoreBackend::Redis => "redis",
                _ => "database",
            };
            return Err(ConfigError::from(ValidationError::StoreNotConfigured {
                store: backend.as_str(),
                section,
            })
            .into());
        }
    };

    let engine = QuotaEngine::new(
        Arc::new(StandardPlanCatalog),
        LearningPeriodPolicy::with_days(config.quota.learning_period_days),
    );

    let admin_policy = AllowlistAdminPolicy::new(config.admin.emails_list());
    if admin_policy.is_empty() {
        warn!("No admin emails configured, usage resets are disabled");
    }

    info!(
        store = config.quota.store.as_str(),
        fail_open = config.quota.fail_open,
        learning_period_days = config.quota.learning_period_days,
        "Quota service configured"
    );

    let mut state = AiUsageAppState::new(
        engine,
        accounts,
        usage_store,
        Arc::new(SystemClock),
        Arc::new(admin_policy),
    );
    state.fail_open = config.quota.fail_open;
    state.max_increment_retries = config.quota.max_increment_retries;

    Ok(state)
}

/// Builds the HTTP router with tracing, timeout and CORS layers.
pub fn build_router(state: AiUsageAppState, server: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", ai_usage_router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors_layer(server))
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
