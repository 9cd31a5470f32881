//! FinCoach AI quota service.

use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use fincoach::app::{build_router, build_state, StartupError};
use fincoach::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate().map_err(fincoach::config::ConfigError::from)?;

    let state = build_state(&config).await?;
    let app = build_router(state, &config.server);

    let addr = config
        .server
        .socket_addr()
        .map_err(fincoach::config::ConfigError::from)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, environment = ?config.server.environment, "FinCoach quota service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// `RUST_LOG` wins over `server.log_level`; production logs are JSON.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if config.is_production() {
        let _ = registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init();
    } else {
        let _ = registry.with(tracing_subscriber::fmt::layer()).try_init();
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
