//! Axum router configuration for AI usage endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{get_ai_usage, increment_ai_usage, reset_ai_usage, AiUsageAppState};

/// Caller-facing routes, mounted at `/ai`.
///
/// - `GET /usage` - Current quota decision
/// - `POST /usage` - Count one AI request
pub fn ai_usage_routes() -> Router<AiUsageAppState> {
    Router::new().route("/usage", get(get_ai_usage).post(increment_ai_usage))
}

/// Admin routes, mounted at `/admin/ai`.
///
/// - `POST /usage/:user_id/reset` - Clear a user's usage
pub fn admin_routes() -> Router<AiUsageAppState> {
    Router::new().route("/usage/:user_id/reset", post(reset_ai_usage))
}

/// Complete AI usage router, suitable for nesting under `/api`.
///
/// # Example
///
/// ```ignore
/// let app = Router::new()
///     .nest("/api", ai_usage_router())
///     .with_state(state);
/// ```
pub fn ai_usage_router() -> Router<AiUsageAppState> {
    Router::new()
        .nest("/ai", ai_usage_routes())
        .nest("/admin/ai", admin_routes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::adapters::account::InMemoryAccountReader;
    use crate::adapters::admin::AllowlistAdminPolicy;
    use crate::adapters::clock::SystemClock;
    use crate::adapters::usage_store::InMemoryUsageStore;
    use crate::domain::quota::QuotaEngine;

    fn test_state() -> AiUsageAppState {
        AiUsageAppState::new(
            QuotaEngine::standard(),
            Arc::new(InMemoryAccountReader::new()),
            Arc::new(InMemoryUsageStore::new()),
            Arc::new(SystemClock),
            Arc::new(AllowlistAdminPolicy::default()),
        )
    }

    #[test]
    fn router_builds_with_state() {
        let _router: Router = ai_usage_router().with_state(test_state());
    }

    #[tokio::test]
    async fn usage_without_identity_is_unauthorized() {
        let app = Router::new()
            .nest("/api", ai_usage_router())
            .with_state(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/ai/usage")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let app = Router::new()
            .nest("/api", ai_usage_router())
            .with_state(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/ai/unknown")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
