//! HTTP handlers for AI usage endpoints.
//!
//! These handlers connect Axum routes to the AI usage command/query handlers.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::ai_usage::{
    CheckAiLimitHandler, CheckAiLimitQuery, IncrementAiUsageCommand, IncrementAiUsageHandler,
    ResetAiUsageCommand, ResetAiUsageHandler, DEFAULT_MAX_INCREMENT_RETRIES,
};
use crate::domain::foundation::{ErrorCode, UserId};
use crate::domain::quota::{QuotaEngine, QuotaError};
use crate::ports::{AccountReader, AdminPolicy, Clock, UsageStore};

use super::dto::{AiUsageResponse, ErrorResponse, IncrementUsageResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the AI usage endpoints.
///
/// Cloned for each request; handlers are built on demand from it.
#[derive(Clone)]
pub struct AiUsageAppState {
    pub engine: QuotaEngine,
    pub accounts: Arc<dyn AccountReader>,
    pub usage_store: Arc<dyn UsageStore>,
    pub clock: Arc<dyn Clock>,
    pub admin_policy: Arc<dyn AdminPolicy>,
    pub fail_open: bool,
    pub max_increment_retries: u32,
}

impl AiUsageAppState {
    pub fn new(
        engine: QuotaEngine,
        accounts: Arc<dyn AccountReader>,
        usage_store: Arc<dyn UsageStore>,
        clock: Arc<dyn Clock>,
        admin_policy: Arc<dyn AdminPolicy>,
    ) -> Self {
        Self {
            engine,
            accounts,
            usage_store,
            clock,
            admin_policy,
            fail_open: true,
            max_increment_retries: DEFAULT_MAX_INCREMENT_RETRIES,
        }
    }

    pub fn check_handler(&self) -> CheckAiLimitHandler {
        CheckAiLimitHandler::new(
            self.engine.clone(),
            self.accounts.clone(),
            self.usage_store.clone(),
            self.clock.clone(),
        )
        .with_fail_open(self.fail_open)
    }

    pub fn increment_handler(&self) -> IncrementAiUsageHandler {
        IncrementAiUsageHandler::new(
            self.engine.clone(),
            self.accounts.clone(),
            self.usage_store.clone(),
            self.clock.clone(),
        )
        .with_max_retries(self.max_increment_retries)
    }

    pub fn reset_handler(&self) -> ResetAiUsageHandler {
        ResetAiUsageHandler::new(self.usage_store.clone(), self.admin_policy.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Caller Identity
// ════════════════════════════════════════════════════════════════════════════════

/// Caller identity forwarded by the gateway.
///
/// Sessions are validated upstream; the gateway passes the user id in
/// `X-User-Id` and, when known, the email in `X-User-Email`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: Option<String>,
}

/// Rejection type for AuthenticatedUser extraction.
pub struct AuthenticationRequired;

impl IntoResponse for AuthenticationRequired {
    fn into_response(self) -> axum::response::Response {
        let error = ErrorResponse::new(
            ErrorCode::Unauthorized.to_string(),
            "Authentication is required",
        );
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthenticationRequired;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let user_id = header_value(parts, "X-User-Id")
            .and_then(|s| UserId::new(s).ok())
            .ok_or(AuthenticationRequired)?;
        let email = header_value(parts, "X-User-Email").map(str::to_string);

        Ok(AuthenticatedUser { user_id, email })
    }
}

fn header_value<'a>(parts: &'a axum::http::request::Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

// ════════════════════════════════════════════════════════════════════════════════
// Endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/ai/usage - Current quota for the caller
pub async fn get_ai_usage(
    State(state): State<AiUsageAppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AiUsageApiError> {
    let handler = state.check_handler();
    let query = CheckAiLimitQuery {
        user_id: user.user_id,
    };

    let decision = handler.handle(query).await?;

    Ok(Json(AiUsageResponse::from(decision)))
}

/// POST /api/ai/usage - Count one AI request for the caller
pub async fn increment_ai_usage(
    State(state): State<AiUsageAppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AiUsageApiError> {
    let handler = state.increment_handler();
    let cmd = IncrementAiUsageCommand {
        user_id: user.user_id,
    };

    let result = handler.handle(cmd).await?;

    Ok(Json(IncrementUsageResponse::from(result)))
}

/// POST /api/admin/ai/usage/:user_id/reset - Clear a user's usage
pub async fn reset_ai_usage(
    State(state): State<AiUsageAppState>,
    user: AuthenticatedUser,
    Path(target): Path<String>,
) -> Result<impl IntoResponse, AiUsageApiError> {
    let handler = state.reset_handler();
    let cmd = ResetAiUsageCommand {
        actor_email: user.email,
        user_id: UserId::new(target).map_err(QuotaError::from)?,
    };

    handler.handle(cmd).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Mapping
// ════════════════════════════════════════════════════════════════════════════════

/// API error wrapper mapping quota errors to HTTP responses.
#[derive(Debug)]
pub struct AiUsageApiError(QuotaError);

impl From<QuotaError> for AiUsageApiError {
    fn from(err: QuotaError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AiUsageApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            QuotaError::LearningPeriodBlocked { .. } | QuotaError::Forbidden(_) => {
                StatusCode::FORBIDDEN
            }
            QuotaError::QuotaExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            QuotaError::AccountNotFound(_) => StatusCode::NOT_FOUND,
            QuotaError::Validation(_) => StatusCode::BAD_REQUEST,
            QuotaError::UpstreamAi(_) => StatusCode::BAD_GATEWAY,
            QuotaError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        let code = self.0.code().to_string();
        let message = self.0.to_string();
        let body = match &self.0 {
            QuotaError::LearningPeriodBlocked { days_remaining } => ErrorResponse::with_details(
                code,
                message,
                serde_json::json!({ "daysRemaining": days_remaining }),
            ),
            QuotaError::QuotaExceeded {
                used,
                limit,
                reset_date,
            } => ErrorResponse::with_details(
                code,
                message,
                serde_json::json!({
                    "used": used,
                    "limit": limit,
                    "resetDate": reset_date,
                }),
            ),
            _ => ErrorResponse::new(code, message),
        };

        (status, Json(body)).into_response()
    }
}
