//! Errors surfaced by callers that enforce quota decisions.
//!
//! The engine itself never fails; these are produced by application
//! handlers composing the engine with the usage store and AI provider.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | LearningPeriodBlocked | 403 |
//! | QuotaExceeded | 429 |
//! | AccountNotFound | 404 |
//! | Forbidden | 403 |
//! | Validation | 400 |
//! | UpstreamAi | 502 |
//! | StoreUnavailable | 503 |

use thiserror::Error;

use crate::domain::foundation::{ErrorCode, Timestamp, UserId, ValidationError};

/// Errors from AI quota enforcement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuotaError {
    /// Basic user still inside the learning period.
    #[error("AI features unlock after the learning period. {days_remaining} day(s) remaining.")]
    LearningPeriodBlocked { days_remaining: u32 },

    /// No AI requests left in the current window.
    #[error(
        "AI request limit reached ({used}/{limit}). Your quota resets on {}.",
        .reset_date.format_date()
    )]
    QuotaExceeded {
        used: u32,
        limit: u32,
        reset_date: Timestamp,
    },

    /// No account exists for this user.
    #[error("No account found for user {0}")]
    AccountNotFound(UserId),

    /// Caller lacks the required role.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Request input was invalid.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The AI provider call failed.
    #[error("{0}")]
    UpstreamAi(String),

    /// The usage store or account store could not be reached.
    #[error("{0}")]
    StoreUnavailable(String),
}

impl QuotaError {
    pub fn learning_period(days_remaining: u32) -> Self {
        QuotaError::LearningPeriodBlocked { days_remaining }
    }

    pub fn quota_exceeded(used: u32, limit: u32, reset_date: Timestamp) -> Self {
        QuotaError::QuotaExceeded {
            used,
            limit,
            reset_date,
        }
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        QuotaError::Forbidden(reason.into())
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        QuotaError::UpstreamAi(message.into())
    }

    pub fn store_unavailable(message: impl Into<String>) -> Self {
        QuotaError::StoreUnavailable(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            QuotaError::LearningPeriodBlocked { .. } => ErrorCode::LearningPeriodActive,
            QuotaError::QuotaExceeded { .. } => ErrorCode::QuotaExceeded,
            QuotaError::AccountNotFound(_) => ErrorCode::AccountNotFound,
            QuotaError::Forbidden(_) => ErrorCode::Forbidden,
            QuotaError::Validation(_) => ErrorCode::ValidationFailed,
            QuotaError::UpstreamAi(_) => ErrorCode::AIProviderError,
            QuotaError::StoreUnavailable(_) => ErrorCode::StoreUnavailable,
        }
    }
}

impl From<ValidationError> for QuotaError {
    fn from(err: ValidationError) -> Self {
        QuotaError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn learning_period_message_includes_days_remaining() {
        let err = QuotaError::learning_period(12);
        assert!(err.to_string().contains("12 day(s) remaining"));
        assert_eq!(err.code(), ErrorCode::LearningPeriodActive);
    }

    #[test]
    fn quota_exceeded_message_includes_usage_and_date() {
        let reset = Timestamp::parse_rfc3339("2025-11-24T10:00:00Z").unwrap();
        let err = QuotaError::quota_exceeded(5, 5, reset);
        let message = err.to_string();

        assert!(message.contains("5/5"));
        assert!(message.contains("2025-11-24"));
        assert_eq!(err.code(), ErrorCode::QuotaExceeded);
    }

    #[test]
    fn upstream_error_is_surfaced_verbatim() {
        let err = QuotaError::upstream("model overloaded");
        assert_eq!(err.to_string(), "model overloaded");
    }

    #[test]
    fn store_unavailable_shows_the_cause_once() {
        let err = QuotaError::store_unavailable("usage store unavailable: connection refused");

        assert_eq!(err.to_string(), "usage store unavailable: connection refused");
        assert_eq!(err.code(), ErrorCode::StoreUnavailable);
    }

    #[test]
    fn validation_error_converts() {
        let err: QuotaError = ValidationError::empty_field("user_id").into();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }
}
