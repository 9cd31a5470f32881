//! Error types for the domain layer.

use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("Unknown plan tier: {0}")]
    UnknownPlan(String),
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,

    // Not found errors
    AccountNotFound,

    // Quota errors
    LearningPeriodActive,
    QuotaExceeded,

    // Authorization errors
    Unauthorized,
    Forbidden,

    // AI errors
    AIProviderError,

    // Infrastructure errors
    StoreUnavailable,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::AccountNotFound => "ACCOUNT_NOT_FOUND",
            ErrorCode::LearningPeriodActive => "LEARNING_PERIOD_ACTIVE",
            ErrorCode::QuotaExceeded => "AI_QUOTA_EXCEEDED",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::AIProviderError => "AI_PROVIDER_ERROR",
            ErrorCode::StoreUnavailable => "STORE_UNAVAILABLE",
        };
        write!(f, "{}", s)
    }
}
