//! HTTP DTOs for AI usage endpoints.

use serde::{Deserialize, Serialize};

use crate::application::IncrementAiUsageResult;
use crate::domain::foundation::Timestamp;
use crate::domain::quota::{PlanTier, QuotaDecision};

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Current quota for the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiUsageResponse {
    pub allowed: bool,
    pub remaining: u32,
    pub limit: u32,
    pub used: u32,
    /// Instant at which the window ends, RFC 3339 in UTC (`...Z`).
    pub reset_date: Timestamp,
    pub plan: PlanTier,
}

impl From<QuotaDecision> for AiUsageResponse {
    fn from(decision: QuotaDecision) -> Self {
        Self {
            allowed: decision.allowed,
            remaining: decision.remaining,
            limit: decision.limit,
            used: decision.used,
            reset_date: decision.reset_date,
            plan: decision.plan,
        }
    }
}

/// Result of counting one AI request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncrementUsageResponse {
    pub success: bool,
    pub remaining: u32,
    pub used: u32,
    pub limit: u32,
}

impl From<IncrementAiUsageResult> for IncrementUsageResponse {
    fn from(result: IncrementAiUsageResult) -> Self {
        Self {
            success: result.success,
            remaining: result.remaining,
            used: result.used,
            limit: result.limit,
        }
    }
}

/// Error body returned by every AI usage endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}
