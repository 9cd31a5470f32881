//! AI analyzer port - The external AI completion provider.
//!
//! Quota enforcement wraps every call through this port; the provider
//! itself (prompting, model choice, streaming) is outside this crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::UserId;

/// Port for running an AI financial analysis.
#[async_trait]
pub trait AiAnalyzer: Send + Sync {
    /// Runs one analysis. Each successful call consumes one quota request.
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResponse, AiError>;
}

/// Kind of analysis requested by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    SpendingReview,
    BudgetAdvice,
    GoalPlanning,
    InvestmentInsight,
}

/// Request for an AI analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub user_id: UserId,
    pub kind: AnalysisKind,
    /// Pre-aggregated financial context (transactions, budgets, goals).
    pub context: serde_json::Value,
}

/// Result of an AI analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub content: String,
    pub model: String,
}

/// Errors from the AI provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AiError {
    #[error("AI provider rate limited the request")]
    RateLimited,

    #[error("AI provider unavailable: {0}")]
    Unavailable(String),

    #[error("AI provider rejected the request: {0}")]
    InvalidRequest(String),
}
