//! RunAiAnalysisHandler - Runs an AI analysis inside the user's quota.
//!
//! Ordering per request:
//! 1. Learning period and quota check (rejects before any AI call)
//! 2. AI call (a failure is returned as-is and nothing is counted)
//! 3. Increment, re-evaluated against fresh usage
//!
//! An increment failure after a successful AI call is logged and the
//! analysis is still returned; the user already received the work.

use std::sync::Arc;

use tracing::{error, warn};

use crate::domain::foundation::UserId;
use crate::domain::quota::QuotaError;
use crate::ports::{AiAnalyzer, AnalysisKind, AnalysisRequest, AnalysisResponse};

use super::{
    CheckAiLimitHandler, CheckAiLimitQuery, IncrementAiUsageCommand, IncrementAiUsageHandler,
    IncrementAiUsageResult,
};

/// Command to run one AI analysis.
#[derive(Debug, Clone)]
pub struct RunAiAnalysisCommand {
    pub user_id: UserId,
    pub kind: AnalysisKind,
    pub context: serde_json::Value,
}

/// Analysis plus the quota left afterwards.
#[derive(Debug, Clone)]
pub struct RunAiAnalysisResult {
    pub analysis: AnalysisResponse,
    /// `None` when the increment could not be recorded.
    pub usage: Option<IncrementAiUsageResult>,
}

/// Handler guarding AI analyses with the quota.
#[derive(Clone)]
pub struct RunAiAnalysisHandler {
    check: CheckAiLimitHandler,
    increment: IncrementAiUsageHandler,
    analyzer: Arc<dyn AiAnalyzer>,
}

impl RunAiAnalysisHandler {
    pub fn new(
        check: CheckAiLimitHandler,
        increment: IncrementAiUsageHandler,
        analyzer: Arc<dyn AiAnalyzer>,
    ) -> Self {
        Self {
            check,
            increment,
            analyzer,
        }
    }

    pub async fn handle(&self, cmd: RunAiAnalysisCommand) -> Result<RunAiAnalysisResult, QuotaError> {
        let decision = self
            .check
            .handle(CheckAiLimitQuery {
                user_id: cmd.user_id.clone(),
            })
            .await?;

        if !decision.allowed {
            return Err(QuotaError::quota_exceeded(
                decision.used,
                decision.limit,
                decision.reset_date,
            ));
        }

        let analysis = self
            .analyzer
            .analyze(AnalysisRequest {
                user_id: cmd.user_id.clone(),
                kind: cmd.kind,
                context: cmd.context,
            })
            .await
            .map_err(|e| QuotaError::upstream(e.to_string()))?;

        let usage = match self
            .increment
            .handle(IncrementAiUsageCommand {
                user_id: cmd.user_id.clone(),
            })
            .await
        {
            Ok(result) => Some(result),
            Err(QuotaError::QuotaExceeded { used, limit, .. }) => {
                warn!(
                    user_id = %cmd.user_id,
                    used,
                    limit,
                    "Quota filled by a concurrent request, analysis not counted"
                );
                None
            }
            Err(e) => {
                error!(user_id = %cmd.user_id, error = %e, "Failed to record AI usage");
                None
            }
        };

        Ok(RunAiAnalysisResult { analysis, usage })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::account::InMemoryAccountReader;
    use crate::adapters::ai::MockAnalyzer;
    use crate::adapters::clock::FixedClock;
    use crate::adapters::usage_store::InMemoryUsageStore;
    use crate::domain::foundation::Timestamp;
    use crate::domain::quota::{PlanTier, QuotaEngine, UsageRecord};
    use crate::ports::{AccountProfile, AiError, Clock, UsageStore};

    // ════════════════════════════════════════════════════════════════════════════
    // Test Helpers
    // ════════════════════════════════════════════════════════════════════════════

    struct Fixture {
        store: Arc<InMemoryUsageStore>,
        analyzer: MockAnalyzer,
        handler: RunAiAnalysisHandler,
    }

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse_rfc3339(s).unwrap()
    }

    fn now() -> Timestamp {
        ts("2025-10-24T10:00:00Z")
    }

    fn test_user_id() -> UserId {
        UserId::new("user-123").unwrap()
    }

    fn fixture(registered_at: Timestamp, analyzer: MockAnalyzer) -> Fixture {
        let engine = QuotaEngine::standard();
        let accounts = Arc::new(InMemoryAccountReader::with_accounts([AccountProfile {
            user_id: test_user_id(),
            email: "user@example.com".to_string(),
            plan: PlanTier::Basic,
            registered_at,
        }]));
        let store = Arc::new(InMemoryUsageStore::new());
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(now()));

        let check = CheckAiLimitHandler::new(
            engine.clone(),
            accounts.clone(),
            store.clone(),
            clock.clone(),
        );
        let increment = IncrementAiUsageHandler::new(engine, accounts, store.clone(), clock);
        let handler = RunAiAnalysisHandler::new(check, increment, Arc::new(analyzer.clone()));

        Fixture {
            store,
            analyzer,
            handler,
        }
    }

    fn cmd() -> RunAiAnalysisCommand {
        RunAiAnalysisCommand {
            user_id: test_user_id(),
            kind: AnalysisKind::SpendingReview,
            context: serde_json::json!({ "groceries": 412.5 }),
        }
    }

    fn basic(count: u32) -> UsageRecord {
        UsageRecord {
            count,
            last_reset: ts("2025-10-20T10:00:00Z"),
            plan: PlanTier::Basic,
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn successful_analysis_counts_one_request() {
        let f = fixture(ts("2025-09-01T00:00:00Z"), MockAnalyzer::new().with_response("ok"));
        f.store.insert(test_user_id(), basic(2)).await;

        let result = f.handler.handle(cmd()).await.unwrap();

        assert_eq!(result.analysis.content, "ok");
        assert_eq!(result.usage.map(|u| u.used), Some(3));
        assert_eq!(f.store.read(&test_user_id()).await.unwrap(), Some(basic(3)));
    }

    #[tokio::test]
    async fn ai_failure_is_surfaced_and_not_counted() {
        let f = fixture(
            ts("2025-09-01T00:00:00Z"),
            MockAnalyzer::new().with_error(AiError::Unavailable("model overloaded".to_string())),
        );
        f.store.insert(test_user_id(), basic(2)).await;

        let err = f.handler.handle(cmd()).await.unwrap_err();

        assert_eq!(
            err,
            QuotaError::upstream("AI provider unavailable: model overloaded")
        );
        assert_eq!(f.store.read(&test_user_id()).await.unwrap(), Some(basic(2)));
    }

    #[tokio::test]
    async fn exhausted_quota_never_calls_ai() {
        let f = fixture(ts("2025-09-01T00:00:00Z"), MockAnalyzer::new());
        f.store.insert(test_user_id(), basic(5)).await;

        let err = f.handler.handle(cmd()).await.unwrap_err();

        assert!(matches!(err, QuotaError::QuotaExceeded { used: 5, limit: 5, .. }));
        assert_eq!(f.analyzer.call_count(), 0);
    }

    #[tokio::test]
    async fn learning_period_never_calls_ai() {
        let f = fixture(now().add_days(-3), MockAnalyzer::new());

        let err = f.handler.handle(cmd()).await.unwrap_err();

        assert_eq!(err, QuotaError::learning_period(19));
        assert_eq!(f.analyzer.call_count(), 0);
        assert!(f.store.is_empty().await);
    }

    #[tokio::test]
    async fn analyzer_receives_request_context() {
        let f = fixture(ts("2025-09-01T00:00:00Z"), MockAnalyzer::new());

        f.handler.handle(cmd()).await.unwrap();

        let calls = f.analyzer.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].kind, AnalysisKind::SpendingReview);
        assert_eq!(calls[0].context["groceries"], 412.5);
    }
}
