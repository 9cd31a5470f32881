//! IncrementAiUsageHandler - Command handler counting one AI request.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::foundation::UserId;
use crate::domain::quota::{QuotaEngine, QuotaError};
use crate::ports::{AccountReader, Clock, UsageStore};

use super::support::{effective_record, ensure_learning_period_over, load_account};

/// Conflicting writes tolerated before giving up.
pub const DEFAULT_MAX_INCREMENT_RETRIES: u32 = 3;

/// Command to count one AI request for a user.
#[derive(Debug, Clone)]
pub struct IncrementAiUsageCommand {
    pub user_id: UserId,
}

/// Quota left after the increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncrementAiUsageResult {
    pub success: bool,
    pub remaining: u32,
    pub used: u32,
    pub limit: u32,
}

/// Handler for incrementing AI usage.
///
/// Each attempt reads the stored record, re-evaluates it and writes the
/// incremented record with a compare-and-swap against what was read. A lost
/// race re-reads and tries again, up to `max_retries` extra attempts.
#[derive(Clone)]
pub struct IncrementAiUsageHandler {
    engine: QuotaEngine,
    accounts: Arc<dyn AccountReader>,
    store: Arc<dyn UsageStore>,
    clock: Arc<dyn Clock>,
    max_retries: u32,
}

impl IncrementAiUsageHandler {
    pub fn new(
        engine: QuotaEngine,
        accounts: Arc<dyn AccountReader>,
        store: Arc<dyn UsageStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            engine,
            accounts,
            store,
            clock,
            max_retries: DEFAULT_MAX_INCREMENT_RETRIES,
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub async fn handle(
        &self,
        cmd: IncrementAiUsageCommand,
    ) -> Result<IncrementAiUsageResult, QuotaError> {
        let account = load_account(self.accounts.as_ref(), &cmd.user_id).await?;

        for attempt in 0..=self.max_retries {
            let now = self.clock.now();
            ensure_learning_period_over(&self.engine, &account, now)?;

            let stored = self
                .store
                .read(&cmd.user_id)
                .await
                .map_err(|e| QuotaError::store_unavailable(e.to_string()))?;

            let current = effective_record(&self.engine, stored.as_ref(), account.plan, now);
            let decision = self.engine.evaluate(&current, now);
            if !decision.allowed {
                return Err(QuotaError::quota_exceeded(
                    decision.used,
                    decision.limit,
                    decision.reset_date,
                ));
            }

            let next = self.engine.record_usage(&current);
            let swapped = self
                .store
                .compare_and_swap(&cmd.user_id, stored.as_ref(), &next)
                .await
                .map_err(|e| QuotaError::store_unavailable(e.to_string()))?;

            if swapped {
                info!(
                    user_id = %cmd.user_id,
                    used = next.count,
                    limit = decision.limit,
                    "AI usage incremented"
                );
                return Ok(IncrementAiUsageResult {
                    success: true,
                    remaining: decision.limit.saturating_sub(next.count),
                    used: next.count,
                    limit: decision.limit,
                });
            }

            debug!(user_id = %cmd.user_id, attempt, "Concurrent usage update, retrying");
        }

        warn!(
            user_id = %cmd.user_id,
            retries = self.max_retries,
            "Gave up incrementing AI usage after repeated conflicts"
        );
        Err(QuotaError::store_unavailable(format!(
            "usage for {} kept changing; increment abandoned after {} retries",
            cmd.user_id, self.max_retries
        )))
    }
}
