//! CheckAiLimitHandler - Query handler for the current AI quota.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::foundation::UserId;
use crate::domain::quota::{QuotaDecision, QuotaEngine, QuotaError};
use crate::ports::{AccountReader, Clock, UsageStore};

use super::support::{effective_record, ensure_learning_period_over, load_account};

/// Query for a user's current AI quota.
#[derive(Debug, Clone)]
pub struct CheckAiLimitQuery {
    pub user_id: UserId,
}

/// Handler for checking whether a user may make another AI request.
///
/// Ordering: account lookup, learning period, usage read, evaluation.
/// A first check creates the usage record and a check after the window
/// ended persists the reset; both writes are conditional and best effort.
///
/// When the usage store fails and `fail_open` is set, the handler returns
/// a permissive decision for the user's plan instead of an error.
#[derive(Clone)]
pub struct CheckAiLimitHandler {
    engine: QuotaEngine,
    accounts: Arc<dyn AccountReader>,
    store: Arc<dyn UsageStore>,
    clock: Arc<dyn Clock>,
    fail_open: bool,
}

impl CheckAiLimitHandler {
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
            fail_open: true,
        }
    }

    /// Sets whether store failures degrade to a permissive decision.
    pub fn with_fail_open(mut self, fail_open: bool) -> Self {
        self.fail_open = fail_open;
        self
    }

    pub async fn handle(&self, query: CheckAiLimitQuery) -> Result<QuotaDecision, QuotaError> {
        let now = self.clock.now();
        let account = load_account(self.accounts.as_ref(), &query.user_id).await?;
        ensure_learning_period_over(&self.engine, &account, now)?;

        let stored = match self.store.read(&query.user_id).await {
            Ok(stored) => stored,
            Err(e) if self.fail_open => {
                warn!(
                    user_id = %query.user_id,
                    error = %e,
                    "Usage store unavailable, allowing AI request"
                );
                return Ok(QuotaDecision::permissive(
                    account.plan,
                    self.engine.limit_for(account.plan),
                    now,
                ));
            }
            Err(e) => return Err(QuotaError::store_unavailable(e.to_string())),
        };

        let effective = effective_record(&self.engine, stored.as_ref(), account.plan, now);
        let decision = self.engine.evaluate(&effective, now);

        if stored.as_ref() != Some(&effective) {
            match self
                .store
                .compare_and_swap(&query.user_id, stored.as_ref(), &effective)
                .await
            {
                Ok(true) => {}
                Ok(false) => debug!(user_id = %query.user_id, "Usage changed during check"),
                Err(e) => warn!(user_id = %query.user_id, error = %e, "Failed to persist usage window"),
            }
        }

        debug!(
            user_id = %query.user_id,
            plan = %decision.plan,
            used = decision.used,
            limit = decision.limit,
            allowed = decision.allowed,
            "AI quota checked"
        );

        Ok(decision)
    }
}
