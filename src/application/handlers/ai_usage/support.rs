//! Steps shared by the AI usage handlers.

use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::quota::{PlanTier, QuotaEngine, QuotaError, UsageRecord};
use crate::ports::{AccountProfile, AccountReader};

/// Loads the account, mapping a missing account and reader failures.
pub(super) async fn load_account(
    accounts: &dyn AccountReader,
    user_id: &UserId,
) -> Result<AccountProfile, QuotaError> {
    accounts
        .get_account(user_id)
        .await
        .map_err(|e| QuotaError::store_unavailable(e.to_string()))?
        .ok_or_else(|| QuotaError::AccountNotFound(user_id.clone()))
}

/// Fails with `LearningPeriodBlocked` while the account is still learning.
pub(super) fn ensure_learning_period_over(
    engine: &QuotaEngine,
    account: &AccountProfile,
    now: Timestamp,
) -> Result<(), QuotaError> {
    match engine.learning_days_remaining(account.plan, account.registered_at, now) {
        Some(days_remaining) => Err(QuotaError::learning_period(days_remaining)),
        None => Ok(()),
    }
}

/// Record the engine should see for this request.
///
/// A missing record starts a fresh window. The account's current plan
/// replaces the stored one while count and window anchor are kept, then
/// any due window reset is applied.
pub(super) fn effective_record(
    engine: &QuotaEngine,
    stored: Option<&UsageRecord>,
    plan: PlanTier,
    now: Timestamp,
) -> UsageRecord {
    let record = match stored {
        Some(record) => record.with_plan(plan),
        None => UsageRecord::fresh(plan, now),
    };
    engine.current_window(&record, now)
}
