//! Quota engine - pure AI quota decisions.
//!
//! The engine never performs I/O and never fails. Callers read the usage
//! record, ask the engine for a decision, and persist whatever the decision
//! implies themselves.

use std::sync::Arc;

use super::{
    LearningPeriodPolicy, PlanCatalog, PlanLimit, PlanTier, QuotaDecision, StandardPlanCatalog,
    UsageRecord,
};
use crate::domain::foundation::Timestamp;

/// Evaluates usage records against plan limits and the learning period.
#[derive(Clone)]
pub struct QuotaEngine {
    catalog: Arc<dyn PlanCatalog>,
    learning_period: LearningPeriodPolicy,
}

impl QuotaEngine {
    /// Creates an engine over the given catalog and learning period.
    pub fn new(catalog: Arc<dyn PlanCatalog>, learning_period: LearningPeriodPolicy) -> Self {
        Self {
            catalog,
            learning_period,
        }
    }

    /// Engine with the published plan limits and the 22-day learning period.
    pub fn standard() -> Self {
        Self::new(
            Arc::new(StandardPlanCatalog),
            LearningPeriodPolicy::standard(),
        )
    }

    /// Returns the limit that applies to a plan.
    pub fn limit_for(&self, plan: PlanTier) -> PlanLimit {
        self.catalog.limit_for(plan)
    }

    /// Returns the learning period policy in use.
    pub fn learning_period(&self) -> LearningPeriodPolicy {
        self.learning_period
    }

    /// Applies a window reset if the record's window has ended at `now`.
    ///
    /// This is the record a caller should persist when committing the reset.
    pub fn current_window(&self, usage: &UsageRecord, now: Timestamp) -> UsageRecord {
        let window_end = self.limit_for(usage.plan).window.end_of(usage.last_reset);
        if now >= window_end {
            UsageRecord::fresh(usage.plan, now)
        } else {
            *usage
        }
    }

    /// Decides whether another AI request is allowed.
    pub fn evaluate(&self, usage: &UsageRecord, now: Timestamp) -> QuotaDecision {
        let limit = self.limit_for(usage.plan);
        let effective = self.current_window(usage, now);

        QuotaDecision {
            allowed: effective.count < limit.max_requests,
            remaining: limit.max_requests.saturating_sub(effective.count),
            limit: limit.max_requests,
            used: effective.count,
            reset_date: limit.window.end_of(effective.last_reset),
            plan: usage.plan,
        }
    }

    /// Returns the record with one more request counted.
    ///
    /// Does not enforce the limit; only call after `evaluate` allowed the
    /// request in the same window.
    pub fn record_usage(&self, usage: &UsageRecord) -> UsageRecord {
        usage.incremented()
    }

    /// Returns true while a user must not use AI features at all.
    pub fn is_within_learning_period(
        &self,
        plan: PlanTier,
        registered_at: Timestamp,
        now: Timestamp,
    ) -> bool {
        self.learning_period.is_blocked(plan, registered_at, now)
    }

    /// Days until the learning period ends, or `None` if not blocked.
    pub fn learning_days_remaining(
        &self,
        plan: PlanTier,
        registered_at: Timestamp,
        now: Timestamp,
    ) -> Option<u32> {
        self.learning_period.days_remaining(plan, registered_at, now)
    }
}

impl Default for QuotaEngine {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for QuotaEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuotaEngine")
            .field("learning_period", &self.learning_period)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quota::WindowKind;
    use proptest::prelude::*;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse_rfc3339(s).unwrap()
    }

    fn record(plan: PlanTier, count: u32, last_reset: Timestamp) -> UsageRecord {
        UsageRecord {
            count,
            last_reset,
            plan,
        }
    }

    fn any_plan() -> impl Strategy<Value = PlanTier> {
        prop_oneof![
            Just(PlanTier::Basic),
            Just(PlanTier::Professional),
            Just(PlanTier::Premium),
        ]
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Scenarios
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn basic_with_three_used_has_two_left() {
        let engine = QuotaEngine::standard();
        let reset = ts("2025-10-20T09:00:00Z");
        let decision = engine.evaluate(&record(PlanTier::Basic, 3, reset), reset.add_days(2));

        assert!(decision.allowed);
        assert_eq!(decision.remaining, 2);
        assert_eq!(decision.limit, 5);
        assert_eq!(decision.used, 3);
    }

    #[test]
    fn basic_at_limit_is_denied() {
        let engine = QuotaEngine::standard();
        let reset = ts("2025-10-20T09:00:00Z");
        let decision = engine.evaluate(&record(PlanTier::Basic, 5, reset), reset.add_days(3));

        assert!(!decision.allowed);
        assert_eq!(decision.remaining, 0);
    }

    #[test]
    fn premium_halfway_through_monthly_quota() {
        let engine = QuotaEngine::standard();
        let reset = ts("2025-10-24T10:00:00Z");
        let decision = engine.evaluate(&record(PlanTier::Premium, 25, reset), reset.add_days(15));

        assert!(decision.allowed);
        assert_eq!(decision.remaining, 25);
        assert_eq!(decision.limit, 50);
    }

    #[test]
    fn professional_with_four_used_has_three_left() {
        let engine = QuotaEngine::standard();
        let reset = ts("2025-10-20T09:00:00Z");
        let decision =
            engine.evaluate(&record(PlanTier::Professional, 4, reset), reset.add_days(1));

        assert!(decision.allowed);
        assert_eq!(decision.remaining, 3);
        assert_eq!(decision.limit, 7);
    }

    #[test]
    fn count_above_limit_reports_zero_remaining() {
        let engine = QuotaEngine::standard();
        let reset = ts("2025-10-20T09:00:00Z");
        let decision = engine.evaluate(&record(PlanTier::Basic, 9, reset), reset);

        assert!(!decision.allowed);
        assert_eq!(decision.remaining, 0);
        assert_eq!(decision.used, 9);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Window resets
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn weekly_window_resets_after_seven_days() {
        let engine = QuotaEngine::standard();
        let reset = ts("2025-10-20T09:00:00Z");
        let now = reset.add_days(7);
        let decision = engine.evaluate(&record(PlanTier::Basic, 5, reset), now);

        assert!(decision.allowed);
        assert_eq!(decision.used, 0);
        assert_eq!(decision.remaining, 5);
        assert_eq!(decision.reset_date, now.add_days(7));
    }

    #[test]
    fn weekly_window_not_reset_one_second_early() {
        let engine = QuotaEngine::standard();
        let reset = ts("2025-10-20T09:00:00Z");
        let now = ts("2025-10-27T08:59:59Z");
        let decision = engine.evaluate(&record(PlanTier::Professional, 7, reset), now);

        assert!(!decision.allowed);
        assert_eq!(decision.reset_date, ts("2025-10-27T09:00:00Z"));
    }

    #[test]
    fn monthly_window_resets_on_same_calendar_date() {
        let engine = QuotaEngine::standard();
        let reset = ts("2025-10-24T10:00:00Z");
        let now = ts("2025-11-24T10:00:00Z");
        let decision = engine.evaluate(&record(PlanTier::Premium, 50, reset), now);

        assert!(decision.allowed);
        assert_eq!(decision.used, 0);
        assert_eq!(decision.remaining, 50);
    }

    #[test]
    fn monthly_reset_date_for_open_window() {
        let engine = QuotaEngine::standard();
        let reset = ts("2025-10-24T10:00:00Z");
        let decision =
            engine.evaluate(&record(PlanTier::Premium, 10, reset), ts("2025-11-01T00:00:00Z"));

        assert_eq!(decision.reset_date, ts("2025-11-24T10:00:00Z"));
    }

    #[test]
    fn current_window_returns_fresh_record_after_expiry() {
        let engine = QuotaEngine::standard();
        let reset = ts("2025-10-20T09:00:00Z");
        let now = reset.add_days(8);
        let effective = engine.current_window(&record(PlanTier::Basic, 4, reset), now);

        assert_eq!(effective, UsageRecord::fresh(PlanTier::Basic, now));
    }

    #[test]
    fn current_window_keeps_open_record() {
        let engine = QuotaEngine::standard();
        let reset = ts("2025-10-20T09:00:00Z");
        let usage = record(PlanTier::Basic, 4, reset);
        assert_eq!(engine.current_window(&usage, reset.add_days(6)), usage);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Increment and learning period
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn record_usage_adds_one_and_keeps_input() {
        let engine = QuotaEngine::standard();
        let usage = record(PlanTier::Basic, 2, ts("2025-10-20T09:00:00Z"));
        let next = engine.record_usage(&usage);

        assert_eq!(next.count, 3);
        assert_eq!(next.last_reset, usage.last_reset);
        assert_eq!(next.plan, usage.plan);
        assert_eq!(usage.count, 2);
    }

    #[test]
    fn learning_period_blocks_basic_for_22_days() {
        let engine = QuotaEngine::standard();
        let registered = ts("2025-09-01T00:00:00Z");

        assert!(engine.is_within_learning_period(
            PlanTier::Basic,
            registered,
            registered.add_days(10)
        ));
        assert_eq!(
            engine.learning_days_remaining(PlanTier::Basic, registered, registered.add_days(10)),
            Some(12)
        );
        assert!(!engine.is_within_learning_period(
            PlanTier::Basic,
            registered,
            registered.add_days(22)
        ));
        assert!(!engine.is_within_learning_period(
            PlanTier::Professional,
            registered,
            registered
        ));
    }

    #[test]
    fn custom_catalog_is_honoured() {
        struct TinyCatalog;
        impl PlanCatalog for TinyCatalog {
            fn limit_for(&self, _plan: PlanTier) -> PlanLimit {
                PlanLimit {
                    max_requests: 1,
                    window: WindowKind::Weekly,
                }
            }
        }

        let engine = QuotaEngine::new(Arc::new(TinyCatalog), LearningPeriodPolicy::standard());
        let reset = ts("2025-10-20T09:00:00Z");
        let decision = engine.evaluate(&record(PlanTier::Premium, 1, reset), reset);

        assert!(!decision.allowed);
        assert_eq!(decision.limit, 1);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Properties
    // ════════════════════════════════════════════════════════════════════════════

    proptest! {
        #[test]
        fn remaining_and_allowed_follow_count(plan in any_plan(), seed in 0u32..=50, days_in in 0i64..7) {
            let engine = QuotaEngine::standard();
            let max = PlanLimit::for_plan(plan).max_requests;
            let count = seed % (max + 1);
            let reset = ts("2025-10-01T00:00:00Z");
            let now = reset.add_days(days_in);

            let decision = engine.evaluate(&record(plan, count, reset), now);

            prop_assert_eq!(decision.remaining, max - count);
            prop_assert_eq!(decision.allowed, count < max);
            prop_assert_eq!(decision.used, count);
        }

        #[test]
        fn evaluate_is_idempotent(plan in any_plan(), count in 0u32..100, days in 0i64..60) {
            let engine = QuotaEngine::standard();
            let reset = ts("2025-10-01T00:00:00Z");
            let usage = record(plan, count, reset);
            let now = reset.add_days(days);

            prop_assert_eq!(engine.evaluate(&usage, now), engine.evaluate(&usage, now));
        }

        #[test]
        fn weekly_plans_reset_at_seven_days(count in 0u32..100, extra_days in 0i64..30) {
            let engine = QuotaEngine::standard();
            let reset = ts("2025-10-01T00:00:00Z");
            for plan in [PlanTier::Basic, PlanTier::Professional] {
                let decision = engine.evaluate(&record(plan, count, reset), reset.add_days(7 + extra_days));
                prop_assert_eq!(decision.used, 0);
                prop_assert_eq!(decision.remaining, PlanLimit::for_plan(plan).max_requests);
            }
        }
    }
}
