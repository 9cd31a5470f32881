//! Learning period for new basic-plan users.
//!
//! Basic users cannot use AI features until a fixed number of whole
//! 24-hour periods have elapsed since the registration instant. Other plans
//! are never gated.

use super::PlanTier;
use crate::domain::foundation::Timestamp;

/// Default learning period length in days.
pub const DEFAULT_LEARNING_PERIOD_DAYS: u32 = 22;

/// Policy deciding whether a user is still in the learning period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LearningPeriodPolicy {
    days: u32,
}

impl LearningPeriodPolicy {
    /// The standard 22-day policy.
    pub fn standard() -> Self {
        Self::with_days(DEFAULT_LEARNING_PERIOD_DAYS)
    }

    /// A policy with a custom length.
    pub fn with_days(days: u32) -> Self {
        Self { days }
    }

    /// Length of the learning period in days.
    pub fn days(&self) -> u32 {
        self.days
    }

    /// Returns true if the plan is subject to the learning period.
    pub fn applies_to(&self, plan: PlanTier) -> bool {
        matches!(plan, PlanTier::Basic)
    }

    /// Days left before AI unlocks, or `None` when not blocked.
    ///
    /// Elapsed days are truncated: registered 10 days and 20 hours ago
    /// leaves 22 - 10 = 12 days.
    pub fn days_remaining(
        &self,
        plan: PlanTier,
        registered_at: Timestamp,
        now: Timestamp,
    ) -> Option<u32> {
        if !self.applies_to(plan) {
            return None;
        }

        let elapsed = now.whole_days_since(&registered_at);
        let remaining = i64::from(self.days) - elapsed;
        if remaining > 0 {
            Some(u32::try_from(remaining).unwrap_or(u32::MAX))
        } else {
            None
        }
    }

    /// Returns true while the user must not use AI features.
    pub fn is_blocked(&self, plan: PlanTier, registered_at: Timestamp, now: Timestamp) -> bool {
        self.days_remaining(plan, registered_at, now).is_some()
    }
}

impl Default for LearningPeriodPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registered() -> Timestamp {
        Timestamp::parse_rfc3339("2025-09-01T12:00:00Z").unwrap()
    }

    #[test]
    fn basic_user_blocked_ten_days_after_registration() {
        let policy = LearningPeriodPolicy::standard();
        let now = registered().add_days(10);

        assert!(policy.is_blocked(PlanTier::Basic, registered(), now));
        assert_eq!(policy.days_remaining(PlanTier::Basic, registered(), now), Some(12));
    }

    #[test]
    fn partial_days_are_truncated() {
        let policy = LearningPeriodPolicy::standard();
        let now = Timestamp::parse_rfc3339("2025-09-12T08:00:00Z").unwrap();

        // 10 days and 20 hours elapsed
        assert_eq!(policy.days_remaining(PlanTier::Basic, registered(), now), Some(12));
    }

    #[test]
    fn basic_user_unblocked_exactly_at_threshold() {
        let policy = LearningPeriodPolicy::standard();
        let now = registered().add_days(22);
        assert!(!policy.is_blocked(PlanTier::Basic, registered(), now));
    }

    #[test]
    fn basic_user_still_blocked_one_second_before_threshold() {
        let policy = LearningPeriodPolicy::standard();
        let now = Timestamp::parse_rfc3339("2025-09-23T11:59:59Z").unwrap();
        assert_eq!(policy.days_remaining(PlanTier::Basic, registered(), now), Some(1));
    }

    #[test]
    fn days_are_counted_in_elapsed_24_hour_periods_not_calendar_dates() {
        let policy = LearningPeriodPolicy::standard();
        let late_signup = Timestamp::parse_rfc3339("2025-09-01T23:00:00Z").unwrap();

        // 22 calendar dates later, but only 21 days and 1.5 hours elapsed
        let after_midnight = Timestamp::parse_rfc3339("2025-09-23T00:30:00Z").unwrap();
        assert_eq!(
            policy.days_remaining(PlanTier::Basic, late_signup, after_midnight),
            Some(1)
        );

        let unlock = Timestamp::parse_rfc3339("2025-09-23T23:00:00Z").unwrap();
        assert!(!policy.is_blocked(PlanTier::Basic, late_signup, unlock));
    }

    #[test]
    fn paid_plans_are_never_blocked() {
        let policy = LearningPeriodPolicy::standard();
        for plan in [PlanTier::Professional, PlanTier::Premium] {
            assert!(!policy.is_blocked(plan, registered(), registered()));
        }
    }

    #[test]
    fn registration_in_the_future_keeps_user_blocked() {
        let policy = LearningPeriodPolicy::standard();
        let now = registered().add_days(-1);
        assert_eq!(policy.days_remaining(PlanTier::Basic, registered(), now), Some(23));
    }

    #[test]
    fn zero_day_policy_never_blocks() {
        let policy = LearningPeriodPolicy::with_days(0);
        assert!(!policy.is_blocked(PlanTier::Basic, registered(), registered()));
    }
}
