//! Result of evaluating a usage record.

use serde::{Deserialize, Serialize};

use super::{PlanLimit, PlanTier};
use crate::domain::foundation::Timestamp;

/// Whether a user may make another AI request, and how much quota is left.
///
/// Serializes as `{allowed, remaining, limit, used, resetDate, plan}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaDecision {
    pub allowed: bool,
    pub remaining: u32,
    pub limit: u32,
    pub used: u32,
    pub reset_date: Timestamp,
    pub plan: PlanTier,
}

impl QuotaDecision {
    /// Decision returned when usage cannot be read.
    ///
    /// Grants the full quota of the plan with a window starting at `now`.
    pub fn permissive(plan: PlanTier, limit: PlanLimit, now: Timestamp) -> Self {
        Self {
            allowed: true,
            remaining: limit.max_requests,
            limit: limit.max_requests,
            used: 0,
            reset_date: limit.window.end_of(now),
            plan,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permissive_decision_grants_full_quota() {
        let now = Timestamp::parse_rfc3339("2025-10-24T10:00:00Z").unwrap();
        let decision =
            QuotaDecision::permissive(PlanTier::Basic, PlanLimit::for_plan(PlanTier::Basic), now);

        assert!(decision.allowed);
        assert_eq!(decision.remaining, 5);
        assert_eq!(decision.used, 0);
        assert_eq!(decision.reset_date, now.add_days(7));
    }

    #[test]
    fn serializes_reset_date_in_camel_case() {
        let now = Timestamp::parse_rfc3339("2025-10-24T10:00:00Z").unwrap();
        let decision = QuotaDecision::permissive(
            PlanTier::Premium,
            PlanLimit::for_plan(PlanTier::Premium),
            now,
        );
        let json = serde_json::to_value(decision).unwrap();

        assert_eq!(json["resetDate"], "2025-11-24T10:00:00Z");
        assert_eq!(json["plan"], "premium");
        assert_eq!(json["limit"], 50);
    }
}
