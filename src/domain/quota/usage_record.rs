//! Stored AI usage for one user.

use serde::{Deserialize, Serialize};

use super::PlanTier;
use crate::domain::foundation::Timestamp;

/// AI requests consumed by one user in the current window.
///
/// `count` only returns to zero through a window reset; within a window it
/// never decreases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    /// Requests consumed in the current window.
    pub count: u32,
    /// Start of the current counting window.
    pub last_reset: Timestamp,
    /// Plan the window was opened under.
    pub plan: PlanTier,
}

impl UsageRecord {
    /// Creates the record used on a user's first AI attempt.
    pub fn fresh(plan: PlanTier, now: Timestamp) -> Self {
        Self {
            count: 0,
            last_reset: now,
            plan,
        }
    }

    /// Returns a copy with one more request counted.
    pub fn incremented(&self) -> Self {
        Self {
            count: self.count.saturating_add(1),
            ..*self
        }
    }

    /// Returns a copy under a different plan, keeping count and window anchor.
    pub fn with_plan(&self, plan: PlanTier) -> Self {
        Self { plan, ..*self }
    }
}
