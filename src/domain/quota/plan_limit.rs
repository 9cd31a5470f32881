//! AI request limits per plan.

use serde::{Deserialize, Serialize};

use super::PlanTier;
use crate::domain::foundation::Timestamp;

/// Length of a quota counting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    /// Rolling 7 days anchored to the last reset instant.
    Weekly,
    /// Same calendar date one month after the last reset.
    Monthly,
}

impl WindowKind {
    /// Returns the instant at which a window starting at `start` ends.
    pub fn end_of(&self, start: Timestamp) -> Timestamp {
        match self {
            WindowKind::Weekly => start.add_days(7),
            WindowKind::Monthly => start.add_calendar_months(1),
        }
    }
}

/// AI request limit for a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanLimit {
    /// Requests allowed per window.
    pub max_requests: u32,
    /// Window over which requests are counted.
    pub window: WindowKind,
}

impl PlanLimit {
    /// Get the limit for a specific plan.
    ///
    /// | Plan | Requests | Window |
    /// |------|----------|--------|
    /// | Basic | 5 | weekly |
    /// | Professional | 7 | weekly |
    /// | Premium | 50 | monthly |
    pub fn for_plan(plan: PlanTier) -> Self {
        match plan {
            PlanTier::Basic => Self {
                max_requests: 5,
                window: WindowKind::Weekly,
            },
            PlanTier::Professional => Self {
                max_requests: 7,
                window: WindowKind::Weekly,
            },
            PlanTier::Premium => Self {
                max_requests: 50,
                window: WindowKind::Monthly,
            },
        }
    }
}

/// Source of plan limits.
///
/// The engine only ever asks for one plan at a time, so implementations can
/// be backed by configuration or a pricing service snapshot.
pub trait PlanCatalog: Send + Sync {
    /// Returns the limit for the given plan.
    fn limit_for(&self, plan: PlanTier) -> PlanLimit;
}

/// Built-in plan catalog with the published limits.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardPlanCatalog;

impl PlanCatalog for StandardPlanCatalog {
    fn limit_for(&self, plan: PlanTier) -> PlanLimit {
        PlanLimit::for_plan(plan)
    }
}
