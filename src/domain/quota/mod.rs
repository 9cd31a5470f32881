//! AI quota domain module.
//!
//! Decides whether a user may run another AI analysis, based on their plan,
//! their stored usage and the current time.
//!
//! # Module Structure
//!
//! - `plan` - PlanTier subscription levels
//! - `plan_limit` - Requests and window length per plan
//! - `usage_record` - Stored usage for one user
//! - `decision` - QuotaDecision returned by the engine
//! - `learning_period` - 22-day gate for new basic users
//! - `engine` - Pure evaluation logic
//! - `errors` - Errors raised by callers enforcing decisions

mod decision;
mod engine;
mod errors;
mod learning_period;
mod plan;
mod plan_limit;
mod usage_record;

pub use decision::QuotaDecision;
pub use engine::QuotaEngine;
pub use errors::QuotaError;
pub use learning_period::{LearningPeriodPolicy, DEFAULT_LEARNING_PERIOD_DAYS};
pub use plan::PlanTier;
pub use plan_limit::{PlanCatalog, PlanLimit, StandardPlanCatalog, WindowKind};
pub use usage_record::UsageRecord;
