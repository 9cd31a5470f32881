//! AI usage handlers.
//!
//! Compose the quota engine with the usage store, account reader and AI
//! provider, and enforce the call ordering around an AI request.
//!
//! ## Queries
//! - Check whether a user may make another AI request
//!
//! ## Commands
//! - Count one AI request against the user's quota
//! - Run an AI analysis guarded by the quota
//! - Reset a user's usage (admin)

mod check_ai_limit;
mod increment_ai_usage;
mod reset_ai_usage;
mod run_ai_analysis;
mod support;

// Queries
pub use check_ai_limit::{CheckAiLimitHandler, CheckAiLimitQuery};

// Commands
pub use increment_ai_usage::{
    IncrementAiUsageCommand, IncrementAiUsageHandler, IncrementAiUsageResult,
    DEFAULT_MAX_INCREMENT_RETRIES,
};
pub use reset_ai_usage::{ResetAiUsageCommand, ResetAiUsageHandler};
pub use run_ai_analysis::{RunAiAnalysisCommand, RunAiAnalysisHandler, RunAiAnalysisResult};
