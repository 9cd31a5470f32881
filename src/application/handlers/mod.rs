//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod ai_usage;

pub use ai_usage::{
    CheckAiLimitHandler, CheckAiLimitQuery, IncrementAiUsageCommand, IncrementAiUsageHandler,
    IncrementAiUsageResult, ResetAiUsageCommand, ResetAiUsageHandler, RunAiAnalysisCommand,
    RunAiAnalysisHandler, RunAiAnalysisResult,
};
