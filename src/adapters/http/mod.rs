//! HTTP adapters - REST API implementations.

pub mod ai_usage;

pub use ai_usage::{ai_usage_router, AiUsageAppState};
