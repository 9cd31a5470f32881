//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Quota Ports
//!
//! - `UsageStore` - Per-user usage records with atomic compare-and-swap
//! - `Clock` - Current time, injectable for tests
//! - `AccountReader` - Plan and registration date per user
//!
//! ## External Service Ports
//!
//! - `AiAnalyzer` - The AI completion provider
//! - `AdminPolicy` - Administrator allowlist
//!
//! The plan catalog is domain knowledge and lives in `domain::quota`.

mod account_reader;
mod admin_policy;
mod ai_analyzer;
mod clock;
mod usage_store;

pub use account_reader::{AccountProfile, AccountReader, AccountReaderError};
pub use admin_policy::AdminPolicy;
pub use ai_analyzer::{AiAnalyzer, AiError, AnalysisKind, AnalysisRequest, AnalysisResponse};
pub use clock::Clock;
pub use usage_store::{UsageStore, UsageStoreError};
