//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `usage_store` - AI usage persistence (in-memory, PostgreSQL, Redis)
//! - `account` - Account lookups (in-memory, PostgreSQL)
//! - `clock` - System and fixed clocks
//! - `admin` - Admin allowlist
//! - `ai` - Scripted AI analyzer
//! - `http` - REST endpoints

pub mod account;
pub mod admin;
pub mod ai;
pub mod clock;
pub mod http;
pub mod usage_store;

pub use account::{InMemoryAccountReader, PostgresAccountReader};
pub use admin::AllowlistAdminPolicy;
pub use ai::MockAnalyzer;
pub use clock::{FixedClock, SystemClock};
pub use usage_store::{InMemoryUsageStore, PostgresUsageStore, RedisUsageStore};
