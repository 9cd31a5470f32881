//! Usage store adapters.
//!
//! - `InMemoryUsageStore` - single-process map, for tests and local runs
//! - `PostgresUsageStore` - `ai_usage` table with conditional updates
//! - `RedisUsageStore` - per-user hash with a Lua compare-and-swap

mod in_memory;
mod postgres;
mod redis;

pub use in_memory::InMemoryUsageStore;
pub use postgres::PostgresUsageStore;
pub use self::redis::RedisUsageStore;
