//! UsageStore port - Interface for persisting AI usage records.
//!
//! One record per user holds the request count for the current window.
//!
//! # Concurrency
//!
//! Two requests from the same user may both read `count = 4`, both be
//! allowed, and both write `count = 5`, losing one increment. Increments
//! therefore go through `compare_and_swap`, which implementations must
//! perform as a single conditional write at the store (a conditional
//! `UPDATE`, a Lua script, or a comparison under the map lock). Callers
//! retry on conflict.
//!
//! # Example
//!
//! ```ignore
//! let current = store.read(&user_id).await?;
//! let base = current.clone().unwrap_or_else(|| UsageRecord::fresh(plan, now));
//! let next = engine.record_usage(&engine.current_window(&base, now));
//! if !store.compare_and_swap(&user_id, current.as_ref(), &next).await? {
//!     // someone else wrote first; re-read and evaluate again
//! }
//! ```

use async_trait::async_trait;

use crate::domain::foundation::UserId;
use crate::domain::quota::UsageRecord;

/// Port for reading and writing per-user AI usage.
///
/// Implementations may store usage in PostgreSQL, Redis, or memory.
#[async_trait]
pub trait UsageStore: Send + Sync {
    /// Reads the usage record for a user, if one exists.
    async fn read(&self, user_id: &UserId) -> Result<Option<UsageRecord>, UsageStoreError>;

    /// Unconditionally writes the usage record for a user.
    async fn write(&self, user_id: &UserId, record: &UsageRecord) -> Result<(), UsageStoreError>;

    /// Atomically replaces the record if it still equals `expected`.
    ///
    /// `expected = None` means "only if no record exists". Returns `false`
    /// when the stored value no longer matches and nothing was written.
    async fn compare_and_swap(
        &self,
        user_id: &UserId,
        expected: Option<&UsageRecord>,
        new: &UsageRecord,
    ) -> Result<bool, UsageStoreError>;

    /// Removes the usage record for a user.
    async fn delete(&self, user_id: &UserId) -> Result<(), UsageStoreError>;
}

/// Errors from the usage store.
#[derive(Debug, thiserror::Error)]
pub enum UsageStoreError {
    /// Backend could not be reached or the query failed.
    #[error("usage store unavailable: {0}")]
    Unavailable(String),

    /// Stored data could not be decoded.
    #[error("corrupt usage record: {0}")]
    Corrupt(String),

    /// User id not usable as a storage key.
    #[error("invalid user id: {0}")]
    InvalidKey(String),
}
