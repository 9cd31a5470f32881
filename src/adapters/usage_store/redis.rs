//! Redis-backed usage store for multi-server deployments.
//!
//! Each user has a hash `{prefix}:{user_id}` with fields `count`,
//! `last_reset` (unix millis) and `plan`. Compare-and-swap runs as a Lua
//! script so the comparison and the write happen in one server-side step.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::quota::{PlanTier, UsageRecord};
use crate::ports::{UsageStore, UsageStoreError};

/// Default hash key prefix.
pub const DEFAULT_KEY_PREFIX: &str = "ai_usage";

/// Returns 1 when the swap was applied, 0 when the stored value differed.
///
/// ARGV: has_expected, expected_count, expected_reset, count, reset, plan
const CAS_SCRIPT: &str = r#"
local exists = redis.call('EXISTS', KEYS[1])
if ARGV[1] == '0' then
    if exists == 1 then return 0 end
else
    if exists == 0 then return 0 end
    local current = redis.call('HMGET', KEYS[1], 'count', 'last_reset')
    if current[1] ~= ARGV[2] or current[2] ~= ARGV[3] then return 0 end
end
redis.call('HSET', KEYS[1], 'count', ARGV[4], 'last_reset', ARGV[5], 'plan', ARGV[6])
return 1
"#;

/// Redis implementation of the UsageStore port.
#[derive(Clone)]
pub struct RedisUsageStore {
    conn: MultiplexedConnection,
    key_prefix: String,
    timeout: Duration,
}

impl RedisUsageStore {
    pub fn new(conn: MultiplexedConnection, timeout: Duration) -> Self {
        Self {
            conn,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            timeout,
        }
    }

    /// Overrides the hash key prefix.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    fn key(&self, user_id: &UserId) -> String {
        format!("{}:{}", self.key_prefix, user_id)
    }

    async fn bounded<T, F>(&self, op: F) -> Result<T, UsageStoreError>
    where
        F: Future<Output = Result<T, redis::RedisError>>,
    {
        match tokio::time::timeout(self.timeout, op).await {
            Ok(result) => result.map_err(|e| UsageStoreError::Unavailable(e.to_string())),
            Err(_) => Err(UsageStoreError::Unavailable(format!(
                "Redis timed out after {:?}",
                self.timeout
            ))),
        }
    }
}

fn decode_hash(fields: &HashMap<String, String>) -> Result<UsageRecord, UsageStoreError> {
    let field = |name: &str| {
        fields
            .get(name)
            .ok_or_else(|| UsageStoreError::Corrupt(format!("missing field {}", name)))
    };

    let count = field("count")?
        .parse::<u32>()
        .map_err(|e| UsageStoreError::Corrupt(format!("count: {}", e)))?;
    let millis = field("last_reset")?
        .parse::<i64>()
        .map_err(|e| UsageStoreError::Corrupt(format!("last_reset: {}", e)))?;
    let plan = field("plan")?
        .parse::<PlanTier>()
        .map_err(|e| UsageStoreError::Corrupt(e.to_string()))?;

    Ok(UsageRecord {
        count,
        last_reset: Timestamp::from_unix_millis(millis),
        plan,
    })
}

#[async_trait]
impl UsageStore for RedisUsageStore {
    async fn read(&self, user_id: &UserId) -> Result<Option<UsageRecord>, UsageStoreError> {
        let key = self.key(user_id);
        let mut conn = self.conn.clone();

        let fields: HashMap<String, String> = self.bounded(conn.hgetall(&key)).await?;
        if fields.is_empty() {
            return Ok(None);
        }

        decode_hash(&fields).map(Some)
    }

    async fn write(&self, user_id: &UserId, record: &UsageRecord) -> Result<(), UsageStoreError> {
        let key = self.key(user_id);
        let mut conn = self.conn.clone();

        let items = [
            ("count", record.count.to_string()),
            ("last_reset", record.last_reset.as_unix_millis().to_string()),
            ("plan", record.plan.as_str().to_string()),
        ];
        self.bounded(conn.hset_multiple::<_, _, _, ()>(&key, &items))
            .await
    }

    async fn compare_and_swap(
        &self,
        user_id: &UserId,
        expected: Option<&UsageRecord>,
        new: &UsageRecord,
    ) -> Result<bool, UsageStoreError> {
        let key = self.key(user_id);
        let mut conn = self.conn.clone();

        let (has_expected, expected_count, expected_reset) = match expected {
            Some(record) => (
                "1",
                record.count.to_string(),
                record.last_reset.as_unix_millis().to_string(),
            ),
            None => ("0", String::new(), String::new()),
        };

        let script = redis::Script::new(CAS_SCRIPT);
        let mut invocation = script.key(&key);
        invocation
            .arg(has_expected)
            .arg(expected_count)
            .arg(expected_reset)
            .arg(new.count)
            .arg(new.last_reset.as_unix_millis())
            .arg(new.plan.as_str());

        let applied: i64 = self.bounded(invocation.invoke_async(&mut conn)).await?;
        Ok(applied == 1)
    }

    async fn delete(&self, user_id: &UserId) -> Result<(), UsageStoreError> {
        let key = self.key(user_id);
        let mut conn = self.conn.clone();

        self.bounded(conn.del::<_, ()>(&key)).await
    }
}

impl std::fmt::Debug for RedisUsageStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisUsageStore")
            .field("key_prefix", &self.key_prefix)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
