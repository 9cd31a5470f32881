//! PostgreSQL implementation of UsageStore.
//!
//! One row per user in `ai_usage`. Compare-and-swap is a single conditional
//! statement, so concurrent increments from any number of server instances
//! cannot both succeed against the same snapshot. `count` and `last_reset`
//! identify a version; `plan` is not compared since a plan-only change
//! cannot lose an increment and legacy rows may still say `pro`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::quota::{PlanTier, UsageRecord};
use crate::ports::{UsageStore, UsageStoreError};

/// PostgreSQL implementation of the UsageStore port.
#[derive(Clone)]
pub struct PostgresUsageStore {
    pool: PgPool,
}

impl PostgresUsageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a usage record.
#[derive(Debug, sqlx::FromRow)]
struct UsageRow {
    count: i32,
    last_reset: DateTime<Utc>,
    plan: String,
}

impl TryFrom<UsageRow> for UsageRecord {
    type Error = UsageStoreError;

    fn try_from(row: UsageRow) -> Result<Self, Self::Error> {
        let count = u32::try_from(row.count)
            .map_err(|_| UsageStoreError::Corrupt(format!("negative count {}", row.count)))?;
        let plan: PlanTier = row
            .plan
            .parse()
            .map_err(|e| UsageStoreError::Corrupt(format!("{}", e)))?;

        Ok(UsageRecord {
            count,
            last_reset: Timestamp::from_datetime(row.last_reset),
            plan,
        })
    }
}

fn user_uuid(user_id: &UserId) -> Result<Uuid, UsageStoreError> {
    user_id
        .to_uuid()
        .map_err(|e| UsageStoreError::InvalidKey(e.to_string()))
}

fn count_param(count: u32) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

fn db_error(e: sqlx::Error) -> UsageStoreError {
    UsageStoreError::Unavailable(format!("Database error: {}", e))
}

#[async_trait]
impl UsageStore for PostgresUsageStore {
    async fn read(&self, user_id: &UserId) -> Result<Option<UsageRecord>, UsageStoreError> {
        let uuid = user_uuid(user_id)?;

        let row: Option<UsageRow> = sqlx::query_as(
            r#"
            SELECT count, last_reset, plan
            FROM ai_usage
            WHERE user_id = $1
            "#,
        )
        .bind(uuid)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(UsageRecord::try_from).transpose()
    }

    async fn write(&self, user_id: &UserId, record: &UsageRecord) -> Result<(), UsageStoreError> {
        let uuid = user_uuid(user_id)?;

        sqlx::query(
            r#"
            INSERT INTO ai_usage (user_id, count, last_reset, plan, updated_at)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (user_id) DO UPDATE SET
                count = EXCLUDED.count,
                last_reset = EXCLUDED.last_reset,
                plan = EXCLUDED.plan,
                updated_at = NOW()
            "#,
        )
        .bind(uuid)
        .bind(count_param(record.count))
        .bind(*record.last_reset.as_datetime())
        .bind(record.plan.as_str())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn compare_and_swap(
        &self,
        user_id: &UserId,
        expected: Option<&UsageRecord>,
        new: &UsageRecord,
    ) -> Result<bool, UsageStoreError> {
        let uuid = user_uuid(user_id)?;

        let result = match expected {
            None => sqlx::query(
                r#"
                INSERT INTO ai_usage (user_id, count, last_reset, plan, updated_at)
                VALUES ($1, $2, $3, $4, NOW())
                ON CONFLICT (user_id) DO NOTHING
                "#,
            )
            .bind(uuid)
            .bind(count_param(new.count))
            .bind(*new.last_reset.as_datetime())
            .bind(new.plan.as_str())
            .execute(&self.pool)
            .await
            .map_err(db_error)?,

            Some(expected) => sqlx::query(
                r#"
                UPDATE ai_usage
                SET count = $2, last_reset = $3, plan = $4, updated_at = NOW()
                WHERE user_id = $1
                  AND count = $5
                  AND last_reset = $6
                "#,
            )
            .bind(uuid)
            .bind(count_param(new.count))
            .bind(*new.last_reset.as_datetime())
            .bind(new.plan.as_str())
            .bind(count_param(expected.count))
            .bind(*expected.last_reset.as_datetime())
            .execute(&self.pool)
            .await
            .map_err(db_error)?,
        };

        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, user_id: &UserId) -> Result<(), UsageStoreError> {
        let uuid = user_uuid(user_id)?;

        sqlx::query("DELETE FROM ai_usage WHERE user_id = $1")
            .bind(uuid)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(())
    }
}

impl std::fmt::Debug for PostgresUsageStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresUsageStore").finish_non_exhaustive()
    }
}
