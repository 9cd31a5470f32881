//! PostgreSQL implementation of AccountReader.
//!
//! Reads the `profiles` table maintained by the hosted auth provider.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::quota::PlanTier;
use crate::ports::{AccountProfile, AccountReader, AccountReaderError};

/// PostgreSQL implementation of the AccountReader port.
#[derive(Clone)]
pub struct PostgresAccountReader {
    pool: PgPool,
}

impl PostgresAccountReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    id: Uuid,
    email: String,
    plan: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for AccountProfile {
    type Error = AccountReaderError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        // Profiles created before plans existed have no plan column value.
        let plan = match row.plan.as_deref() {
            None | Some("") => PlanTier::Basic,
            Some(raw) => raw
                .parse()
                .map_err(|e| AccountReaderError::Corrupt(format!("{}", e)))?,
        };

        Ok(AccountProfile {
            user_id: UserId::new(row.id.to_string())
                .map_err(|e| AccountReaderError::Corrupt(e.to_string()))?,
            email: row.email,
            plan,
            registered_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[async_trait]
impl AccountReader for PostgresAccountReader {
    async fn get_account(
        &self,
        user_id: &UserId,
    ) -> Result<Option<AccountProfile>, AccountReaderError> {
        // Ids that are not UUIDs cannot exist in the profiles table.
        let Ok(uuid) = user_id.to_uuid() else {
            return Ok(None);
        };

        let row: Option<ProfileRow> = sqlx::query_as(
            r#"
            SELECT id, email, plan, created_at
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(uuid)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccountReaderError::Unavailable(format!("Database error: {}", e)))?;

        row.map(AccountProfile::try_from).transpose()
    }
}

impl std::fmt::Debug for PostgresAccountReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresAccountReader").finish_non_exhaustive()
    }
}
