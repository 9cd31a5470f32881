//! Account reader port - Plan and registration date for a user.
//!
//! Accounts live in the hosted auth/database provider. The quota handlers
//! only need the current plan (which may differ from the plan a usage window
//! was opened under) and the registration date for the learning period.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::quota::PlanTier;

/// Read-only view of a user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProfile {
    pub user_id: UserId,
    pub email: String,
    pub plan: PlanTier,
    pub registered_at: Timestamp,
}

/// Reader port for account queries.
#[async_trait]
pub trait AccountReader: Send + Sync {
    /// Returns the account for a user, or `None` if there is none.
    async fn get_account(&self, user_id: &UserId)
        -> Result<Option<AccountProfile>, AccountReaderError>;
}

/// Errors from the account reader.
#[derive(Debug, thiserror::Error)]
pub enum AccountReaderError {
    #[error("account store unavailable: {0}")]
    Unavailable(String),

    #[error("corrupt account row: {0}")]
    Corrupt(String),
}
