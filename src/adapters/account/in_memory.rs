//! In-memory account reader for tests and local runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::UserId;
use crate::ports::{AccountProfile, AccountReader, AccountReaderError};

/// Account reader backed by a map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccountReader {
    accounts: Arc<RwLock<HashMap<UserId, AccountProfile>>>,
}

impl InMemoryAccountReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a reader pre-populated with accounts.
    pub fn with_accounts(accounts: impl IntoIterator<Item = AccountProfile>) -> Self {
        let map = accounts
            .into_iter()
            .map(|account| (account.user_id.clone(), account))
            .collect();
        Self {
            accounts: Arc::new(RwLock::new(map)),
        }
    }

    /// Adds or replaces an account (e.g. to simulate a plan change).
    pub async fn upsert(&self, account: AccountProfile) {
        self.accounts
            .write()
            .await
            .insert(account.user_id.clone(), account);
    }
}

#[async_trait]
impl AccountReader for InMemoryAccountReader {
    async fn get_account(
        &self,
        user_id: &UserId,
    ) -> Result<Option<AccountProfile>, AccountReaderError> {
        Ok(self.accounts.read().await.get(user_id).cloned())
    }
}
