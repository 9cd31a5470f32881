//! In-memory usage store for testing and development.
//!
//! Compare-and-swap holds the write lock across the comparison and the
//! write, which makes it atomic within one process. Not suitable for
//! multi-server deployments.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::UserId;
use crate::domain::quota::UsageRecord;
use crate::ports::{UsageStore, UsageStoreError};

/// In-memory usage store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUsageStore {
    records: Arc<RwLock<HashMap<UserId, UsageRecord>>>,
}

impl InMemoryUsageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a record, replacing any existing one.
    pub async fn insert(&self, user_id: UserId, record: UsageRecord) {
        self.records.write().await.insert(user_id, record);
    }

    /// Number of users with a stored record.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl UsageStore for InMemoryUsageStore {
    async fn read(&self, user_id: &UserId) -> Result<Option<UsageRecord>, UsageStoreError> {
        Ok(self.records.read().await.get(user_id).copied())
    }

    async fn write(&self, user_id: &UserId, record: &UsageRecord) -> Result<(), UsageStoreError> {
        self.records.write().await.insert(user_id.clone(), *record);
        Ok(())
    }

    async fn compare_and_swap(
        &self,
        user_id: &UserId,
        expected: Option<&UsageRecord>,
        new: &UsageRecord,
    ) -> Result<bool, UsageStoreError> {
        let mut records = self.records.write().await;

        if records.get(user_id) != expected {
            return Ok(false);
        }

        records.insert(user_id.clone(), *new);
        Ok(true)
    }

    async fn delete(&self, user_id: &UserId) -> Result<(), UsageStoreError> {
        self.records.write().await.remove(user_id);
        Ok(())
    }
}
