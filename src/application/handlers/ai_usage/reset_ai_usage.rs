//! ResetAiUsageHandler - Admin command clearing a user's AI usage.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::foundation::UserId;
use crate::domain::quota::QuotaError;
use crate::ports::{AdminPolicy, UsageStore};

/// Command to clear a user's usage so the next check opens a fresh window.
#[derive(Debug, Clone)]
pub struct ResetAiUsageCommand {
    /// Email of the administrator issuing the reset.
    pub actor_email: Option<String>,
    pub user_id: UserId,
}

/// Handler for admin usage resets.
#[derive(Clone)]
pub struct ResetAiUsageHandler {
    store: Arc<dyn UsageStore>,
    admin_policy: Arc<dyn AdminPolicy>,
}

impl ResetAiUsageHandler {
    pub fn new(store: Arc<dyn UsageStore>, admin_policy: Arc<dyn AdminPolicy>) -> Self {
        Self {
            store,
            admin_policy,
        }
    }

    pub async fn handle(&self, cmd: ResetAiUsageCommand) -> Result<(), QuotaError> {
        let actor = cmd.actor_email.as_deref().unwrap_or_default();
        if !self.admin_policy.is_admin(actor) {
            warn!(user_id = %cmd.user_id, actor, "Non-admin attempted AI usage reset");
            return Err(QuotaError::forbidden("admin access required"));
        }

        self.store
            .delete(&cmd.user_id)
            .await
            .map_err(|e| QuotaError::store_unavailable(e.to_string()))?;

        info!(user_id = %cmd.user_id, actor, "AI usage reset by admin");
        Ok(())
    }
}
