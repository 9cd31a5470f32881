//! Admin configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Administrators allowed to run support operations
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminConfig {
    /// Comma-separated admin email addresses
    pub emails: Option<String>,
}

impl AdminConfig {
    /// Admin emails as a vector
    pub fn emails_list(&self) -> Vec<String> {
        self.emails
            .as_ref()
            .map(|s| {
                s.split(',')
                    .map(|e| e.trim().to_string())
                    .filter(|e| !e.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.emails_list().into_iter().find(|e| !e.contains('@')) {
            Some(bad) => Err(ValidationError::InvalidAdminEmail(bad)),
            None => Ok(()),
        }
    }
}
