//! Email allowlist admin policy.

use std::collections::HashSet;

use crate::ports::AdminPolicy;

/// Grants admin rights to a fixed set of email addresses.
///
/// Comparison ignores case and surrounding whitespace.
#[derive(Debug, Clone, Default)]
pub struct AllowlistAdminPolicy {
    emails: HashSet<String>,
}

impl AllowlistAdminPolicy {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let emails = emails
            .into_iter()
            .map(|e| normalize(e.as_ref()))
            .filter(|e| !e.is_empty())
            .collect();
        Self { emails }
    }

    /// Parses a comma-separated list such as `a@x.com, b@y.com`.
    pub fn from_csv(csv: &str) -> Self {
        Self::new(csv.split(','))
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

impl AdminPolicy for AllowlistAdminPolicy {
    fn is_admin(&self, email: &str) -> bool {
        self.emails.contains(&normalize(email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_case_insensitively() {
        let policy = AllowlistAdminPolicy::from_csv("Ops@FinCoach.app");
        assert!(policy.is_admin("ops@fincoach.app"));
        assert!(policy.is_admin("  OPS@fincoach.app "));
    }

    #[test]
    fn rejects_unknown_email() {
        let policy = AllowlistAdminPolicy::from_csv("ops@fincoach.app");
        assert!(!policy.is_admin("user@fincoach.app"));
    }

    #[test]
    fn csv_skips_blank_entries() {
        let policy = AllowlistAdminPolicy::from_csv("a@x.com,, ,b@y.com,");
        assert_eq!(policy.len(), 2);
    }

    #[test]
    fn empty_allowlist_admits_nobody() {
        let policy = AllowlistAdminPolicy::default();
        assert!(policy.is_empty());
        assert!(!policy.is_admin(""));
    }
}
