//! Admin policy port - Who may run support operations.

/// Port deciding whether an email belongs to an administrator.
///
/// Injected into handlers instead of reading an allowlist from the
/// environment at the call site.
pub trait AdminPolicy: Send + Sync {
    fn is_admin(&self, email: &str) -> bool;
}
