//! Clock port - Source of the current time.
//!
//! Handlers never call `Timestamp::now()` directly so that window resets and
//! the learning period can be tested at exact instants.

use crate::domain::foundation::Timestamp;

/// Port for reading the current time.
pub trait Clock: Send + Sync {
    /// Returns the current instant (UTC).
    fn now(&self) -> Timestamp;
}
