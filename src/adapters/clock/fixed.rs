//! Clock frozen at a chosen instant.

use std::sync::{Arc, Mutex};

use crate::domain::foundation::Timestamp;
use crate::ports::Clock;

/// Clock that returns a fixed instant until moved.
///
/// Clones share the same instant, so a test can hold one handle and advance
/// time under a handler that owns another.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<Mutex<Timestamp>>,
}

impl FixedClock {
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    /// Moves the clock to `now`.
    pub fn set(&self, now: Timestamp) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = now;
        }
    }

    /// Moves the clock forward by whole days.
    pub fn advance_days(&self, days: i64) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = guard.add_days(days);
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        match self.now.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_instant() {
        let start = Timestamp::parse_rfc3339("2025-10-01T00:00:00Z").unwrap();
        let clock = FixedClock::new(start);
        let handle = clock.clone();

        handle.advance_days(3);

        assert_eq!(clock.now(), start.add_days(3));
    }

    #[test]
    fn set_replaces_the_instant() {
        let clock = FixedClock::new(Timestamp::parse_rfc3339("2025-10-01T00:00:00Z").unwrap());
        let later = Timestamp::parse_rfc3339("2026-01-01T12:00:00Z").unwrap();

        clock.set(later);

        assert_eq!(clock.now(), later);
    }
}
