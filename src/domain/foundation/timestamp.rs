//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, Months, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    ///
    /// Domain code takes time from a `Clock` port; this is for adapters.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Parses an RFC 3339 string such as `2025-10-24T10:00:00Z`.
    pub fn parse_rfc3339(s: &str) -> Result<Self, chrono::ParseError> {
        Ok(Self(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc)))
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the duration from another timestamp to this one.
    ///
    /// Returns negative duration if other is after self.
    pub fn duration_since(&self, other: &Timestamp) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    /// Whole 24-hour periods elapsed since `other`, truncated toward zero.
    ///
    /// 10 days and 23 hours counts as 10.
    pub fn whole_days_since(&self, other: &Timestamp) -> i64 {
        self.duration_since(other).num_days()
    }

    /// Creates a new timestamp by adding the specified number of days.
    ///
    /// Negative values subtract days. Saturates at the representable range.
    pub fn add_days(&self, days: i64) -> Self {
        let shifted = Duration::try_days(days).and_then(|d| self.0.checked_add_signed(d));
        Self(shifted.unwrap_or(if days < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        }))
    }

    /// Creates a new timestamp on the same calendar date `months` later.
    ///
    /// Days past the end of the target month clamp to its last day
    /// (Jan 31 + 1 month = Feb 28/29). Saturates at the maximum
    /// representable date.
    pub fn add_calendar_months(&self, months: u32) -> Self {
        Self(
            self.0
                .checked_add_months(Months::new(months))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        )
    }

    /// Creates a timestamp from Unix milliseconds.
    ///
    /// Out-of-range values clamp to the Unix epoch.
    pub fn from_unix_millis(millis: i64) -> Self {
        Self(
            Utc.timestamp_millis_opt(millis)
                .single()
                .unwrap_or_default(),
        )
    }

    /// Returns the timestamp as Unix milliseconds.
    pub fn as_unix_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Returns the calendar date as `YYYY-MM-DD`.
    pub fn format_date(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse_rfc3339(s).unwrap()
    }

    #[test]
    fn timestamp_now_creates_current_time() {
        let before = Utc::now();
        let ts = Timestamp::now();
        let after = Utc::now();

        assert!(ts.as_datetime() >= &before);
        assert!(ts.as_datetime() <= &after);
    }

    #[test]
    fn timestamp_serializes_to_rfc3339_json() {
        let json = serde_json::to_string(&ts("2025-11-24T10:00:00Z")).unwrap();
        assert_eq!(json, "\"2025-11-24T10:00:00Z\"");
    }

    #[test]
    fn timestamp_deserializes_from_json() {
        let parsed: Timestamp = serde_json::from_str("\"2024-01-15T10:30:00Z\"").unwrap();
        assert_eq!(parsed.as_datetime().year(), 2024);
        assert_eq!(parsed.as_datetime().hour(), 10);
    }

    #[test]
    fn whole_days_truncates_partial_days() {
        let start = ts("2025-01-01T00:00:00Z");
        let later = ts("2025-01-11T23:59:59Z");
        assert_eq!(later.whole_days_since(&start), 10);
    }

    #[test]
    fn whole_days_is_negative_for_earlier_timestamps() {
        let start = ts("2025-01-11T00:00:00Z");
        let earlier = ts("2025-01-01T00:00:00Z");
        assert_eq!(earlier.whole_days_since(&start), -10);
    }

    #[test]
    fn add_days_saturates_near_the_maximum_date() {
        let far = Timestamp::from_datetime(DateTime::<Utc>::MAX_UTC).add_days(-3);
        assert_eq!(far.add_days(7), Timestamp::from_datetime(DateTime::<Utc>::MAX_UTC));
        assert_eq!(
            Timestamp::from_datetime(DateTime::<Utc>::MIN_UTC).add_days(-1),
            Timestamp::from_datetime(DateTime::<Utc>::MIN_UTC)
        );
    }

    #[test]
    fn add_days_crosses_month_boundary() {
        assert_eq!(ts("2025-10-29T15:30:00Z").add_days(7), ts("2025-11-05T15:30:00Z"));
    }

    #[test]
    fn add_calendar_months_keeps_day_of_month() {
        let start = ts("2025-10-24T10:00:00Z");
        assert_eq!(start.add_calendar_months(1), ts("2025-11-24T10:00:00Z"));
    }

    #[test]
    fn add_calendar_months_clamps_to_month_end() {
        let start = ts("2025-01-31T08:00:00Z");
        assert_eq!(start.add_calendar_months(1), ts("2025-02-28T08:00:00Z"));

        let leap = ts("2024-01-31T08:00:00Z");
        assert_eq!(leap.add_calendar_months(1), ts("2024-02-29T08:00:00Z"));
    }

    #[test]
    fn add_calendar_months_crosses_year_boundary() {
        let start = ts("2025-12-15T00:00:00Z");
        let next = start.add_calendar_months(1);
        assert_eq!(next.as_datetime().year(), 2026);
        assert_eq!(next.as_datetime().month(), 1);
        assert_eq!(next.as_datetime().day(), 15);
    }

    #[test]
    fn unix_millis_roundtrips() {
        let original = ts("2025-10-24T10:00:00.123Z");
        let back = Timestamp::from_unix_millis(original.as_unix_millis());
        assert_eq!(back, original);
    }

    #[test]
    fn format_date_is_iso_calendar_date() {
        assert_eq!(ts("2025-11-24T10:00:00Z").format_date(), "2025-11-24");
    }
}
