//! Injectable wall clock
//!
//! Every timestamp the components emit comes from a [`Clock`], so tests and
//! golden outputs can pin time with [`FixedClock`].

use chrono::{DateTime, Duration, Utc};

/// Source of the current time
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    at: DateTime<Utc>,
}

impl FixedClock {
    /// Create clock pinned to `at`
    #[inline]
    #[must_use]
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { at }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.at
    }
}

/// Shift `at` by a possibly fractional, possibly negative number of minutes
///
/// Millisecond precision. Non-finite offsets leave `at` unchanged.
#[must_use]
pub fn offset_minutes(at: DateTime<Utc>, minutes: f64) -> DateTime<Utc> {
    if !minutes.is_finite() {
        return at;
    }
    #[allow(clippy::cast_possible_truncation)]
    let millis = (minutes * 60_000.0).round() as i64;
    at.checked_add_signed(Duration::milliseconds(millis))
        .unwrap_or(at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fixed_clock_never_moves() {
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let clock = FixedClock::new(at);
        assert_eq!(clock.now(), at);
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn offsets_keep_fractional_minutes() {
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 0, 0).unwrap();
        assert_eq!(offset_minutes(at, 1.5), at + Duration::seconds(90));
        assert_eq!(offset_minutes(at, -2.0), at - Duration::minutes(2));
        assert_eq!(offset_minutes(at, f64::NAN), at);
    }
}
