//! Time window state.

use chrono::{DateTime, NaiveTime, TimeDelta, Utc};
use thiserror::Error;

/// Errors that can occur while building a time window.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WindowError {
    #[error("Duration must not be negative (got {minutes} minutes)")]
    NegativeDuration { minutes: i64 },

    #[error("Duration of {minutes} minutes is out of range")]
    OutOfRange { minutes: i64 },
}

/// A start/end pair of UTC instants.
///
/// `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a window of `minutes` length beginning at `start`.
    pub fn starting_at(start: DateTime<Utc>, minutes: i64) -> Result<Self, WindowError> {
        if minutes < 0 {
            return Err(WindowError::NegativeDuration { minutes });
        }

        let end = TimeDelta::try_minutes(minutes)
            .and_then(|duration| start.checked_add_signed(duration))
            .ok_or(WindowError::OutOfRange { minutes })?;

        Ok(Self { start, end })
    }

    /// Zero-width window at the Unix epoch. Contains no instant.
    #[must_use]
    pub fn empty() -> Self {
        let epoch = DateTime::<Utc>::default();
        Self {
            start: epoch,
            end: epoch,
        }
    }

    /// Window covering the whole UTC day of `now`, from 00:00:00 to 23:59:59.999999999.
    #[must_use]
    pub fn full_day(now: DateTime<Utc>) -> Self {
        let start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        let end = start + TimeDelta::days(1) - TimeDelta::nanoseconds(1);
        Self { start, end }
    }

    /// Returns true if `now` lies strictly between start and end.
    #[must_use]
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        self.start < now && now < self.end
    }

    /// Start of the window.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// End of the window.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Length of the window.
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 17, h, m, s).unwrap()
    }

    #[test]
    fn test_empty_contains_nothing() {
        let window = TimeWindow::empty();
        assert!(!window.contains(DateTime::<Utc>::default()));
        assert!(!window.contains(Utc::now()));
        assert_eq!(window.duration(), TimeDelta::zero());
    }

    #[test]
    fn test_contains_is_open_interval() {
        let window = TimeWindow::starting_at(at(10, 0, 0), 60).unwrap();
        assert!(!window.contains(at(10, 0, 0)));
        assert!(window.contains(at(10, 0, 1)));
        assert!(window.contains(at(10, 59, 59)));
        assert!(!window.contains(at(11, 0, 0)));
        assert!(!window.contains(at(9, 0, 0)));
    }

    #[test]
    fn test_starting_at_sets_exact_duration() {
        for minutes in [0, 1, 30, 90, 1440] {
            let window = TimeWindow::starting_at(at(8, 0, 0), minutes).unwrap();
            assert_eq!(window.start(), at(8, 0, 0));
            assert_eq!(window.duration(), TimeDelta::minutes(minutes));
        }
    }

    #[test]
    fn test_starting_at_midpoint_inside() {
        let window = TimeWindow::starting_at(at(8, 0, 0), 60).unwrap();
        assert!(window.contains(at(8, 30, 0)));
    }

    #[test]
    fn test_starting_at_rejects_negative() {
        assert_eq!(
            TimeWindow::starting_at(at(8, 0, 0), -5),
            Err(WindowError::NegativeDuration { minutes: -5 })
        );
    }

    #[test]
    fn test_starting_at_rejects_overflow() {
        assert_eq!(
            TimeWindow::starting_at(at(8, 0, 0), i64::MAX),
            Err(WindowError::OutOfRange { minutes: i64::MAX })
        );
    }

    #[test]
    fn test_full_day_bounds() {
        let window = TimeWindow::full_day(at(15, 42, 7));
        assert_eq!(window.start(), at(0, 0, 0));
        assert_eq!(
            window.end(),
            at(23, 59, 59) + TimeDelta::nanoseconds(999_999_999)
        );
        assert!(window.contains(at(15, 42, 7)));
        assert!(!window.contains(at(0, 0, 0)));
    }
}
