//! Rate limiter for automatic replies.
//!
//! Wraps a `governor` direct limiter. The quota is a burst of `burst` cells
//! with one cell replenished every `1 / refill_per_sec` seconds.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::clock::{Clock, DefaultClock};
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::Quota;
use thiserror::Error;

type DirectLimiter<C> =
    governor::RateLimiter<NotKeyed, InMemoryState, C, NoOpMiddleware<<C as Clock>::Instant>>;

/// Errors raised when the limiter parameters cannot form a quota.
#[derive(Debug, Error, PartialEq)]
pub enum RateLimitError {
    #[error("Burst size must be at least 1")]
    ZeroBurst,

    #[error("Refill rate must be a positive number of tokens per second (got {0})")]
    InvalidRefill(f64),
}

/// Burst-and-refill limiter shared by all reply attempts.
pub struct RateLimiter<C: Clock = DefaultClock> {
    limiter: DirectLimiter<C>,
    clock: C,
    burst: NonZeroU32,
    period: Duration,
}

impl RateLimiter {
    /// Creates a limiter on the system clock. The full burst is available at once.
    pub fn new(burst: u32, refill_per_sec: f64) -> Result<Self, RateLimitError> {
        Self::with_clock(burst, refill_per_sec, DefaultClock::default())
    }
}

impl<C: Clock + Clone> RateLimiter<C> {
    /// Creates a limiter driven by `clock`.
    pub fn with_clock(burst: u32, refill_per_sec: f64, clock: C) -> Result<Self, RateLimitError> {
        let burst = NonZeroU32::new(burst).ok_or(RateLimitError::ZeroBurst)?;
        let period = replenish_period(refill_per_sec)?;
        let quota = Quota::with_period(period)
            .ok_or(RateLimitError::InvalidRefill(refill_per_sec))?
            .allow_burst(burst);

        Ok(Self {
            limiter: governor::RateLimiter::direct_with_clock(quota, clock.clone()),
            clock,
            burst,
            period,
        })
    }

    /// Takes one cell, or returns how long until the next one frees up.
    pub fn check(&self) -> Result<(), Duration> {
        self.limiter
            .check()
            .map_err(|not_until| not_until.wait_time_from(self.clock.now()))
    }

    /// Takes one cell if one is available.
    pub fn allow(&self) -> bool {
        self.check().is_ok()
    }
}

impl<C: Clock> std::fmt::Debug for RateLimiter<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("burst", &self.burst)
            .field("period", &self.period)
            .finish_non_exhaustive()
    }
}

fn replenish_period(refill_per_sec: f64) -> Result<Duration, RateLimitError> {
    if !refill_per_sec.is_finite() || refill_per_sec <= 0.0 {
        return Err(RateLimitError::InvalidRefill(refill_per_sec));
    }
    Duration::try_from_secs_f64(1.0 / refill_per_sec)
        .ok()
        .filter(|period| !period.is_zero())
        .ok_or(RateLimitError::InvalidRefill(refill_per_sec))
}

#[cfg(test)]
mod tests {
    use governor::clock::FakeRelativeClock;

    use super::*;

    fn drained(burst: u32, refill_per_sec: f64) -> (RateLimiter<FakeRelativeClock>, FakeRelativeClock) {
        let clock = FakeRelativeClock::default();
        let limiter = RateLimiter::with_clock(burst, refill_per_sec, clock.clone()).unwrap();
        for _ in 0..burst {
            assert!(limiter.allow());
        }
        (limiter, clock)
    }

    #[test]
    fn test_burst_then_deny() {
        let (limiter, _clock) = drained(5, 0.0005);
        assert!(!limiter.allow());
    }

    #[test]
    fn test_refills_one_token() {
        let (limiter, clock) = drained(2, 0.5);
        assert!(!limiter.allow());

        clock.advance(Duration::from_secs(2));
        assert!(limiter.allow());
        assert!(!limiter.allow());
    }

    #[test]
    fn test_polled_every_second_grants_at_refill_interval() {
        let (limiter, clock) = drained(5, 0.0005);

        let mut granted_at = None;
        for second in 1..=2100_u64 {
            clock.advance(Duration::from_secs(1));
            if limiter.allow() {
                granted_at = Some(second);
                break;
            }
        }
        assert_eq!(granted_at, Some(2000));
        assert!(!limiter.allow());
    }

    #[test]
    fn test_check_reports_wait() {
        let (limiter, clock) = drained(1, 0.001);

        let wait = limiter.check().unwrap_err();
        assert!(wait > Duration::from_secs(999));
        assert!(wait <= Duration::from_secs(1000));

        clock.advance(Duration::from_secs(400));
        let wait = limiter.check().unwrap_err();
        assert!(wait <= Duration::from_secs(600));
    }

    #[test]
    fn test_tokens_capped_at_burst() {
        let (limiter, clock) = drained(3, 1.0);

        clock.advance(Duration::from_secs(3600));
        for _ in 0..3 {
            assert!(limiter.allow());
        }
        assert!(!limiter.allow());
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert_eq!(
            RateLimiter::new(0, 1.0).unwrap_err(),
            RateLimitError::ZeroBurst
        );
        assert!(matches!(
            RateLimiter::new(5, 0.0),
            Err(RateLimitError::InvalidRefill(_))
        ));
        assert!(matches!(
            RateLimiter::new(5, f64::NAN),
            Err(RateLimitError::InvalidRefill(_))
        ));
    }
}
