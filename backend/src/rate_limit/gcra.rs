use crate::rate_limit::{RateDecision, RateLimiter};
use governor::clock::{Clock, DefaultClock};
use governor::{DefaultKeyedRateLimiter, Quota};
use std::num::NonZeroU32;
use std::time::Duration;

/// Keyed GCRA limiter: `requests` may burst at once, then one request is
/// replenished every `window / requests`.
pub struct GovernorLimiter {
    limiter: DefaultKeyedRateLimiter<String>,
    clock: DefaultClock,
}

impl GovernorLimiter {
    pub fn new(requests: u32, window: Duration) -> Self {
        let burst = NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(window / burst.get())
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst);
        Self {
            limiter: DefaultKeyedRateLimiter::keyed(quota),
            clock: DefaultClock::default(),
        }
    }
}

impl RateLimiter for GovernorLimiter {
    fn check(&self, key: &str) -> RateDecision {
        match self.limiter.check_key(&key.to_string()) {
            Ok(()) => RateDecision::Allowed,
            Err(not_until) => RateDecision::Limited {
                retry_after: not_until.wait_time_from(self.clock.now()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_then_limited_per_key() {
        let limiter = GovernorLimiter::new(2, Duration::from_secs(60));
        assert_eq!(limiter.check("a"), RateDecision::Allowed);
        assert_eq!(limiter.check("a"), RateDecision::Allowed);
        match limiter.check("a") {
            RateDecision::Limited { retry_after } => {
                assert!(retry_after > Duration::ZERO);
                assert!(retry_after <= Duration::from_secs(30));
            }
            other => panic!("expected a limit, got {:?}", other),
        }
        assert_eq!(limiter.check("b"), RateDecision::Allowed);
    }

    #[test]
    fn zero_budget_still_allows_one() {
        let limiter = GovernorLimiter::new(0, Duration::from_secs(60));
        assert_eq!(limiter.check("a"), RateDecision::Allowed);
        assert!(matches!(limiter.check("a"), RateDecision::Limited { .. }));
    }
}
