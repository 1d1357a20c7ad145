//! Login attempt throttling
//!
//! Keyed per client IP plus one global bucket, both counted per minute.
//! Protects the password endpoints from brute force; other endpoints are
//! not throttled.

use governor::{
    clock::{Clock, DefaultClock},
    DefaultDirectRateLimiter, DefaultKeyedRateLimiter, Quota, RateLimiter,
};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_PER_IP_PER_MINUTE: u32 = 10;
const DEFAULT_GLOBAL_PER_MINUTE: u32 = 600;

/// Keyed state entries kept before idle IPs are pruned
const PRUNE_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimited {
    pub retry_after: Duration,
}

#[derive(Clone)]
pub struct LoginRateLimiter {
    global: Arc<DefaultDirectRateLimiter>,
    per_ip: Arc<DefaultKeyedRateLimiter<String>>,
}

impl LoginRateLimiter {
    pub fn new() -> Self {
        Self::with_rates(DEFAULT_GLOBAL_PER_MINUTE, DEFAULT_PER_IP_PER_MINUTE)
    }

    /// Zero rates are raised to one attempt per minute
    pub fn with_rates(global_per_minute: u32, per_ip_per_minute: u32) -> Self {
        let quota = |rate: u32| Quota::per_minute(NonZeroU32::new(rate).unwrap_or(NonZeroU32::MIN));

        Self {
            global: Arc::new(RateLimiter::direct(quota(global_per_minute))),
            per_ip: Arc::new(RateLimiter::keyed(quota(per_ip_per_minute))),
        }
    }

    /// Record an attempt from `ip`
    ///
    /// The per-IP bucket is checked first, so a client that is already
    /// throttled does not draw down the shared global quota.
    pub fn check(&self, ip: &str) -> Result<(), RateLimited> {
        let clock = DefaultClock::default();

        if self.per_ip.len() > PRUNE_THRESHOLD {
            self.per_ip.retain_recent();
        }

        if let Err(not_until) = self.per_ip.check_key(&ip.to_string()) {
            tracing::warn!(ip = %ip, "Per-IP login rate limit exceeded");
            return Err(RateLimited {
                retry_after: not_until.wait_time_from(clock.now()),
            });
        }

        if let Err(not_until) = self.global.check() {
            tracing::warn!(ip = %ip, "Global login rate limit exceeded");
            return Err(RateLimited {
                retry_after: not_until.wait_time_from(clock.now()),
            });
        }

        Ok(())
    }
}

impl Default for LoginRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_ip_limit() {
        let limiter = LoginRateLimiter::with_rates(1000, 2);
        assert!(limiter.check("192.0.2.1").is_ok());
        assert!(limiter.check("192.0.2.1").is_ok());

        let err = limiter.check("192.0.2.1").unwrap_err();
        assert!(err.retry_after > Duration::ZERO);

        assert!(limiter.check("192.0.2.2").is_ok());
    }

    #[test]
    fn test_global_limit() {
        let limiter = LoginRateLimiter::with_rates(2, 100);
        assert!(limiter.check("192.0.2.1").is_ok());
        assert!(limiter.check("192.0.2.2").is_ok());
        assert!(limiter.check("192.0.2.3").is_err());
    }

    #[test]
    fn test_throttled_ip_does_not_drain_global_quota() {
        let limiter = LoginRateLimiter::with_rates(3, 1);
        assert!(limiter.check("198.51.100.9").is_ok());
        for _ in 0..20 {
            assert!(limiter.check("198.51.100.9").is_err());
        }

        assert!(limiter.check("192.0.2.1").is_ok());
        assert!(limiter.check("192.0.2.2").is_ok());
        assert!(limiter.check("192.0.2.3").is_err());
    }

    #[test]
    fn test_clones_share_state() {
        let a = LoginRateLimiter::with_rates(1000, 1);
        let b = a.clone();
        assert!(a.check("192.0.2.1").is_ok());
        assert!(b.check("192.0.2.1").is_err());
    }

    #[test]
    fn test_zero_rate_is_clamped() {
        let limiter = LoginRateLimiter::with_rates(0, 0);
        assert!(limiter.check("192.0.2.1").is_ok());
        assert!(limiter.check("192.0.2.1").is_err());
    }
}
