//! Token bucket state for a single client identity.

use std::time::Duration;

use tokio::time::Instant;

use coderelay_core::config::RateLimitConfig;

/// Refill rate and capacity shared by every bucket in a registry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatePolicy {
    /// Maximum tokens a bucket holds.
    pub capacity: f64,
    /// Tokens added per `interval`.
    pub refill_tokens: f64,
    /// Refill period.
    pub interval: Duration,
}

impl RatePolicy {
    /// Tokens accrued over `elapsed`.
    fn accrued(&self, elapsed: Duration) -> f64 {
        elapsed.as_secs_f64() * self.refill_tokens / self.interval.as_secs_f64()
    }
}

impl From<&RateLimitConfig> for RatePolicy {
    fn from(config: &RateLimitConfig) -> Self {
        Self {
            capacity: f64::from(config.burst),
            refill_tokens: f64::from(config.refill_tokens),
            interval: config.refill_interval(),
        }
    }
}

/// Fractional token count with continuous refill.
#[derive(Debug, Clone)]
pub struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
    last_seen: Instant,
}

impl TokenBucket {
    /// A bucket at full capacity.
    pub fn full(policy: &RatePolicy, now: Instant) -> Self {
        Self {
            tokens: policy.capacity,
            last_refill: now,
            last_seen: now,
        }
    }

    /// Refill up to `now`, then consume one token if available.
    pub fn try_acquire(&mut self, policy: &RatePolicy, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.last_refill);
        self.tokens = (self.tokens + policy.accrued(elapsed)).min(policy.capacity);
        self.last_refill = now;
        self.last_seen = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Whether refilling up to `now` would bring the bucket to capacity.
    pub fn is_full_at(&self, policy: &RatePolicy, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.last_refill);
        self.tokens + policy.accrued(elapsed) >= policy.capacity
    }

    /// Time since the last request against this bucket.
    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_seen)
    }

    /// Tokens currently held, without refilling.
    pub fn tokens(&self) -> f64 {
        self.tokens
    }
}
