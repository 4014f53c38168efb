//! Per-client admission control configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Token-bucket rate limiting configuration.
///
/// Each client identity gets a bucket holding up to `burst` tokens that
/// refills continuously at `refill_tokens` per `refill_interval_seconds`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Whether admission control is enforced.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Maximum tokens a bucket can hold.
    #[serde(default = "default_burst")]
    pub burst: u32,
    /// Tokens added per refill interval.
    #[serde(default = "default_refill_tokens")]
    pub refill_tokens: u32,
    /// Length of the refill interval in seconds.
    #[serde(default = "default_refill_interval")]
    pub refill_interval_seconds: u64,
    /// Drop buckets that have been idle this long. `None` keeps every
    /// bucket for the lifetime of the process.
    #[serde(default)]
    pub idle_ttl_seconds: Option<u64>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            burst: default_burst(),
            refill_tokens: default_refill_tokens(),
            refill_interval_seconds: default_refill_interval(),
            idle_ttl_seconds: None,
        }
    }
}

impl RateLimitConfig {
    /// Refill interval as a `Duration`.
    pub fn refill_interval(&self) -> Duration {
        Duration::from_secs(self.refill_interval_seconds)
    }

    /// Idle eviction threshold, if configured.
    pub fn idle_ttl(&self) -> Option<Duration> {
        self.idle_ttl_seconds.map(Duration::from_secs)
    }
}

fn default_true() -> bool {
    true
}

fn default_burst() -> u32 {
    10
}

fn default_refill_tokens() -> u32 {
    10
}

fn default_refill_interval() -> u64 {
    60
}
