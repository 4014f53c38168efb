//! Registry of per-identity token buckets.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::debug;

use coderelay_core::config::RateLimitConfig;

use super::bucket::{RatePolicy, TokenBucket};

/// Owns one [`TokenBucket`] per client identity.
///
/// Known identities are resolved under the shared lock; the exclusive lock
/// is taken only to insert a bucket for an identity seen for the first
/// time. Each bucket sits behind its own mutex so unrelated clients never
/// contend on the same lock.
#[derive(Debug)]
pub struct RateLimiterRegistry {
    /// Identity → bucket.
    buckets: RwLock<HashMap<String, Arc<Mutex<TokenBucket>>>>,
    /// Refill rate and capacity.
    policy: RatePolicy,
    /// When false every request is admitted.
    enabled: bool,
    /// Buckets idle for this long may be evicted.
    idle_ttl: Option<Duration>,
}

impl RateLimiterRegistry {
    /// Creates a registry from configuration.
    pub fn new(config: &RateLimitConfig) -> Self {
        Self::with_policy(RatePolicy::from(config), config.enabled, config.idle_ttl())
    }

    /// Creates a registry with an explicit policy.
    pub fn with_policy(policy: RatePolicy, enabled: bool, idle_ttl: Option<Duration>) -> Self {
        Self {
            buckets: RwLock::new(HashMap::new()),
            policy,
            enabled,
            idle_ttl,
        }
    }

    /// Admit one request for `identity`, consuming a token when available.
    pub async fn allow(&self, identity: &str) -> bool {
        if !self.enabled {
            return true;
        }

        let bucket = self.bucket_for(identity).await;
        let mut bucket = bucket.lock().await;
        let allowed = bucket.try_acquire(&self.policy, Instant::now());

        if !allowed {
            debug!(identity = %identity, "Rate limit exceeded");
        }
        allowed
    }

    /// Number of tracked identities.
    pub async fn len(&self) -> usize {
        self.buckets.read().await.len()
    }

    /// Whether no identity has been seen yet.
    pub async fn is_empty(&self) -> bool {
        self.buckets.read().await.is_empty()
    }

    /// Idle eviction threshold, if any.
    pub fn idle_ttl(&self) -> Option<Duration> {
        self.idle_ttl
    }

    /// Drop buckets idle for at least the configured TTL.
    ///
    /// Only buckets that would already have refilled to capacity are
    /// dropped, so a returning client never gains tokens from eviction.
    /// Buckets held by an in-flight request are kept. Without an idle TTL
    /// this is a no-op. Returns the number of buckets removed.
    pub async fn evict_idle(&self) -> usize {
        let Some(idle_ttl) = self.idle_ttl else {
            return 0;
        };

        let now = Instant::now();
        let mut buckets = self.buckets.write().await;
        let before = buckets.len();

        buckets.retain(|_, bucket| {
            if Arc::strong_count(bucket) > 1 {
                return true;
            }
            match bucket.try_lock() {
                Ok(state) => {
                    state.idle_for(now) < idle_ttl || !state.is_full_at(&self.policy, now)
                }
                Err(_) => true,
            }
        });

        before - buckets.len()
    }

    async fn bucket_for(&self, identity: &str) -> Arc<Mutex<TokenBucket>> {
        {
            let buckets = self.buckets.read().await;
            if let Some(bucket) = buckets.get(identity) {
                return Arc::clone(bucket);
            }
        }

        let mut buckets = self.buckets.write().await;
        let bucket = buckets.entry(identity.to_string()).or_insert_with(|| {
            Arc::new(Mutex::new(TokenBucket::full(&self.policy, Instant::now())))
        });
        Arc::clone(bucket)
    }
}
