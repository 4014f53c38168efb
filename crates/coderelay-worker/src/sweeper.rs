//! Expiry sweeper: periodically purges expired shares until shut down.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use coderelay_core::result::AppResult;
use coderelay_core::traits::ShareStore;
use coderelay_service::RateLimiterRegistry;

/// Repeating task that deletes expired shares from the store.
#[derive(Debug, Clone)]
pub struct ExpirySweeper {
    /// Store to purge.
    store: Arc<dyn ShareStore>,
    /// Registry whose idle buckets are evicted on each tick.
    limiter: Option<Arc<RateLimiterRegistry>>,
    /// Time between sweeps.
    interval: Duration,
}

impl ExpirySweeper {
    /// Create a sweeper for `store` running every `interval`.
    pub fn new(store: Arc<dyn ShareStore>, interval: Duration) -> Self {
        Self {
            store,
            limiter: None,
            interval,
        }
    }

    /// Also evict idle buckets from `limiter` on each tick.
    pub fn with_limiter(mut self, limiter: Arc<RateLimiterRegistry>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    /// Run one sweep now, returning the number of shares removed.
    pub async fn sweep_once(&self) -> AppResult<u64> {
        self.store.purge_expired().await
    }

    /// Start the sweeper; runs until the cancel signal flips to `true`.
    ///
    /// The first sweep happens one interval after start. Store errors are
    /// logged and the next tick proceeds as usual.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        tracing::info!(
            interval_seconds = self.interval.as_secs(),
            "Expiry sweeper started"
        );

        let Some(first_tick) = Instant::now().checked_add(self.interval) else {
            tracing::warn!(
                interval_seconds = self.interval.as_secs(),
                "Sweep interval out of range, expiry sweeper idle"
            );
            let _ = cancel.wait_for(|stop| *stop).await;
            tracing::info!("Expiry sweeper stopped");
            return;
        };

        let mut ticker = time::interval_at(first_tick, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        tracing::info!("Expiry sweeper received shutdown signal");
                        break;
                    }
                }
                _ = ticker.tick() => self.tick().await,
            }
        }

        tracing::info!("Expiry sweeper stopped");
    }

    /// Spawn [`run`](Self::run) onto the tokio runtime.
    pub fn spawn(self, cancel: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(cancel).await })
    }

    async fn tick(&self) {
        match self.sweep_once().await {
            Ok(0) => tracing::trace!("No expired shares"),
            Ok(removed) => tracing::info!(removed, "Cleaned up expired shares"),
            Err(e) => tracing::error!(error = %e, "Failed to purge expired shares"),
        }

        if let Some(limiter) = &self.limiter {
            let evicted = limiter.evict_idle().await;
            if evicted > 0 {
                tracing::info!(evicted, "Evicted idle rate-limit buckets");
            }
        }
    }
}
