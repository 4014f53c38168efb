//! In-memory share store using dashmap.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;

use coderelay_core::error::{AppError, ErrorKind};
use coderelay_core::result::AppResult;
use coderelay_core::traits::ShareStore;
use coderelay_core::types::{Clock, Share, SystemClock};

/// Share store holding every entry in a [`DashMap`].
///
/// Expired entries stay in the map until [`ShareStore::purge_expired`]
/// removes them, so `exists` keeps reporting their codes as taken.
#[derive(Debug, Clone)]
pub struct MemoryShareStore {
    /// Entries keyed by share code.
    entries: Arc<DashMap<String, Share>>,
    /// Time source for expiry decisions.
    clock: Arc<dyn Clock>,
}

impl MemoryShareStore {
    /// Create an empty store on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty store on the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            clock,
        }
    }

    /// Number of stored entries, live or expired.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MemoryShareStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ShareStore for MemoryShareStore {
    async fn exists(&self, code: &str) -> AppResult<bool> {
        Ok(self.entries.contains_key(code))
    }

    async fn put(&self, code: &str, data: &str, ttl: Duration) -> AppResult<DateTime<Utc>> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Expiry is out of range", e))?;
        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AppError::storage("Expiry is out of range"))?;

        self.entries.insert(
            code.to_string(),
            Share {
                code: code.to_string(),
                data: data.to_string(),
                expires_at,
                created_at: now,
            },
        );

        debug!(code = %code, expires_at = %expires_at, "Share stored");
        Ok(expires_at)
    }

    async fn get(&self, code: &str) -> AppResult<Option<Share>> {
        let now = self.clock.now();
        Ok(self
            .entries
            .get(code)
            .filter(|entry| entry.is_live_at(now))
            .map(|entry| entry.value().clone()))
    }

    async fn purge_expired(&self) -> AppResult<u64> {
        let now = self.clock.now();
        let mut removed = 0u64;

        self.entries.retain(|_, share| {
            let live = share.is_live_at(now);
            if !live {
                removed += 1;
            }
            live
        });

        Ok(removed)
    }
}
