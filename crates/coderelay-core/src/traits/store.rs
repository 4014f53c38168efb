//! Ephemeral share store trait for pluggable storage engines.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::result::AppResult;
use crate::types::share::Share;

/// Trait for ephemeral share backends (SQLite or in-memory).
///
/// Every operation is individually atomic and compares timestamps against
/// the store's own clock. Callers must not hold locks across these calls.
#[async_trait]
pub trait ShareStore: Send + Sync + std::fmt::Debug + 'static {
    /// Whether a row exists under `code`, whether or not it has expired.
    async fn exists(&self, code: &str) -> AppResult<bool>;

    /// Insert or replace the share under `code`, expiring `ttl` from now.
    /// Returns the computed expiry. Last writer wins; never conflicts.
    async fn put(&self, code: &str, data: &str, ttl: Duration) -> AppResult<DateTime<Utc>>;

    /// The share under `code` if it exists and is still live.
    /// Missing and expired codes both yield `None`.
    async fn get(&self, code: &str) -> AppResult<Option<Share>>;

    /// Delete every share with `expires_at <= now`. Returns the number removed.
    async fn purge_expired(&self) -> AppResult<u64>;
}
