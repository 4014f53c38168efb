//! Persistent share store.
//!
//! Timestamps are stored as fixed-width UTC text produced by SQLite itself,
//! so every comparison against "now" happens inside the statement on the
//! database clock and sorts correctly as text.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use coderelay_core::error::{AppError, ErrorKind};
use coderelay_core::result::AppResult;
use coderelay_core::traits::ShareStore;
use coderelay_core::types::Share;

/// Current database time in the stored text layout.
const NOW: &str = "strftime('%Y-%m-%d %H:%M:%f', 'now')";

/// Repository for the `shares` table.
#[derive(Debug, Clone)]
pub struct ShareRepository {
    pool: SqlitePool,
}

impl ShareRepository {
    /// Create a new share repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Count every stored row, live or expired.
    pub async fn count(&self) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM shares")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count shares", e))
    }
}

/// SQLite date modifier adding `ttl` with millisecond precision.
fn ttl_modifier(ttl: Duration) -> String {
    format!("+{}.{:03} seconds", ttl.as_secs(), ttl.subsec_millis())
}

#[async_trait]
impl ShareStore for ShareRepository {
    async fn exists(&self, code: &str) -> AppResult<bool> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM shares WHERE code = ?1)")
            .bind(code)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to check share code", e)
            })
    }

    async fn put(&self, code: &str, data: &str, ttl: Duration) -> AppResult<DateTime<Utc>> {
        let sql = format!(
            "INSERT OR REPLACE INTO shares (code, data, expires_at, created_at) \
             VALUES (?1, ?2, strftime('%Y-%m-%d %H:%M:%f', 'now', ?3), {NOW}) \
             RETURNING expires_at"
        );

        let expires_at: DateTime<Utc> = sqlx::query_scalar(&sql)
            .bind(code)
            .bind(data)
            .bind(ttl_modifier(ttl))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to store share", e))?;

        debug!(code = %code, expires_at = %expires_at, "Share stored");
        Ok(expires_at)
    }

    async fn get(&self, code: &str) -> AppResult<Option<Share>> {
        let sql = format!(
            "SELECT code, data, expires_at, created_at FROM shares \
             WHERE code = ?1 AND expires_at > {NOW}"
        );

        sqlx::query_as::<_, Share>(&sql)
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to fetch share", e))
    }

    async fn purge_expired(&self) -> AppResult<u64> {
        let sql = format!("DELETE FROM shares WHERE expires_at <= {NOW}");

        sqlx::query(&sql)
            .execute(&self.pool)
            .await
            .map(|result| result.rows_affected())
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to purge expired shares", e)
            })
    }
}
