//! Relay service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use coderelay_core::config::ShareConfig;
use coderelay_core::config::share::minutes;
use coderelay_core::error::AppError;
use coderelay_core::result::AppResult;
use coderelay_core::traits::ShareStore;
use coderelay_core::types::Availability;

use crate::limiter::RateLimiterRegistry;

/// Gates, validates, and forwards boundary requests to the share store.
///
/// Callers pass each request through [`admit`](Self::admit) before reading
/// its input; a rejected request never reaches the store.
#[derive(Debug, Clone)]
pub struct RelayService {
    /// Backing share store.
    store: Arc<dyn ShareStore>,
    /// Per-client admission control.
    limiter: Arc<RateLimiterRegistry>,
    /// Input limits.
    config: ShareConfig,
}

impl RelayService {
    /// Creates a new relay service.
    pub fn new(
        store: Arc<dyn ShareStore>,
        limiter: Arc<RateLimiterRegistry>,
        config: ShareConfig,
    ) -> Self {
        Self {
            store,
            limiter,
            config,
        }
    }

    /// The backing store.
    pub fn share_store(&self) -> &Arc<dyn ShareStore> {
        &self.store
    }

    /// Report whether `code` is free to use.
    ///
    /// Expired but unswept shares still count as in use.
    pub async fn check_availability(&self, code: &str) -> AppResult<Availability> {
        self.validate_code(code)?;

        if self.store.exists(code).await? {
            Ok(Availability::InUse)
        } else {
            Ok(Availability::Available)
        }
    }

    /// Store `data` under `code`, replacing any previous share.
    ///
    /// `ttl_minutes` falls back to the configured default. Returns the
    /// expiry instant assigned by the store.
    pub async fn store(
        &self,
        code: &str,
        data: &str,
        ttl_minutes: Option<u32>,
    ) -> AppResult<DateTime<Utc>> {
        if code.is_empty() || data.is_empty() {
            return Err(AppError::validation("Missing code or data"));
        }
        self.validate_code(code)?;
        if data.len() > self.config.max_data_bytes {
            return Err(AppError::validation(format!(
                "Data exceeds {} bytes",
                self.config.max_data_bytes
            )));
        }

        let ttl_minutes = ttl_minutes.unwrap_or(self.config.default_ttl_minutes);
        if ttl_minutes == 0 || ttl_minutes > self.config.max_ttl_minutes {
            return Err(AppError::validation(format!(
                "expires_minutes must be between 1 and {}",
                self.config.max_ttl_minutes
            )));
        }

        let expires_at = self.store.put(code, data, minutes(ttl_minutes)).await?;

        info!(
            code = %code,
            bytes = data.len(),
            expires_at = %expires_at,
            "Share created"
        );
        Ok(expires_at)
    }

    /// Fetch the payload stored under `code` if it has not expired.
    pub async fn retrieve(&self, code: &str) -> AppResult<String> {
        self.validate_code(code)?;

        match self.store.get(code).await? {
            Some(share) => {
                debug!(code = %code, "Share retrieved");
                Ok(share.data)
            }
            None => Err(AppError::not_found("Code not found or expired")),
        }
    }

    /// Spend one token from `client`'s budget, or fail with `RateLimit`.
    pub async fn admit(&self, client: &str) -> AppResult<()> {
        if self.limiter.allow(client).await {
            Ok(())
        } else {
            Err(AppError::rate_limited("Rate limit exceeded"))
        }
    }

    fn validate_code(&self, code: &str) -> AppResult<()> {
        if code.is_empty() {
            return Err(AppError::validation("Missing code"));
        }
        if code.len() > self.config.max_code_length {
            return Err(AppError::validation(format!(
                "Code exceeds {} bytes",
                self.config.max_code_length
            )));
        }
        Ok(())
    }
}
