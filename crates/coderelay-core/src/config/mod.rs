//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files and
//! environment variables via the `config` crate. Each sub-module represents
//! a logical configuration section. Every field carries a serde default, so
//! an empty configuration is a valid one.

pub mod app;
pub mod database;
pub mod logging;
pub mod rate_limit;
pub mod share;
pub mod sweeper;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::database::{DatabaseConfig, StoreConfig};
pub use self::logging::LoggingConfig;
pub use self::rate_limit::RateLimitConfig;
pub use self::share::ShareConfig;
pub use self::sweeper::SweeperConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings (used by the `sqlite` backend).
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Store backend selection.
    #[serde(default)]
    pub store: StoreConfig,
    /// Share limits enforced at the boundary.
    #[serde(default)]
    pub share: ShareConfig,
    /// Per-client rate limiting.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Background expiry sweeper.
    #[serde(default)]
    pub sweeper: SweeperConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files and the environment.
    ///
    /// Merges `config/default.toml`, the `config/{env}.toml` overlay,
    /// environment variables prefixed with `RELAY__`, and finally `PORT`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("RELAY")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(source: &str) -> Result<Self, AppError> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the server cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.rate_limit.burst == 0 {
            return Err(AppError::configuration("rate_limit.burst must be > 0"));
        }
        if self.rate_limit.refill_interval_seconds == 0 {
            return Err(AppError::configuration(
                "rate_limit.refill_interval_seconds must be > 0",
            ));
        }
        if self.sweeper.interval_seconds == 0
            || self.sweeper.interval_seconds > sweeper::MAX_INTERVAL_SECONDS
        {
            return Err(AppError::configuration(format!(
                "sweeper.interval_seconds must be within 1..={}",
                sweeper::MAX_INTERVAL_SECONDS
            )));
        }
        if self.share.max_ttl_minutes == 0
            || self.share.default_ttl_minutes == 0
            || self.share.default_ttl_minutes > self.share.max_ttl_minutes
        {
            return Err(AppError::configuration(format!(
                "share.default_ttl_minutes must be within 1..={}",
                self.share.max_ttl_minutes
            )));
        }
        if !database::STORE_BACKENDS.contains(&self.store.backend.as_str()) {
            return Err(AppError::configuration(format!(
                "Unknown store backend '{}'",
                self.store.backend
            )));
        }
        if !logging::LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(AppError::configuration(format!(
                "Unknown log format '{}'",
                self.logging.format
            )));
        }
        Ok(())
    }
}
