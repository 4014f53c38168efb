//! Expiry sweeper configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Longest accepted sweep interval, one day.
pub const MAX_INTERVAL_SECONDS: u64 = 86_400;

/// Background expiry sweeper configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweeperConfig {
    /// Whether the sweeper is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Interval in seconds between purges of expired shares.
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: default_interval(),
        }
    }
}

impl SweeperConfig {
    /// Sweep cadence as a `Duration`.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }
}

fn default_true() -> bool {
    true
}

fn default_interval() -> u64 {
    30
}
