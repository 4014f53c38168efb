//! Share boundary limits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Limits applied to incoming shares before they reach the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// TTL applied when the client does not ask for one.
    #[serde(default = "default_ttl")]
    pub default_ttl_minutes: u32,
    /// Largest TTL a client may request.
    #[serde(default = "default_max_ttl")]
    pub max_ttl_minutes: u32,
    /// Maximum code length in bytes.
    #[serde(default = "default_max_code_length")]
    pub max_code_length: usize,
    /// Maximum payload size in bytes.
    #[serde(default = "default_max_data_bytes")]
    pub max_data_bytes: usize,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            default_ttl_minutes: default_ttl(),
            max_ttl_minutes: default_max_ttl(),
            max_code_length: default_max_code_length(),
            max_data_bytes: default_max_data_bytes(),
        }
    }
}

/// Convert whole minutes into a `Duration`.
pub fn minutes(value: u32) -> Duration {
    Duration::from_secs(u64::from(value) * 60)
}

fn default_ttl() -> u32 {
    10
}

fn default_max_ttl() -> u32 {
    60
}

fn default_max_code_length() -> usize {
    64
}

fn default_max_data_bytes() -> usize {
    1024 * 1024
}
