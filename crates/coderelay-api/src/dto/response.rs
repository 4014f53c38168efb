//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: String,
}

/// Body returned when a code is free.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    /// Whether the code can be claimed.
    pub available: bool,
}

/// Body returned after a share is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareCreatedResponse {
    /// Always `"created"`.
    pub status: String,
    /// When the share stops being retrievable (RFC 3339).
    pub expires_at: DateTime<Utc>,
}

/// Body returned when a share is retrieved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareDataResponse {
    /// The stored payload.
    pub data: String,
}
