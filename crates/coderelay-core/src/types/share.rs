//! The stored unit of the relay.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One opaque blob stored under a client-chosen code.
///
/// A share is live while `now < expires_at`. Expiry is fixed at creation
/// and never extended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Share {
    /// Client-chosen lookup key.
    pub code: String,
    /// Opaque payload, returned verbatim.
    pub data: String,
    /// Instant after which the share is no longer readable.
    pub expires_at: DateTime<Utc>,
    /// When this version of the share was written.
    pub created_at: DateTime<Utc>,
}

impl Share {
    /// Whether the share is live at `now`.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Result of checking whether a code can be claimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    /// No row exists under the code.
    Available,
    /// A row exists under the code, live or not yet swept.
    InUse,
}
