//! Request DTOs.

use serde::{Deserialize, Serialize};

/// Body of `POST /share`.
///
/// Missing `code` or `data` deserialize as empty strings so the relay
/// service can reject them with its own message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShareRequest {
    /// Client-chosen share code.
    #[serde(default)]
    pub code: String,
    /// Opaque payload.
    #[serde(default)]
    pub data: String,
    /// Lifetime in minutes; the configured default applies when absent.
    #[serde(default)]
    pub expires_minutes: Option<u32>,
}
