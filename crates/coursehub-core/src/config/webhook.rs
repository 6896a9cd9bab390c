//! Inbound webhook configuration.

use serde::{Deserialize, Serialize};

/// Settings for the video-pipeline webhook receiver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Shared secret used to verify the HMAC signature header.
    pub signing_secret: String,
    /// How long a delivered event id is remembered for deduplication.
    #[serde(default = "default_dedup_window")]
    pub dedup_window_seconds: u64,
    /// Maximum allowed clock distance of the signed timestamp. `0` disables the check.
    #[serde(default = "default_tolerance")]
    pub timestamp_tolerance_seconds: u64,
    /// Deadline for a single content store call, in milliseconds.
    #[serde(default = "default_store_timeout")]
    pub store_timeout_ms: u64,
}

fn default_dedup_window() -> u64 {
    600
}

fn default_tolerance() -> u64 {
    300
}

fn default_store_timeout() -> u64 {
    2000
}
