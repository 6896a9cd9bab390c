//! Lesson asset status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Playback readiness of a lesson's video asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "asset_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AssetStatus {
    /// Upload URL handed out, nothing heard from the pipeline yet.
    Pending,
    /// The pipeline created an asset for the upload.
    Created,
    /// The asset is playable.
    Ready,
    /// The pipeline failed to process the upload or asset.
    Errored,
    /// The upload was cancelled before an asset became ready.
    Cancelled,
}

impl AssetStatus {
    /// Terminal statuses are never left once reached.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ready | Self::Errored | Self::Cancelled)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Created => "created",
            Self::Ready => "ready",
            Self::Errored => "errored",
            Self::Cancelled => "cancelled",
        }
    }
}

impl Default for AssetStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AssetStatus {
    type Err = coursehub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "created" => Ok(Self::Created),
            "ready" => Ok(Self::Ready),
            "errored" => Ok(Self::Errored),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(coursehub_core::AppError::validation(format!(
                "Invalid asset status: '{s}'"
            ))),
        }
    }
}
