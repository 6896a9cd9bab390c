//! Webhook gateway failure kinds.

use thiserror::Error;

use coursehub_core::AppError;

/// Why an inbound delivery was not processed.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// No signature header was sent.
    #[error("missing webhook signature")]
    MissingSignature,
    /// The header was malformed or no `v1` entry matched.
    #[error("invalid webhook signature")]
    InvalidSignature,
    /// The signed timestamp is outside the tolerance window.
    #[error("webhook timestamp outside tolerance")]
    StaleTimestamp,
    /// The authenticated body is not a valid event envelope.
    #[error("unparseable webhook body: {0}")]
    UnparseableBody(String),
    /// The envelope names an event type outside the handled set.
    #[error("unknown webhook event type: {0}")]
    UnknownEventType(String),
    /// The content store failed or timed out.
    #[error(transparent)]
    Store(#[from] AppError),
}

impl WebhookError {
    /// Authenticity failures, all answered identically.
    pub fn is_signature_failure(&self) -> bool {
        matches!(
            self,
            Self::MissingSignature | Self::InvalidSignature | Self::StaleTimestamp
        )
    }
}

impl From<WebhookError> for AppError {
    fn from(err: WebhookError) -> Self {
        match err {
            WebhookError::MissingSignature
            | WebhookError::InvalidSignature
            | WebhookError::StaleTimestamp => AppError::signature("Invalid webhook signature"),
            WebhookError::UnparseableBody(_) => AppError::validation("Unparseable webhook body"),
            WebhookError::UnknownEventType(kind) => {
                AppError::validation(format!("Unhandled webhook event type: {kind}"))
            }
            WebhookError::Store(e) => e,
        }
    }
}
