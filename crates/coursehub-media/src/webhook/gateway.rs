//! Authenticate, decode, deduplicate, then hand events to the reconciler.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use coursehub_cache::keys;
use coursehub_core::config::WebhookConfig;
use coursehub_core::result::AppResult;
use coursehub_core::traits::cache::CacheProvider;
use coursehub_entity::webhook::WebhookEvent;

use super::envelope;
use super::error::WebhookError;
use super::signature::SignatureVerifier;
use crate::reconciler::{AssetReconciler, ReconcileOutcome};

/// How an authenticated delivery was acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookAck {
    /// Reconciled; the lesson may or may not have changed.
    Accepted,
    /// The event id was already processed within the dedup window.
    Duplicate,
    /// Event type outside the handled set.
    Ignored,
    /// No lesson matches; the sender should not retry.
    Unroutable,
}

/// Entry point for inbound pipeline deliveries.
#[derive(Debug, Clone)]
pub struct WebhookGateway {
    verifier: SignatureVerifier,
    cache: Arc<dyn CacheProvider>,
    reconciler: Arc<AssetReconciler>,
    dedup_window: Duration,
}

impl WebhookGateway {
    /// Creates a gateway. `cache` holds the dedup window.
    pub fn new(
        config: &WebhookConfig,
        cache: Arc<dyn CacheProvider>,
        reconciler: Arc<AssetReconciler>,
    ) -> AppResult<Self> {
        Ok(Self {
            verifier: SignatureVerifier::new(
                &config.signing_secret,
                Duration::from_secs(config.timestamp_tolerance_seconds),
            )?,
            cache,
            reconciler,
            dedup_window: Duration::from_secs(config.dedup_window_seconds),
        })
    }

    /// Verify the signature over the raw bytes, then decode.
    pub fn receive(&self, body: &[u8], signature: Option<&str>) -> Result<WebhookEvent, WebhookError> {
        self.verifier
            .verify(signature, body, Utc::now().timestamp())?;
        envelope::decode(body)
    }

    /// Process one delivery end to end.
    ///
    /// Nothing is read or written before the signature checks out. If the
    /// reconciler fails after the event id was recorded, the record is
    /// dropped again so the sender's retry is processed.
    pub async fn process(
        &self,
        body: &[u8],
        signature: Option<&str>,
    ) -> Result<WebhookAck, WebhookError> {
        let event = match self.receive(body, signature) {
            Ok(event) => event,
            Err(WebhookError::UnknownEventType(kind)) => {
                info!(kind = %kind, "Acknowledging unhandled webhook event type");
                return Ok(WebhookAck::Ignored);
            }
            Err(e) if e.is_signature_failure() => {
                warn!(
                    target: "coursehub::audit",
                    reason = %e,
                    body_len = body.len(),
                    "Rejected webhook delivery"
                );
                return Err(e);
            }
            Err(e) => {
                warn!(error = %e, "Rejected webhook body");
                return Err(e);
            }
        };

        if !self.claim(&event).await {
            debug!(event_id = %event.event_id, "Duplicate webhook delivery");
            return Ok(WebhookAck::Duplicate);
        }

        match self.reconciler.reconcile(&event).await {
            Ok(ReconcileOutcome::Unroutable) => Ok(WebhookAck::Unroutable),
            Ok(_) => Ok(WebhookAck::Accepted),
            Err(e) => {
                warn!(
                    event_id = %event.event_id,
                    error = %e,
                    "Reconcile failed, releasing dedup record"
                );
                self.release(&event.event_id).await;
                Err(WebhookError::Store(e))
            }
        }
    }

    /// Record the event id. `false` if it was already recorded.
    ///
    /// The dedup cache is advisory: when it is unreachable the event is
    /// processed anyway and the reconciler's conditional writes keep the
    /// outcome idempotent.
    async fn claim(&self, event: &WebhookEvent) -> bool {
        let key = keys::webhook_event(&event.event_id);
        match self
            .cache
            .set_nx(&key, event.kind.as_wire(), self.dedup_window)
            .await
        {
            Ok(fresh) => fresh,
            Err(e) => {
                warn!(event_id = %event.event_id, error = %e, "Dedup cache unavailable");
                true
            }
        }
    }

    async fn release(&self, event_id: &str) {
        if let Err(e) = self.cache.delete(&keys::webhook_event(event_id)).await {
            warn!(event_id, error = %e, "Failed to release dedup record");
        }
    }
}
