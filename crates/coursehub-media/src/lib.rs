//! # coursehub-media
//!
//! Inbound video-pipeline events and lesson playback readiness.
//!
//! - `webhook`: signature verification, envelope decoding, delivery dedup
//! - `reconciler`: the asset status state machine
//! - `content`: the Content Store seam the reconciler writes through

pub mod content;
pub mod reconciler;
pub mod webhook;

pub use content::{ContentStore, MemoryContentStore};
pub use reconciler::{AssetReconciler, ReconcileOutcome};
pub use webhook::{WebhookAck, WebhookError, WebhookGateway};
