//! Inbound video-pipeline webhook entities.

pub mod event;

pub use event::{WebhookEvent, WebhookEventKind};
