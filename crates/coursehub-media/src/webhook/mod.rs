//! Webhook Gateway: authenticates, decodes and deduplicates pipeline events.

pub mod envelope;
pub mod error;
pub mod gateway;
pub mod signature;

pub use error::WebhookError;
pub use gateway::{WebhookAck, WebhookGateway};
pub use signature::SignatureVerifier;
