//! Cache key builders.
//!
//! Keys carry no deployment prefix; the Redis provider prepends its
//! configured `key_prefix`.

/// Dedup marker for a webhook delivery.
pub fn webhook_event(event_id: &str) -> String {
    format!("webhook:event:{event_id}")
}
