//! HMAC-SHA256 verification of the `t=<unix>,v1=<hex>` signature header.
//!
//! The MAC covers `"<t>." ‖ body` over the raw request bytes, so it must be
//! checked before the body is parsed.

use std::time::Duration;

use hmac::{Hmac, Mac};
use sha2::Sha256;

use coursehub_core::error::AppError;

use super::error::WebhookError;

type HmacSha256 = Hmac<Sha256>;

/// Parsed signature header.
#[derive(Debug, PartialEq)]
struct SignatureHeader {
    timestamp: i64,
    signatures: Vec<Vec<u8>>,
}

impl SignatureHeader {
    fn parse(header: &str) -> Option<Self> {
        let mut timestamp = None;
        let mut signatures = Vec::new();

        for part in header.split(',') {
            let (key, value) = part.trim().split_once('=')?;
            match key {
                "t" => timestamp = Some(value.parse::<i64>().ok()?),
                // Undecodable candidates can never match; skip them.
                "v1" => signatures.extend(hex::decode(value)),
                _ => {}
            }
        }

        Some(Self {
            timestamp: timestamp?,
            signatures,
        })
    }
}

/// Verifies webhook signatures with the shared signing secret.
#[derive(Clone)]
pub struct SignatureVerifier {
    mac: HmacSha256,
    tolerance: Option<Duration>,
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("tolerance", &self.tolerance)
            .finish_non_exhaustive()
    }
}

impl SignatureVerifier {
    /// `tolerance` of zero disables the timestamp window.
    pub fn new(secret: &str, tolerance: Duration) -> Result<Self, AppError> {
        Ok(Self {
            mac: keyed_mac(secret)?,
            tolerance: (!tolerance.is_zero()).then_some(tolerance),
        })
    }

    /// Check `header` against `body` at wall-clock second `now`.
    pub fn verify(&self, header: Option<&str>, body: &[u8], now: i64) -> Result<(), WebhookError> {
        let header = header
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or(WebhookError::MissingSignature)?;
        let parsed = SignatureHeader::parse(header).ok_or(WebhookError::InvalidSignature)?;

        let mut mac = self.mac.clone();
        mac.update(parsed.timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(body);

        // `verify_slice` compares in constant time.
        let matched = parsed
            .signatures
            .iter()
            .any(|candidate| mac.clone().verify_slice(candidate).is_ok());
        if !matched {
            return Err(WebhookError::InvalidSignature);
        }

        if let Some(tolerance) = self.tolerance {
            if now.abs_diff(parsed.timestamp) > tolerance.as_secs() {
                return Err(WebhookError::StaleTimestamp);
            }
        }

        Ok(())
    }
}

/// Produce a signature header for `body` at `timestamp`.
pub fn sign(secret: &str, timestamp: i64, body: &[u8]) -> Result<String, AppError> {
    let mut mac = keyed_mac(secret)?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(body);
    Ok(format!(
        "t={timestamp},v1={}",
        hex::encode(mac.finalize().into_bytes())
    ))
}

fn keyed_mac(secret: &str) -> Result<HmacSha256, AppError> {
    HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::configuration(format!("Invalid webhook signing secret: {e}")))
}

mod hex {
    /// Encode bytes as a lowercase hex string.
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Decode a hex string; `None` on odd length or non-hex characters.
    pub fn decode(s: &str) -> Option<Vec<u8>> {
        if s.len() % 2 != 0 {
            return None;
        }
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(s.get(i..i + 2)?, 16).ok())
            .collect()
    }
}
