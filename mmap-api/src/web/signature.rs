//! Webhook signature verification.
//!
//! Senders sign the exact request body with HMAC-SHA256 and put the hex
//! digest in a header, optionally prefixed with `sha256=` (GitHub style).

use axum::http::HeaderMap;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Signature headers in priority order; the first one present is used.
pub const SIGNATURE_HEADERS: [&str; 3] =
    ["x-lovable-signature", "x-hub-signature-256", "x-hub-signature"];

const SCHEME_PREFIX: &str = "sha256=";

/// Verify a webhook signature over the raw request body.
///
/// # Arguments
///
/// * `payload` - The exact bytes received on the wire
/// * `signature` - The signature header value, hex with optional `sha256=` prefix
/// * `secret` - The shared webhook secret
///
/// # Returns
///
/// `true` only if both secret and signature are present and non-empty and the
/// signature equals HMAC-SHA256(secret, payload). Every other outcome,
/// including malformed hex, is `false`.
pub fn verify_signature(payload: &[u8], signature: Option<&str>, secret: Option<&str>) -> bool {
    let secret = secret.unwrap_or_default();
    let signature = signature.map(str::trim).unwrap_or_default();

    if secret.is_empty() || signature.is_empty() {
        warn!(
            has_secret = !secret.is_empty(),
            has_signature = !signature.is_empty(),
            "webhook_signature_missing_fields"
        );
        return false;
    }

    let supplied = match hex::decode(strip_scheme(signature)) {
        Ok(bytes) => bytes,
        Err(_) => {
            warn!(signature_length = signature.len(), "webhook_signature_not_hex");
            return false;
        }
    };

    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            warn!("webhook_signature_invalid_key");
            return false;
        }
    };
    mac.update(payload);
    let expected = mac.finalize().into_bytes();

    // Length mismatch short-circuits inside ct_eq; equal lengths compare in constant time.
    let valid: bool = expected.as_slice().ct_eq(supplied.as_slice()).into();

    if !valid {
        warn!(
            expected_length = expected.len(),
            actual_length = supplied.len(),
            "webhook_signature_mismatch"
        );
    }

    valid
}

/// Compute the lowercase hex HMAC-SHA256 of `payload` under `secret`.
pub fn sign_payload(secret: &str, payload: &[u8]) -> String {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(secret.as_bytes())
        .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"));
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Pick the signature value from the first present signature header.
pub fn select_signature_header(headers: &HeaderMap) -> Option<&str> {
    SIGNATURE_HEADERS
        .iter()
        .find_map(|name| headers.get(*name))
        .and_then(|v| v.to_str().ok())
}

/// Strip a leading `sha256=` scheme, matching the scheme name case-insensitively.
fn strip_scheme(signature: &str) -> &str {
    match signature.get(..SCHEME_PREFIX.len()) {
        Some(head) if head.eq_ignore_ascii_case(SCHEME_PREFIX) => &signature[SCHEME_PREFIX.len()..],
        _ => signature,
    }
}
