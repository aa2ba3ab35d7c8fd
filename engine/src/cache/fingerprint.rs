//! Content-addressed cache keys: `SHA-256(bytes) xor SHA-256(canonical
//! options json)`, base64-encoded. Two documents with identical bytes and
//! identical canonicalized options always fingerprint identically,
//! regardless of the order fields were set in.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};

/// Computes the cache key for `bytes` processed with `canonical_options_json`.
#[must_use]
pub fn fingerprint(bytes: &[u8], canonical_options_json: &str) -> String {
    let bytes_digest = Sha256::digest(bytes);
    let options_digest = Sha256::digest(canonical_options_json.as_bytes());

    let mut combined = [0u8; 32];
    for i in 0..32 {
        combined[i] = bytes_digest[i] ^ options_digest[i];
    }

    STANDARD.encode(combined)
}
