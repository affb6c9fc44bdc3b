//! Short, loggable identifier for the active session key.
//!
//! The fingerprint is logged when the key is loaded so operators can tell
//! which key a node runs with after a rotation.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

/// Length of the fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// Generate a truncated SHA-256 fingerprint of the key's signing material.
///
/// Returns the first 8 bytes of the SHA-256 digest as 16 lowercase hex
/// characters.
///
/// # Examples
///
/// ```rust
/// use actix_web::cookie::Key;
/// use bloodlink::inbound::http::session_config::fingerprint::key_fingerprint;
///
/// let key = Key::generate();
/// let fp = key_fingerprint(&key);
///
/// assert_eq!(fp.len(), 16);
/// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let signing_bytes = key.signing();
    let mut hasher = Sha256::new();
    hasher.update(signing_bytes);
    let result = hasher.finalize();
    hex::encode(result.iter().take(FINGERPRINT_BYTES).copied().collect::<Vec<u8>>())
}
