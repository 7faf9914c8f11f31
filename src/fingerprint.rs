//! Cache-key derivation for the host build tool.
//!
//! During staging the host asks the generator for a fingerprint that feeds
//! its content cache: when the fingerprint changes, the fragment is
//! regenerated; otherwise the cached artifact is reused. The key covers
//! everything that can change the output:
//!
//! - the generator version (stands in for hashing the generator's own code),
//! - the output path the fragment is written to,
//! - the digest the host computed over the staged input tree.
//!
//! The digest itself is opaque to us; it is decoded only to validate that
//! the host handed over well-formed hex, then folded into the hash as-is.

use crate::core::IncludeGenError;
use sha2::{Digest, Sha256};

/// Derive the cache fingerprint as lowercase hex.
///
/// Deterministic for a given (version, output path, digest) triple. The
/// three inputs are hashed with length framing so that no two distinct
/// triples can collide by concatenation.
///
/// # Errors
/// Returns [`IncludeGenError::InvalidDigest`] if `digest` is present but not
/// valid hexadecimal.
pub fn unique_key(out_path: &str, digest: Option<&str>) -> Result<String, IncludeGenError> {
    let digest_bytes = match digest {
        Some(hex_digest) => {
            hex::decode(hex_digest).map_err(|e| IncludeGenError::InvalidDigest {
                digest: hex_digest.to_string(),
                reason: e.to_string(),
            })?
        }
        None => Vec::new(),
    };

    let mut hasher = Sha256::new();
    for part in [
        env!("CARGO_PKG_VERSION").as_bytes(),
        out_path.as_bytes(),
        digest_bytes.as_slice(),
    ] {
        hasher.update((part.len() as u64).to_be_bytes());
        hasher.update(part);
    }

    Ok(hex::encode(hasher.finalize()))
}
