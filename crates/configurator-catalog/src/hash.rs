#![deny(unsafe_code)]

use sha2::Digest;

/// Lowercase hex sha256 of `bytes`, the form pinned in `catalog.toml`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    hex::encode(digest)
}
