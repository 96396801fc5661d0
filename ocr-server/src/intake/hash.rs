use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of the full upload. Depends on nothing but the bytes.
pub fn content_hash(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
