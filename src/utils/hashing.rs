//! Stable hashing for dataset checksums

use sha2::{Digest, Sha256};

/// Hex SHA-256 of a rendered document, written into the merge report so
/// reruns on identical inputs can be compared without diffing the dataset.
pub fn sha256_hex(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
