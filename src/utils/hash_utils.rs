use sha2::{Sha256, Digest};
use log::trace;

/// Calculate SHA-256 hash over several parts.
/// Parts are length-prefixed so that `["ab", "c"]` and `["a", "bc"]` differ.
pub fn hash_parts(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part.as_bytes());
    }
    let digest = format!("{:x}", hasher.finalize());
    trace!("Hashed {} parts to {}", parts.len(), digest);
    digest
}
