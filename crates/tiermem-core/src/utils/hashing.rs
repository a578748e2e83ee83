//! Hashing Utilities

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::{MemoryError, MemoryResult};

/// Compute SHA-256 hash of content and return as hex string
pub fn content_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

/// Fingerprint any serializable value by hashing its JSON encoding
pub fn content_fingerprint<T: Serialize + ?Sized>(content: &T) -> MemoryResult<String> {
    let encoded = serde_json::to_vec(content)
        .map_err(|e| MemoryError::invalid_input(format!("content is not serializable: {}", e)))?;
    Ok(content_hash(&encoded))
}
