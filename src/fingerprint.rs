use sha2::{Digest, Sha256};

use crate::types::{DatasetKind, InputFormat};

/// SHA-256 of the raw bytes, hex encoded
pub fn content_sha256(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Cache key for one ingest: the same bytes read as a different kind or
/// format must not collide, and the file name never takes part.
pub fn content_key(kind: DatasetKind, format: InputFormat, bytes: &[u8]) -> String {
    let mut s = String::new();
    s.push_str(kind.as_str());
    s.push('|');
    s.push_str(format.as_str());
    s.push('|');
    s.push_str(&content_sha256(bytes));

    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    hex::encode(hasher.finalize())
}
