//! Node identifier generation.

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::model::document::NodeId;

/// Generates a fresh, time-ordered node id (UUIDv7).
pub fn new_node_id() -> NodeId {
    Uuid::now_v7().to_string()
}

/// Derives a stable node id (UUIDv8) from input bytes using SHA-256.
///
/// ```text
/// hash = SHA-256(input_bytes)[0:16]
/// hash[6] = (hash[6] & 0x0F) | 0x80  // version 8
/// hash[8] = (hash[8] & 0x3F) | 0x80  // RFC 4122 variant
/// ```
pub fn derived_node_id(input: &[u8]) -> NodeId {
    let hash = Sha256::digest(input);
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&hash[..16]);

    bytes[6] = (bytes[6] & 0x0F) | 0x80;
    bytes[8] = (bytes[8] & 0x3F) | 0x80;

    Uuid::from_bytes(bytes).to_string()
}
