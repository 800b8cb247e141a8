//! State blob framing
//!
//! A saved state is a single opaque blob:
//!
//! ```text
//! +-------+---------+-----------+-------------+-----------------+
//! | magic | version | crc32     | payload len | payload (JSON)  |
//! | 4 B   | u16 LE  | u32 LE    | u32 LE      | len bytes       |
//! +-------+---------+-----------+-------------+-----------------+
//! ```
//!
//! The checksum covers the payload only. Anything that fails the magic,
//! version, length or checksum test is rejected before deserialization.

use crate::StorageError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Magic bytes opening every state blob
pub const STATE_MAGIC: [u8; 4] = *b"MEMF";

/// Version of the blob format
pub const STATE_FORMAT_VERSION: u16 = 1;

const HEADER_LEN: usize = 4 + 2 + 4 + 4;

/// Serializes `state` into a framed blob
pub fn encode<T: Serialize>(state: &T) -> Result<Vec<u8>, StorageError> {
    let payload =
        serde_json::to_vec(state).map_err(|e| StorageError::Serialization(e.to_string()))?;
    let len = u32::try_from(payload.len())
        .map_err(|_| StorageError::Serialization("state too large".to_string()))?;

    let mut blob = Vec::with_capacity(HEADER_LEN + payload.len());
    blob.extend_from_slice(&STATE_MAGIC);
    blob.extend_from_slice(&STATE_FORMAT_VERSION.to_le_bytes());
    blob.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
    blob.extend_from_slice(&len.to_le_bytes());
    blob.extend_from_slice(&payload);
    Ok(blob)
}

/// Validates the framing of `blob` and deserializes its payload
pub fn decode<T: DeserializeOwned>(blob: &[u8]) -> Result<T, StorageError> {
    if blob.len() < HEADER_LEN {
        return Err(StorageError::Truncated {
            expected: HEADER_LEN,
            actual: blob.len(),
        });
    }

    let (header, payload) = blob.split_at(HEADER_LEN);
    if header[0..4] != STATE_MAGIC {
        return Err(StorageError::BadMagic);
    }

    let version = u16::from_le_bytes([header[4], header[5]]);
    if version != STATE_FORMAT_VERSION {
        return Err(StorageError::UnsupportedVersion(version));
    }

    let checksum = u32::from_le_bytes([header[6], header[7], header[8], header[9]]);
    let len = u32::from_le_bytes([header[10], header[11], header[12], header[13]]) as usize;
    if payload.len() != len {
        return Err(StorageError::Truncated {
            expected: HEADER_LEN + len,
            actual: blob.len(),
        });
    }

    let computed = crc32fast::hash(payload);
    if computed != checksum {
        return Err(StorageError::ChecksumMismatch {
            expected: checksum,
            actual: computed,
        });
    }

    serde_json::from_slice(payload).map_err(|e| StorageError::Serialization(e.to_string()))
}
