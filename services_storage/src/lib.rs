//! # Storage Service
//!
//! This crate persists and restores whole-state snapshots.
//!
//! ## Design
//!
//! - **Opaque blobs**: callers hand in any `Serialize` value and get bytes back
//! - **Framed and checksummed**: magic, format version and CRC32 guard every blob
//! - **Named resources**: a [`StateStore`] moves one blob to and from a place
//! - **Failures are values**: every error is a [`StorageError`], never a panic

pub mod codec;
pub mod store;

pub use codec::{decode, encode, STATE_FORMAT_VERSION, STATE_MAGIC};
pub use store::{FileStateStore, MemoryStateStore, StateStore};

use std::path::Path;
use thiserror::Error;

/// Errors raised while saving or loading state
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    #[error("No saved state in {0}")]
    Missing(String),

    #[error("Not a state blob (bad magic)")]
    BadMagic,

    #[error("Unsupported state format version: {0}")]
    UnsupportedVersion(u16),

    #[error("Checksum mismatch: expected {expected:#010x}, computed {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    #[error("Truncated state: expected {expected} bytes, found {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl StorageError {
    pub(crate) fn io(path: &Path, err: std::io::Error) -> Self {
        StorageError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

/// Encodes `state` and writes it to `store`
pub fn save_to<T: serde::Serialize>(store: &dyn StateStore, state: &T) -> Result<(), StorageError> {
    let blob = encode(state)?;
    store.save(&blob)
}

/// Reads a blob from `store` and decodes it
pub fn load_from<T: serde::de::DeserializeOwned>(store: &dyn StateStore) -> Result<T, StorageError> {
    let blob = store.load()?;
    decode(&blob)
}
