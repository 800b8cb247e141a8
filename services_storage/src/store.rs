//! State stores
//!
//! A store persists one opaque blob under a name. The blob layout is owned by
//! [`codec`](crate::codec); stores only move bytes.

use crate::StorageError;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

/// A named resource holding a single state blob
pub trait StateStore {
    /// Replaces the stored blob
    fn save(&self, blob: &[u8]) -> Result<(), StorageError>;

    /// Reads the stored blob
    fn load(&self) -> Result<Vec<u8>, StorageError>;

    /// Human-readable name of the resource
    fn describe(&self) -> String;
}

/// Store backed by a single file on the host filesystem
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StateStore for FileStateStore {
    /// Writes a sibling file first and renames it over the target, so a
    /// failed write never leaves a half-written state behind.
    fn save(&self, blob: &[u8]) -> Result<(), StorageError> {
        let staging = self.staging_path();
        fs::write(&staging, blob).map_err(|e| StorageError::io(&staging, e))?;
        fs::rename(&staging, &self.path).map_err(|e| StorageError::io(&self.path, e))
    }

    fn load(&self) -> Result<Vec<u8>, StorageError> {
        fs::read(&self.path).map_err(|e| StorageError::io(&self.path, e))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Store that keeps the blob in memory
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    blob: RefCell<Option<Vec<u8>>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-loaded with `blob`
    pub fn with_blob(blob: Vec<u8>) -> Self {
        Self {
            blob: RefCell::new(Some(blob)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.blob.borrow().is_none()
    }
}

impl StateStore for MemoryStateStore {
    fn save(&self, blob: &[u8]) -> Result<(), StorageError> {
        *self.blob.borrow_mut() = Some(blob.to_vec());
        Ok(())
    }

    fn load(&self) -> Result<Vec<u8>, StorageError> {
        self.blob
            .borrow()
            .clone()
            .ok_or_else(|| StorageError::Missing("memory".to_string()))
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
