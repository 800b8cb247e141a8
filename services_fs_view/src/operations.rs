//! Filesystem operations
//!
//! This module defines the operations provided by the namespace engine.
//! Every operation is relative to the current directory unless a path says
//! otherwise, and every failure leaves the tree untouched.

use fs_view::{NodeId, NodeType, PathError, TreeError};
use services_storage::StorageError;
use thiserror::Error;

/// Errors that can occur during filesystem operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OperationError {
    /// A directory path did not resolve
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// A file name or file path did not resolve
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// The destination directory of a copy or move did not resolve
    #[error("Invalid destination path: {0}")]
    InvalidDestination(String),

    /// Neither a file nor a directory resolved
    #[error("File or directory not found: {0}")]
    NotFound(String),

    /// A sibling of the same kind already uses the name
    #[error("Name already exists: {0}")]
    NameConflict(String),

    /// The name cannot be used for a new node
    #[error("Invalid name: {0:?}")]
    InvalidName(String),

    /// A search visited every file without a hit
    #[error("not found: {0}")]
    NoMatch(String),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Path resolution error
    #[error("Path error: {0}")]
    PathError(#[from] PathError),

    /// Tree primitive or restored-state consistency error
    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),

    /// Saving or loading state failed
    #[error("Persistence failure: {0}")]
    Persistence(#[from] StorageError),
}

/// A single `grep` hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrepMatch {
    /// Node holding the match
    pub id: NodeId,
    /// File name
    pub name: String,
    /// Full file content
    pub content: String,
}

impl std::fmt::Display for GrepMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.content)
    }
}

/// What `rm` removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveOutcome {
    /// Whether a file or a directory was removed
    pub kind: NodeType,
    /// Number of nodes destroyed, the target included
    pub removed: usize,
    /// Set when the current directory was inside the removed subtree and
    /// has been reset to the root
    pub current_reset: bool,
}

/// Filesystem operations trait
///
/// This trait defines the shell-like operations that can be performed on the
/// namespace.
pub trait FileSystemOperations {
    /// Create a directory named `name` in the current directory
    fn mkdir(&mut self, name: &str) -> Result<NodeId, OperationError>;

    /// Change the current directory
    ///
    /// Accepts `/`, `..`, absolute and relative paths. On failure the
    /// current directory is unchanged.
    fn cd(&mut self, path: &str) -> Result<NodeId, OperationError>;

    /// List a directory: subdirectories (suffixed `/`) then files
    ///
    /// `None` or an empty path lists the current directory.
    fn ls(&self, path: Option<&str>) -> Result<Vec<String>, OperationError>;

    /// Create an empty file named `name` in the current directory
    fn touch(&mut self, name: &str) -> Result<NodeId, OperationError>;

    /// Append `content` to the file `name`
    ///
    /// The file is looked up in the whole subtree of the current directory
    /// and created in the current directory if absent.
    fn echo(&mut self, name: &str, content: &str) -> Result<NodeId, OperationError>;

    /// Read the file `name`, searching the current subtree
    fn cat(&self, name: &str) -> Result<String, OperationError>;

    /// Find every file below the current directory containing `query`
    ///
    /// Hits come back in pre-order. No hit at all is reported once, as
    /// [`OperationError::NoMatch`].
    fn grep(&self, query: &str) -> Result<Vec<GrepMatch>, OperationError>;

    /// Copy the file at `source` into the directory at `destination`
    fn cp(&mut self, source: &str, destination: &str) -> Result<NodeId, OperationError>;

    /// Move the file at `source` into the directory at `destination`
    fn mv(&mut self, source: &str, destination: &str) -> Result<NodeId, OperationError>;

    /// Remove the file at `path`, or else the directory at `path` recursively
    fn rm(&mut self, path: &str) -> Result<RemoveOutcome, OperationError>;

    /// Absolute path of the current directory
    fn pwd(&self) -> String;
}
