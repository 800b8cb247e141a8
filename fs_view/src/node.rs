//! Node types and identifiers
//!
//! A node is either a directory or a file. Nodes never own each other;
//! the [`DirectoryTree`](crate::DirectoryTree) owns every node and links
//! are expressed as [`NodeId`] handles.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique handle for a node in a directory tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Creates a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

/// Discriminant for the two node variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeType {
    Directory,
    File,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeType::Directory => write!(f, "directory"),
            NodeType::File => write!(f, "file"),
        }
    }
}

/// Variant payload of a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Ordered child handles; insertion order is listing order
    Directory { children: Vec<NodeId> },
    /// Raw UTF-8 content, appended to verbatim
    File { content: String },
}

/// A single entry in the namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Name of this node (`/` for the root)
    pub name: String,
    /// Owning directory; `None` for the root and for detached nodes
    pub parent: Option<NodeId>,
    /// Directory children or file content
    pub kind: NodeKind,
}

impl Node {
    /// Creates an empty, detached directory node
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            kind: NodeKind::Directory {
                children: Vec::new(),
            },
        }
    }

    /// Creates an empty, detached file node
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            kind: NodeKind::File {
                content: String::new(),
            },
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self.kind {
            NodeKind::Directory { .. } => NodeType::Directory,
            NodeKind::File { .. } => NodeType::File,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File { .. })
    }

    /// Returns the child handles if this is a directory
    pub fn children(&self) -> Option<&[NodeId]> {
        match &self.kind {
            NodeKind::Directory { children } => Some(children),
            NodeKind::File { .. } => None,
        }
    }

    /// Returns the content if this is a file
    pub fn content(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::File { content } => Some(content),
            NodeKind::Directory { .. } => None,
        }
    }
}
