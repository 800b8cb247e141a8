//! # Filesystem View
//!
//! This crate provides the in-memory namespace: a tree of named directories
//! and files rooted at `/`, and the path resolution that walks it.
//!
//! ## Design
//!
//! - The [`DirectoryTree`] owns every node in an arena keyed by [`NodeId`]
//! - Directories hold ordered child handles; children hold a parent handle
//! - Parent handles never own anything, so the tree has no reference cycles
//! - Detached nodes are explicitly orphaned; removed nodes leave the arena
//! - Path resolution is a pure function of a tree, a base directory and a path

pub mod directory;
pub mod node;
pub mod path;

pub use directory::{DirectoryTree, TreeError, ROOT_NAME};
pub use node::{Node, NodeId, NodeKind, NodeType};
pub use path::{PathError, PathResolver};
