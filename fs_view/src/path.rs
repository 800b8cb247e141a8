//! Path resolution logic
//!
//! This module maps path strings onto nodes of a [`DirectoryTree`] relative
//! to a base directory. Resolution never mutates the tree.
//!
//! Two file lookups exist and are intentionally different:
//!
//! - [`PathResolver::resolve_file`] treats the last component as a file that
//!   must be a direct child of the directory named by the other components.
//! - [`PathResolver::find_file`] searches the whole subtree below a directory
//!   for a file with the given name.

use crate::directory::DirectoryTree;
use crate::node::NodeId;
use thiserror::Error;

/// Errors that can occur during path resolution
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// Path is empty or invalid
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Path component not found during traversal
    #[error("Not found: {0}")]
    NotFound(String),

    /// The base of a resolution is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(String),
}

/// Path resolver
///
/// Handles splitting paths into components and walking them through a tree.
pub struct PathResolver;

impl PathResolver {
    /// Splits a path into components, dropping empty ones
    ///
    /// # Examples
    ///
    /// ```
    /// use fs_view::PathResolver;
    ///
    /// let components = PathResolver::split_path("docs/notes/todo.txt");
    /// assert_eq!(components, vec!["docs", "notes", "todo.txt"]);
    ///
    /// let components = PathResolver::split_path("//docs//notes/");
    /// assert_eq!(components, vec!["docs", "notes"]);
    /// ```
    pub fn split_path(path: &str) -> Vec<&str> {
        path.split('/').filter(|c| !c.is_empty()).collect()
    }

    pub fn is_absolute(path: &str) -> bool {
        path.starts_with('/')
    }

    /// Validates a single path component name
    ///
    /// Returns true if the name is valid for a new directory or file.
    pub fn is_valid_name(name: &str) -> bool {
        !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains('/')
            && !name.contains('\0')
    }

    /// Resolves `path` to a directory relative to `base`
    ///
    /// `/` names the root and `..` (as the whole path) names the parent of
    /// `base`. Otherwise absolute paths start at the root and relative ones
    /// at `base`; each component must name a subdirectory. The empty path
    /// resolves to `base`.
    pub fn resolve_directory(
        tree: &DirectoryTree,
        base: NodeId,
        path: &str,
    ) -> Result<NodeId, PathError> {
        Self::check_base(tree, base)?;

        if path == "/" {
            return Ok(tree.root());
        }
        if path == ".." {
            return tree
                .parent(base)
                .ok_or_else(|| PathError::NotFound(path.to_string()));
        }

        let start = if Self::is_absolute(path) {
            tree.root()
        } else {
            base
        };
        Self::walk(tree, start, &Self::split_path(path), path)
    }

    /// Resolves `path` to a file that is a direct child of its directory
    ///
    /// All components but the last are resolved as a directory path; the last
    /// must name a file inside that directory. Subdirectories are not searched.
    pub fn resolve_file(
        tree: &DirectoryTree,
        base: NodeId,
        path: &str,
    ) -> Result<NodeId, PathError> {
        Self::check_base(tree, base)?;

        let components = Self::split_path(path);
        let (name, dirs) = components
            .split_last()
            .ok_or_else(|| PathError::InvalidPath(path.to_string()))?;

        let start = if Self::is_absolute(path) {
            tree.root()
        } else {
            base
        };
        let dir = Self::walk(tree, start, dirs, path)?;

        tree.file(dir, name)
            .ok_or_else(|| PathError::NotFound(path.to_string()))
    }

    /// Subtree lookup of a file called `name` below `base`
    pub fn find_file(tree: &DirectoryTree, base: NodeId, name: &str) -> Result<NodeId, PathError> {
        Self::check_base(tree, base)?;
        tree.find_file(base, name)
            .ok_or_else(|| PathError::NotFound(name.to_string()))
    }

    fn walk(
        tree: &DirectoryTree,
        start: NodeId,
        components: &[&str],
        path: &str,
    ) -> Result<NodeId, PathError> {
        components.iter().try_fold(start, |current, component| {
            tree.subdirectory(current, component)
                .ok_or_else(|| PathError::NotFound(path.to_string()))
        })
    }

    fn check_base(tree: &DirectoryTree, base: NodeId) -> Result<(), PathError> {
        match tree.get(base) {
            Some(node) if node.is_directory() => Ok(()),
            Some(node) => Err(PathError::NotADirectory(node.name.clone())),
            None => Err(PathError::NotFound(base.to_string())),
        }
    }
}
