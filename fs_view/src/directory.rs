//! Directory tree arena
//!
//! The tree owns every node. Directories refer to their children by
//! handle and every attached node carries a handle back to its parent.
//! No operation here parses paths; see [`PathResolver`](crate::PathResolver).

use crate::node::{Node, NodeId, NodeKind, NodeType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Name of the root directory
pub const ROOT_NAME: &str = "/";

/// Errors raised by tree primitives
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("Not a directory: {0}")]
    NotADirectory(NodeId),

    #[error("Not a file: {0}")]
    NotAFile(NodeId),

    #[error("Node is already attached: {0}")]
    AlreadyAttached(NodeId),

    #[error("{child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },

    #[error("The root directory cannot be removed")]
    CannotRemoveRoot,

    #[error("Corrupt tree: {0}")]
    Corrupt(String),
}

/// Serialized form of a tree: the root handle plus a flat node list
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TreeRecord {
    root: NodeId,
    nodes: Vec<(NodeId, Node)>,
}

/// The hierarchy of directories and files rooted at `/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "TreeRecord", from = "TreeRecord")]
pub struct DirectoryTree {
    root: NodeId,
    nodes: HashMap<NodeId, Node>,
}

impl From<DirectoryTree> for TreeRecord {
    fn from(tree: DirectoryTree) -> Self {
        let mut nodes: Vec<(NodeId, Node)> = tree.nodes.into_iter().collect();
        nodes.sort_by_key(|(id, _)| *id);
        Self {
            root: tree.root,
            nodes,
        }
    }
}

impl From<TreeRecord> for DirectoryTree {
    fn from(record: TreeRecord) -> Self {
        Self {
            root: record.root,
            nodes: record.nodes.into_iter().collect(),
        }
    }
}

impl DirectoryTree {
    /// Creates a tree holding only the root directory
    pub fn new() -> Self {
        let root = NodeId::new();
        let mut nodes = HashMap::new();
        nodes.insert(root, Node::directory(ROOT_NAME));
        Self { root, nodes }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Gets a node by handle
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of nodes held, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when nothing but the root is held
    pub fn has_only_root(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Counts live nodes of the given type
    pub fn count(&self, node_type: NodeType) -> usize {
        self.nodes
            .values()
            .filter(|node| node.node_type() == node_type)
            .count()
    }

    /// Allocates a detached, empty directory
    pub fn new_directory(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId::new();
        self.nodes.insert(id, Node::directory(name));
        id
    }

    /// Allocates a detached, empty file
    pub fn new_file(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId::new();
        self.nodes.insert(id, Node::file(name));
        id
    }

    /// Links a detached node under `parent`, appending it to the child list
    ///
    /// Name uniqueness is not checked here.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        if child == self.root || child == parent {
            return Err(TreeError::AlreadyAttached(child));
        }
        match self.nodes.get(&child) {
            None => return Err(TreeError::UnknownNode(child)),
            Some(node) if node.parent.is_some() => return Err(TreeError::AlreadyAttached(child)),
            Some(_) => {}
        }

        self.children_mut(parent)?.push(child);
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        Ok(())
    }

    /// Unlinks `child` from `parent`; the child stays in the arena, orphaned
    pub fn detach(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let children = self.children_mut(parent)?;
        let position = children
            .iter()
            .position(|id| *id == child)
            .ok_or(TreeError::NotAChild { parent, child })?;
        children.remove(position);

        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = None;
        }
        Ok(())
    }

    /// Returns the parent handle, `None` for the root or a detached node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|node| node.parent)
    }

    /// Returns the child handles of a directory
    pub fn children(&self, dir: NodeId) -> Result<&[NodeId], TreeError> {
        self.nodes
            .get(&dir)
            .ok_or(TreeError::UnknownNode(dir))?
            .children()
            .ok_or(TreeError::NotADirectory(dir))
    }

    fn children_mut(&mut self, dir: NodeId) -> Result<&mut Vec<NodeId>, TreeError> {
        match self.nodes.get_mut(&dir) {
            None => Err(TreeError::UnknownNode(dir)),
            Some(Node {
                kind: NodeKind::Directory { children },
                ..
            }) => Ok(children),
            Some(_) => Err(TreeError::NotADirectory(dir)),
        }
    }

    fn children_of_type(&self, dir: NodeId, node_type: NodeType) -> Vec<NodeId> {
        self.children(dir)
            .map(|children| {
                children
                    .iter()
                    .copied()
                    .filter(|id| {
                        self.nodes
                            .get(id)
                            .is_some_and(|node| node.node_type() == node_type)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Subdirectories of `dir`, in insertion order
    pub fn subdirectories(&self, dir: NodeId) -> Vec<NodeId> {
        self.children_of_type(dir, NodeType::Directory)
    }

    /// Files directly inside `dir`, in insertion order
    pub fn files(&self, dir: NodeId) -> Vec<NodeId> {
        self.children_of_type(dir, NodeType::File)
    }

    fn child_named(&self, dir: NodeId, name: &str, node_type: NodeType) -> Option<NodeId> {
        self.children_of_type(dir, node_type)
            .into_iter()
            .find(|id| self.nodes.get(id).is_some_and(|node| node.name == name))
    }

    /// First subdirectory of `dir` called `name`
    pub fn subdirectory(&self, dir: NodeId, name: &str) -> Option<NodeId> {
        self.child_named(dir, name, NodeType::Directory)
    }

    /// First file directly inside `dir` called `name`
    pub fn file(&self, dir: NodeId, name: &str) -> Option<NodeId> {
        self.child_named(dir, name, NodeType::File)
    }

    /// Subtree lookup: files of `dir` first, then each subdirectory in order
    pub fn find_file(&self, dir: NodeId, name: &str) -> Option<NodeId> {
        if let Some(found) = self.file(dir, name) {
            return Some(found);
        }
        self.subdirectories(dir)
            .into_iter()
            .find_map(|sub| self.find_file(sub, name))
    }

    /// Every file in the subtree rooted at `dir`, pre-order
    pub fn files_preorder(&self, dir: NodeId) -> Vec<NodeId> {
        let mut out = self.files(dir);
        for sub in self.subdirectories(dir) {
            out.extend(self.files_preorder(sub));
        }
        out
    }

    /// Listing names: `name/` for each subdirectory, then each file name
    pub fn list_names(&self, dir: NodeId) -> Result<Vec<String>, TreeError> {
        self.children(dir)?;

        let dirs = self
            .subdirectories(dir)
            .into_iter()
            .filter_map(|id| self.nodes.get(&id))
            .map(|node| format!("{}/", node.name));
        let files = self
            .files(dir)
            .into_iter()
            .filter_map(|id| self.nodes.get(&id))
            .map(|node| node.name.clone());

        Ok(dirs.chain(files).collect())
    }

    /// Returns file content
    pub fn content(&self, file: NodeId) -> Result<&str, TreeError> {
        self.nodes
            .get(&file)
            .ok_or(TreeError::UnknownNode(file))?
            .content()
            .ok_or(TreeError::NotAFile(file))
    }

    /// Appends to file content; never truncates
    pub fn append_content(&mut self, file: NodeId, text: &str) -> Result<(), TreeError> {
        match self.nodes.get_mut(&file) {
            None => Err(TreeError::UnknownNode(file)),
            Some(Node {
                kind: NodeKind::File { content },
                ..
            }) => {
                content.push_str(text);
                Ok(())
            }
            Some(_) => Err(TreeError::NotAFile(file)),
        }
    }

    /// Allocates a detached copy of a file with the same name and content
    pub fn clone_file(&mut self, file: NodeId) -> Result<NodeId, TreeError> {
        let source = self.nodes.get(&file).ok_or(TreeError::UnknownNode(file))?;
        if !source.is_file() {
            return Err(TreeError::NotAFile(file));
        }

        let copy = Node {
            name: source.name.clone(),
            parent: None,
            kind: source.kind.clone(),
        };
        let id = NodeId::new();
        self.nodes.insert(id, copy);
        Ok(id)
    }

    /// Destroys a node and, for a directory, its whole subtree
    ///
    /// Post-order: files first, then subdirectories, then the node itself is
    /// detached from its parent. Returns the number of nodes destroyed.
    pub fn remove_subtree(&mut self, id: NodeId) -> Result<usize, TreeError> {
        if id == self.root {
            return Err(TreeError::CannotRemoveRoot);
        }
        if !self.nodes.contains_key(&id) {
            return Err(TreeError::UnknownNode(id));
        }

        let mut removed = 0;
        for file in self.files(id) {
            self.detach(id, file)?;
            self.nodes.remove(&file);
            removed += 1;
        }
        for sub in self.subdirectories(id) {
            removed += self.remove_subtree(sub)?;
        }

        if let Some(parent) = self.parent(id) {
            self.detach(parent, id)?;
        }
        self.nodes.remove(&id);
        Ok(removed + 1)
    }

    /// Whether `id` can be reached from the root through parent handles
    pub fn is_reachable(&self, id: NodeId) -> bool {
        let mut current = id;
        // A well-formed chain is never longer than the node count.
        for _ in 0..=self.nodes.len() {
            if current == self.root {
                return true;
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
        false
    }

    /// Absolute path of an attached node, e.g. `/docs/a.txt`
    pub fn path_of(&self, id: NodeId) -> Option<String> {
        if !self.is_reachable(id) {
            return None;
        }

        let mut names = Vec::new();
        let mut current = id;
        while current != self.root {
            let node = self.nodes.get(&current)?;
            names.push(node.name.as_str());
            current = node.parent?;
        }
        names.reverse();
        Some(format!("/{}", names.join("/")))
    }

    /// Checks the structural invariants of the tree
    ///
    /// The root must be a parentless directory named `/`, every child handle
    /// must point at a live node whose parent handle points back, and every
    /// non-root node must be reachable from the root.
    pub fn validate(&self) -> Result<(), TreeError> {
        let root = self
            .nodes
            .get(&self.root)
            .ok_or_else(|| TreeError::Corrupt("missing root".to_string()))?;
        if !root.is_directory() || root.name != ROOT_NAME || root.parent.is_some() {
            return Err(TreeError::Corrupt("malformed root".to_string()));
        }

        for (id, node) in &self.nodes {
            if let Some(children) = node.children() {
                for child in children {
                    let child_node = self.nodes.get(child).ok_or_else(|| {
                        TreeError::Corrupt(format!("{} lists missing child {}", id, child))
                    })?;
                    if child_node.parent != Some(*id) {
                        return Err(TreeError::Corrupt(format!(
                            "{} does not point back to {}",
                            child, id
                        )));
                    }
                }
            }

            if let Some(parent) = node.parent {
                let listed = self
                    .nodes
                    .get(&parent)
                    .and_then(Node::children)
                    .is_some_and(|children| children.iter().filter(|c| *c == id).count() == 1);
                if !listed {
                    return Err(TreeError::Corrupt(format!(
                        "{} is not listed exactly once by its parent",
                        id
                    )));
                }
            }

            if *id != self.root && !self.is_reachable(*id) {
                return Err(TreeError::Corrupt(format!("{} is orphaned", id)));
            }
        }

        Ok(())
    }
}

impl Default for DirectoryTree {
    fn default() -> Self {
        Self::new()
    }
}
