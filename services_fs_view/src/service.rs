//! Filesystem View Service implementation
//!
//! This module provides the namespace engine: it owns the directory tree and
//! the current directory, and implements [`FileSystemOperations`] on them.

use crate::operations::{FileSystemOperations, GrepMatch, OperationError, RemoveOutcome};
use fs_view::{DirectoryTree, NodeId, NodeType, PathResolver};
use services_logger::{LogEntry, LogLevel, Logger};

/// Source tag for engine log entries
pub const LOG_SOURCE: &str = "fs_view";

/// How sibling name collisions are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamePolicy {
    /// Reject a new directory (file) whose name an existing sibling
    /// directory (file) already uses
    #[default]
    Strict,
    /// Allow same-kind siblings with identical names
    Lenient,
}

/// Engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Sibling name collision handling
    pub name_policy: NamePolicy,
    /// Minimum level kept by the engine's logger
    pub log_level: LogLevel,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name_policy: NamePolicy::Strict,
            log_level: LogLevel::Info,
        }
    }
}

/// The Filesystem View Service
///
/// Maintains the directory hierarchy and the current directory, and
/// provides operations to manipulate them.
#[derive(Debug, Clone)]
pub struct FileSystemViewService {
    tree: DirectoryTree,
    current: NodeId,
    config: ServiceConfig,
    logger: Logger,
}

impl FileSystemViewService {
    /// Creates a service over a fresh tree, positioned at the root
    pub fn new() -> Self {
        Self::with_config(ServiceConfig::default())
    }

    pub fn with_config(config: ServiceConfig) -> Self {
        let tree = DirectoryTree::new();
        let current = tree.root();
        Self::from_parts(tree, current, config)
    }

    /// Assembles a service from an existing tree; callers check consistency
    pub(crate) fn from_parts(tree: DirectoryTree, current: NodeId, config: ServiceConfig) -> Self {
        Self {
            tree,
            current,
            config,
            logger: Logger::new(config.log_level).with_source(LOG_SOURCE),
        }
    }

    pub fn tree(&self) -> &DirectoryTree {
        &self.tree
    }

    pub fn config(&self) -> ServiceConfig {
        self.config
    }

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// Handle of the current directory
    pub fn current_directory(&self) -> NodeId {
        self.current
    }

    /// Name of the current directory (`/` at the root)
    pub fn current_name(&self) -> &str {
        self.tree
            .get(self.current)
            .map(|node| node.name.as_str())
            .unwrap_or(fs_view::ROOT_NAME)
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn logger_mut(&mut self) -> &mut Logger {
        &mut self.logger
    }

    /// Removes and returns buffered log entries
    pub fn drain_logs(&mut self) -> Vec<LogEntry> {
        self.logger.drain()
    }

    fn log_success(&mut self, op: &str, target: &str) {
        self.logger.log(
            LogEntry::new(LogLevel::Debug, op)
                .with_field("target", target)
                .with_field("cwd", self.current),
        );
    }

    fn log_failure(&mut self, op: &str, err: &OperationError) {
        self.logger.log(
            LogEntry::new(LogLevel::Info, format!("{} failed", op)).with_field("error", err),
        );
    }

    fn logged<T>(
        &mut self,
        op: &str,
        target: &str,
        result: Result<T, OperationError>,
    ) -> Result<T, OperationError> {
        match &result {
            Ok(_) => self.log_success(op, target),
            Err(err) => self.log_failure(op, err),
        }
        result
    }

    fn check_name(name: &str) -> Result<(), OperationError> {
        if PathResolver::is_valid_name(name) {
            Ok(())
        } else {
            Err(OperationError::InvalidName(name.to_string()))
        }
    }

    /// Applies the name policy for a new `kind` node called `name` in `dir`
    fn check_conflict(&self, dir: NodeId, name: &str, kind: NodeType) -> Result<(), OperationError> {
        if self.config.name_policy == NamePolicy::Lenient {
            return Ok(());
        }
        let taken = match kind {
            NodeType::Directory => self.tree.subdirectory(dir, name).is_some(),
            NodeType::File => self.tree.file(dir, name).is_some(),
        };
        if taken {
            Err(OperationError::NameConflict(name.to_string()))
        } else {
            Ok(())
        }
    }

    fn node_name(&self, id: NodeId) -> String {
        self.tree
            .get(id)
            .map(|node| node.name.clone())
            .unwrap_or_default()
    }

    fn create_in_current(&mut self, name: &str, kind: NodeType) -> Result<NodeId, OperationError> {
        Self::check_name(name)?;
        self.check_conflict(self.current, name, kind)?;

        let id = match kind {
            NodeType::Directory => self.tree.new_directory(name),
            NodeType::File => self.tree.new_file(name),
        };
        self.tree.attach(self.current, id)?;
        Ok(id)
    }

    fn resolve_source_and_destination(
        &self,
        source: &str,
        destination: &str,
    ) -> Result<(NodeId, NodeId), OperationError> {
        let file = PathResolver::resolve_file(&self.tree, self.current, source)
            .map_err(|_| OperationError::FileNotFound(source.to_string()))?;
        let dir = PathResolver::resolve_directory(&self.tree, self.current, destination)
            .map_err(|_| OperationError::InvalidDestination(destination.to_string()))?;
        Ok((file, dir))
    }

    fn copy_file(&mut self, source: &str, destination: &str) -> Result<NodeId, OperationError> {
        let (file, dir) = self.resolve_source_and_destination(source, destination)?;
        let name = self.node_name(file);
        self.check_conflict(dir, &name, NodeType::File)?;

        let copy = self.tree.clone_file(file)?;
        self.tree.attach(dir, copy)?;
        Ok(copy)
    }

    fn move_file(&mut self, source: &str, destination: &str) -> Result<NodeId, OperationError> {
        let (file, dir) = self.resolve_source_and_destination(source, destination)?;
        let origin = self
            .tree
            .parent(file)
            .ok_or_else(|| OperationError::FileNotFound(source.to_string()))?;
        if origin == dir {
            return Ok(file);
        }

        let name = self.node_name(file);
        self.check_conflict(dir, &name, NodeType::File)?;

        self.tree.detach(origin, file)?;
        self.tree.attach(dir, file)?;
        Ok(file)
    }

    fn remove(&mut self, path: &str) -> Result<RemoveOutcome, OperationError> {
        if PathResolver::split_path(path).is_empty() && path != "/" {
            return Err(OperationError::NotFound(path.to_string()));
        }

        let (target, kind) = match PathResolver::resolve_file(&self.tree, self.current, path) {
            Ok(file) => (file, NodeType::File),
            Err(_) => {
                let dir = PathResolver::resolve_directory(&self.tree, self.current, path)
                    .map_err(|_| OperationError::NotFound(path.to_string()))?;
                if dir == self.tree.root() {
                    return Err(OperationError::InvalidOperation(
                        "cannot remove the root directory".to_string(),
                    ));
                }
                (dir, NodeType::Directory)
            }
        };

        let removed = self.tree.remove_subtree(target)?;

        let current_reset = !self.tree.contains(self.current) || !self.tree.is_reachable(self.current);
        if current_reset {
            self.current = self.tree.root();
            self.logger.log(
                LogEntry::new(
                    LogLevel::Warn,
                    "current directory was removed; returned to /",
                )
                .with_field("path", path),
            );
        }

        Ok(RemoveOutcome {
            kind,
            removed,
            current_reset,
        })
    }
}

impl Default for FileSystemViewService {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystemOperations for FileSystemViewService {
    fn mkdir(&mut self, name: &str) -> Result<NodeId, OperationError> {
        let result = self.create_in_current(name, NodeType::Directory);
        self.logged("mkdir", name, result)
    }

    fn cd(&mut self, path: &str) -> Result<NodeId, OperationError> {
        let result = PathResolver::resolve_directory(&self.tree, self.current, path)
            .map_err(|_| OperationError::InvalidPath(path.to_string()));
        if let Ok(dir) = &result {
            self.current = *dir;
        }
        self.logged("cd", path, result)
    }

    fn ls(&self, path: Option<&str>) -> Result<Vec<String>, OperationError> {
        let path = path.unwrap_or("");
        let dir = PathResolver::resolve_directory(&self.tree, self.current, path)
            .map_err(|_| OperationError::InvalidPath(path.to_string()))?;
        Ok(self.tree.list_names(dir)?)
    }

    fn touch(&mut self, name: &str) -> Result<NodeId, OperationError> {
        let result = self.create_in_current(name, NodeType::File);
        self.logged("touch", name, result)
    }

    fn echo(&mut self, name: &str, content: &str) -> Result<NodeId, OperationError> {
        let result = match PathResolver::find_file(&self.tree, self.current, name) {
            Ok(file) => Ok(file),
            Err(_) => self.create_in_current(name, NodeType::File),
        }
        .and_then(|file| {
            self.tree.append_content(file, content)?;
            Ok(file)
        });
        self.logged("echo", name, result)
    }

    fn cat(&self, name: &str) -> Result<String, OperationError> {
        let file = PathResolver::find_file(&self.tree, self.current, name)
            .map_err(|_| OperationError::FileNotFound(name.to_string()))?;
        Ok(self.tree.content(file)?.to_string())
    }

    fn grep(&self, query: &str) -> Result<Vec<GrepMatch>, OperationError> {
        let matches: Vec<GrepMatch> = self
            .tree
            .files_preorder(self.current)
            .into_iter()
            .filter_map(|id| {
                let node = self.tree.get(id)?;
                let content = node.content()?;
                content.contains(query).then(|| GrepMatch {
                    id,
                    name: node.name.clone(),
                    content: content.to_string(),
                })
            })
            .collect();

        if matches.is_empty() {
            Err(OperationError::NoMatch(query.to_string()))
        } else {
            Ok(matches)
        }
    }

    fn cp(&mut self, source: &str, destination: &str) -> Result<NodeId, OperationError> {
        let result = self.copy_file(source, destination);
        self.logged("cp", source, result)
    }

    fn mv(&mut self, source: &str, destination: &str) -> Result<NodeId, OperationError> {
        let result = self.move_file(source, destination);
        self.logged("mv", source, result)
    }

    fn rm(&mut self, path: &str) -> Result<RemoveOutcome, OperationError> {
        let result = self.remove(path);
        self.logged("rm", path, result)
    }

    fn pwd(&self) -> String {
        self.tree
            .path_of(self.current)
            .unwrap_or_else(|| fs_view::ROOT_NAME.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fs_view::PathError;

    fn lenient() -> FileSystemViewService {
        FileSystemViewService::with_config(ServiceConfig {
            name_policy: NamePolicy::Lenient,
            log_level: LogLevel::Debug,
        })
    }

    #[test]
    fn test_service_creation() {
        let service = FileSystemViewService::new();
        assert_eq!(service.current_directory(), service.root());
        assert_eq!(service.current_name(), "/");
        assert_eq!(service.pwd(), "/");
    }

    #[test]
    fn test_mkdir_resolves_immediately() {
        let mut service = FileSystemViewService::new();
        let docs = service.mkdir("docs").unwrap();
        assert_eq!(
            PathResolver::resolve_directory(service.tree(), service.root(), "docs"),
            Ok(docs)
        );
    }

    #[test]
    fn test_mkdir_already_exists() {
        let mut service = FileSystemViewService::new();
        service.mkdir("docs").unwrap();
        let result = service.mkdir("docs");
        assert!(matches!(result, Err(OperationError::NameConflict(_))));
        assert_eq!(service.ls(None).unwrap(), vec!["docs/"]);
    }

    #[test]
    fn test_mkdir_duplicate_allowed_when_lenient() {
        let mut service = lenient();
        service.mkdir("docs").unwrap();
        service.mkdir("docs").unwrap();
        assert_eq!(service.ls(None).unwrap(), vec!["docs/", "docs/"]);
    }

    #[test]
    fn test_directory_and_file_may_share_name() {
        let mut service = FileSystemViewService::new();
        service.mkdir("notes").unwrap();
        service.touch("notes").unwrap();
        assert_eq!(service.ls(None).unwrap(), vec!["notes/", "notes"]);
    }

    #[test]
    fn test_mkdir_invalid_name() {
        let mut service = FileSystemViewService::new();
        for name in ["", ".", "..", "a/b"] {
            assert!(matches!(
                service.mkdir(name),
                Err(OperationError::InvalidName(_))
            ));
        }
        assert!(service.ls(None).unwrap().is_empty());
    }

    #[test]
    fn test_cd_and_back() {
        let mut service = FileSystemViewService::new();
        let docs = service.mkdir("docs").unwrap();

        assert_eq!(service.cd("docs").unwrap(), docs);
        assert_eq!(service.current_name(), "docs");
        assert_eq!(service.pwd(), "/docs");

        assert_eq!(service.cd("..").unwrap(), service.root());
    }

    #[test]
    fn test_cd_parent_from_root_fails() {
        let mut service = FileSystemViewService::new();
        let result = service.cd("..");
        assert_eq!(result, Err(OperationError::InvalidPath("..".to_string())));
        assert_eq!(service.current_directory(), service.root());
    }

    #[test]
    fn test_cd_invalid_path_keeps_current() {
        let mut service = FileSystemViewService::new();
        let docs = service.mkdir("docs").unwrap();
        service.cd("docs").unwrap();

        assert!(service.cd("missing").is_err());
        assert_eq!(service.current_directory(), docs);
    }

    #[test]
    fn test_ls_root_and_relative() {
        let mut service = FileSystemViewService::new();
        service.mkdir("docs").unwrap();
        service.cd("docs").unwrap();
        service.touch("a.txt").unwrap();

        assert_eq!(service.ls(Some("/")).unwrap(), vec!["docs/"]);
        assert_eq!(service.ls(Some("")).unwrap(), vec!["a.txt"]);
        assert_eq!(service.ls(Some("/docs")).unwrap(), vec!["a.txt"]);
        assert!(matches!(
            service.ls(Some("nope")),
            Err(OperationError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_touch_conflict() {
        let mut service = FileSystemViewService::new();
        service.touch("a").unwrap();
        assert!(matches!(
            service.touch("a"),
            Err(OperationError::NameConflict(_))
        ));
    }

    #[test]
    fn test_echo_appends() {
        let mut service = FileSystemViewService::new();
        service.echo("f", "a").unwrap();
        service.echo("f", "b").unwrap();
        assert_eq!(service.cat("f").unwrap(), "ab");
    }

    #[test]
    fn test_echo_finds_file_in_subtree() {
        let mut service = FileSystemViewService::new();
        service.mkdir("docs").unwrap();
        service.cd("docs").unwrap();
        let file = service.touch("deep.txt").unwrap();
        service.cd("/").unwrap();

        assert_eq!(service.echo("deep.txt", "x").unwrap(), file);
        assert_eq!(service.ls(None).unwrap(), vec!["docs/"]);
        assert_eq!(service.cat("deep.txt").unwrap(), "x");
    }

    #[test]
    fn test_cat_missing() {
        let service = FileSystemViewService::new();
        assert_eq!(
            service.cat("nope"),
            Err(OperationError::FileNotFound("nope".to_string()))
        );
    }

    #[test]
    fn test_cat_does_not_search_upwards() {
        let mut service = FileSystemViewService::new();
        service.echo("top", "t").unwrap();
        service.mkdir("sub").unwrap();
        service.cd("sub").unwrap();
        assert!(service.cat("top").is_err());
    }

    #[test]
    fn test_grep_preorder_and_no_match() {
        let mut service = FileSystemViewService::new();
        service.mkdir("sub").unwrap();
        service.cd("sub").unwrap();
        service.echo("deep", "hello deep").unwrap();
        service.cd("/").unwrap();
        service.echo("top", "hello top").unwrap();
        service.echo("other", "bye").unwrap();

        let hits: Vec<String> = service
            .grep("hello")
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(hits, vec!["top: hello top", "deep: hello deep"]);

        assert_eq!(
            service.grep("zzz"),
            Err(OperationError::NoMatch("zzz".to_string()))
        );
    }

    #[test]
    fn test_cp_independent_copy() {
        let mut service = FileSystemViewService::new();
        service.mkdir("dst").unwrap();
        let original = service.echo("f", "data").unwrap();

        let copy = service.cp("f", "dst").unwrap();
        assert_ne!(copy, original);
        service.tree.append_content(copy, " changed").unwrap();

        assert_eq!(service.tree().content(original).unwrap(), "data");
        assert_eq!(service.tree().content(copy).unwrap(), "data changed");
    }

    #[test]
    fn test_cp_errors() {
        let mut service = FileSystemViewService::new();
        service.touch("f").unwrap();

        assert_eq!(
            service.cp("missing", "/"),
            Err(OperationError::FileNotFound("missing".to_string()))
        );
        assert_eq!(
            service.cp("f", "nowhere"),
            Err(OperationError::InvalidDestination("nowhere".to_string()))
        );
    }

    #[test]
    fn test_cp_into_same_directory_conflicts_when_strict() {
        let mut service = FileSystemViewService::new();
        service.touch("f").unwrap();
        assert!(matches!(
            service.cp("f", "/"),
            Err(OperationError::NameConflict(_))
        ));

        let mut service = lenient();
        service.touch("f").unwrap();
        service.cp("f", "/").unwrap();
        assert_eq!(service.ls(None).unwrap(), vec!["f", "f"]);
    }

    #[test]
    fn test_cp_source_is_not_searched_recursively() {
        let mut service = FileSystemViewService::new();
        service.mkdir("docs").unwrap();
        service.cd("docs").unwrap();
        service.touch("a").unwrap();
        service.cd("/").unwrap();

        assert!(service.cp("a", "/").is_err());
        assert!(service.cp("docs/a", "/").is_ok());
    }

    #[test]
    fn test_mv_relocates_from_actual_parent() {
        let mut service = FileSystemViewService::new();
        let docs = service.mkdir("docs").unwrap();
        service.mkdir("dst").unwrap();
        service.cd("docs").unwrap();
        let file = service.echo("a", "content").unwrap();
        service.cd("/").unwrap();

        assert_eq!(service.mv("docs/a", "dst").unwrap(), file);
        assert!(service.tree().children(docs).unwrap().is_empty());
        assert_eq!(service.ls(Some("dst")).unwrap(), vec!["a"]);
        assert_eq!(service.tree().content(file).unwrap(), "content");
    }

    #[test]
    fn test_mv_within_same_directory_is_noop() {
        let mut service = FileSystemViewService::new();
        service.touch("a").unwrap();
        service.touch("b").unwrap();

        service.mv("a", "/").unwrap();
        assert_eq!(service.ls(None).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_rm_file() {
        let mut service = FileSystemViewService::new();
        let file = service.touch("a").unwrap();
        let outcome = service.rm("a").unwrap();

        assert_eq!(outcome.kind, NodeType::File);
        assert_eq!(outcome.removed, 1);
        assert!(!outcome.current_reset);
        assert!(!service.tree().contains(file));
    }

    #[test]
    fn test_rm_directory_recursive() {
        let mut service = FileSystemViewService::new();
        service.mkdir("docs").unwrap();
        service.cd("docs").unwrap();
        service.mkdir("inner").unwrap();
        service.touch("x").unwrap();
        service.cd("/").unwrap();

        let outcome = service.rm("docs").unwrap();
        assert_eq!(outcome.kind, NodeType::Directory);
        assert_eq!(outcome.removed, 3);
        assert_eq!(
            PathResolver::resolve_directory(service.tree(), service.root(), "docs"),
            Err(PathError::NotFound("docs".to_string()))
        );
        assert_eq!(service.tree().len(), 1);
    }

    #[test]
    fn test_rm_prefers_file_over_directory() {
        let mut service = FileSystemViewService::new();
        service.mkdir("x").unwrap();
        service.touch("x").unwrap();

        assert_eq!(service.rm("x").unwrap().kind, NodeType::File);
        assert_eq!(service.ls(None).unwrap(), vec!["x/"]);
    }

    #[test]
    fn test_rm_trailing_slash_still_prefers_file() {
        let mut service = FileSystemViewService::new();
        service.mkdir("x").unwrap();
        service.touch("x").unwrap();

        assert_eq!(service.rm("x/").unwrap().kind, NodeType::File);
        assert_eq!(service.ls(None).unwrap(), vec!["x/"]);

        assert_eq!(service.rm("x/").unwrap().kind, NodeType::Directory);
        assert!(service.ls(None).unwrap().is_empty());
    }

    #[test]
    fn test_dot_dot_inside_path_is_a_plain_name() {
        let mut service = FileSystemViewService::new();
        service.mkdir("docs").unwrap();
        service.cd("docs").unwrap();

        assert!(service.cd("../docs").is_err());
        assert_eq!(service.current_name(), "docs");
        assert!(service.ls(Some("/docs/..")).is_err());
        assert!(matches!(
            service.mkdir(".."),
            Err(OperationError::InvalidName(_))
        ));
    }

    #[test]
    fn test_rm_ancestor_of_current_resets_to_root() {
        let mut service = FileSystemViewService::new();
        service.mkdir("a").unwrap();
        service.cd("a").unwrap();
        service.mkdir("b").unwrap();
        service.cd("b").unwrap();

        let outcome = service.rm("/a").unwrap();
        assert!(outcome.current_reset);
        assert_eq!(service.current_directory(), service.root());
        assert!(service
            .logger()
            .entries()
            .any(|e| e.level == LogLevel::Warn));
    }

    #[test]
    fn test_rm_root_and_missing() {
        let mut service = FileSystemViewService::new();
        assert!(matches!(
            service.rm("/"),
            Err(OperationError::InvalidOperation(_))
        ));
        assert_eq!(
            service.rm("ghost"),
            Err(OperationError::NotFound("ghost".to_string()))
        );
        assert_eq!(
            service.rm(""),
            Err(OperationError::NotFound(String::new()))
        );
    }

    #[test]
    fn test_failures_are_logged() {
        let mut service = lenient();
        service.mkdir("docs").unwrap();
        let _ = service.cd("missing");

        let entries = service.drain_logs();
        assert_eq!(entries[0].message, "mkdir");
        assert_eq!(entries[0].field("target"), Some("docs"));
        assert_eq!(entries[1].message, "cd failed");
        assert!(service.logger().is_empty());
    }
}
