//! Whole-state snapshots
//!
//! A snapshot captures the tree together with the current directory so that
//! a restored service is indistinguishable from the one that was saved.

use crate::operations::OperationError;
use crate::service::{FileSystemViewService, ServiceConfig};
use fs_view::{DirectoryTree, NodeId, TreeError};
use serde::{Deserialize, Serialize};
use services_logger::{LogEntry, LogLevel};
use services_storage::StateStore;

/// Serializable state of a [`FileSystemViewService`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSystemSnapshot {
    /// The full directory tree
    pub tree: DirectoryTree,
    /// Current directory at the time of the snapshot
    pub current: NodeId,
}

impl FileSystemSnapshot {
    /// Checks tree invariants and that `current` is an attached directory
    pub fn validate(&self) -> Result<(), TreeError> {
        self.tree.validate()?;

        let current = self
            .tree
            .get(self.current)
            .ok_or(TreeError::UnknownNode(self.current))?;
        if !current.is_directory() {
            return Err(TreeError::NotADirectory(self.current));
        }
        if !self.tree.is_reachable(self.current) {
            return Err(TreeError::Corrupt(
                "current directory is detached".to_string(),
            ));
        }
        Ok(())
    }
}

impl FileSystemViewService {
    /// Captures the current state
    pub fn snapshot(&self) -> FileSystemSnapshot {
        FileSystemSnapshot {
            tree: self.tree().clone(),
            current: self.current_directory(),
        }
    }

    /// Rebuilds a service from a snapshot after validating it
    pub fn from_snapshot(
        snapshot: FileSystemSnapshot,
        config: ServiceConfig,
    ) -> Result<Self, OperationError> {
        snapshot.validate()?;
        Ok(Self::from_parts(snapshot.tree, snapshot.current, config))
    }

    /// Writes the whole state to `store`
    pub fn save_state(&mut self, store: &dyn StateStore) -> Result<(), OperationError> {
        let result = services_storage::save_to(store, &self.snapshot());
        let entry = match &result {
            Ok(()) => LogEntry::new(LogLevel::Info, "state saved"),
            Err(err) => LogEntry::new(LogLevel::Error, "state save failed").with_field("error", err),
        };
        self.logger_mut()
            .log(entry.with_field("store", store.describe()));
        result.map_err(OperationError::from)
    }

    /// Restores a service from `store`
    pub fn load_state(
        store: &dyn StateStore,
        config: ServiceConfig,
    ) -> Result<Self, OperationError> {
        let snapshot: FileSystemSnapshot = services_storage::load_from(store)?;
        let mut service = Self::from_snapshot(snapshot, config)?;
        service.logger_mut().log(
            LogEntry::new(LogLevel::Info, "state loaded").with_field("store", store.describe()),
        );
        Ok(service)
    }

    /// Restores from `store`, falling back to a fresh tree on any failure
    ///
    /// The second value is the failure that forced the fallback, if any.
    pub fn load_or_new(
        store: &dyn StateStore,
        config: ServiceConfig,
    ) -> (Self, Option<OperationError>) {
        match Self::load_state(store, config) {
            Ok(service) => (service, None),
            Err(err) => {
                let mut service = Self::with_config(config);
                service.logger_mut().log(
                    LogEntry::new(LogLevel::Warn, "could not load state; starting empty")
                        .with_field("store", store.describe())
                        .with_field("error", &err),
                );
                (service, Some(err))
            }
        }
    }
}
