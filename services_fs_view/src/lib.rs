//! # Filesystem View Service
//!
//! This service implements the namespace engine: shell-like operations over
//! the in-memory directory tree provided by `fs_view`.
//!
//! ## Philosophy
//!
//! - The engine exclusively owns the tree and the current directory
//! - Every failure is a value; a failed operation leaves the tree unchanged
//! - Lookups come in two flavours: direct child (cp, mv, rm) and whole
//!   subtree (cat, echo, grep)
//!
//! ## Operations
//!
//! - `mkdir(name)`, `touch(name)`: create in the current directory
//! - `cd(path)`, `ls(path)`, `pwd()`: navigate and list
//! - `echo(name, content)`, `cat(name)`, `grep(query)`: file content
//! - `cp(src, dst)`, `mv(src, dst)`, `rm(path)`: restructure
//! - `save_state(store)`, `load_state(store)`: whole-state persistence

pub mod operations;
pub mod service;
pub mod snapshot;

pub use operations::{FileSystemOperations, GrepMatch, OperationError, RemoveOutcome};
pub use service::{FileSystemViewService, NamePolicy, ServiceConfig};
pub use snapshot::FileSystemSnapshot;
