//! # memsh Host Runtime
//!
//! This crate provides the interactive host for the in-memory file system.
//!
//! ## Responsibilities
//!
//! The host runtime:
//! - Builds the namespace engine, restoring saved state on request
//! - Runs the prompt/read/dispatch/print loop
//! - Routes engine log entries to a diagnostics stream
//! - Remains testable by running over any reader and writer
//!
//! ## Non-Responsibilities
//!
//! The host does NOT:
//! - Save state on exit (only the `save` command persists)
//! - Provide terminal emulation or line editing
//! - Implement a shell with pipes or job control

pub mod runtime;

pub use runtime::{HostRuntime, HostRuntimeConfig, HostRuntimeError, SessionEnd};
