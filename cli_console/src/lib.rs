//! # CLI Console
//!
//! The command dispatcher: turns one input line into one namespace
//! operation and renders the outcome as text.
//!
//! It is a line-oriented console, NOT a POSIX shell: no pipes, no globbing,
//! no variables.

pub mod commands;
pub mod handler;

pub use commands::{CliCommand, CommandError, CommandParser};
pub use handler::{CommandHandler, Response};
