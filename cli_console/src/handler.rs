//! CLI command handler
//!
//! Executes parsed commands against the filesystem view service and turns
//! every result, including failures, into output lines.

use crate::commands::{CliCommand, CommandError, CommandParser, HELP_LINES};
use services_fs_view::{FileSystemOperations, FileSystemViewService};
use services_storage::{FileStateStore, StateStore};

/// Result of executing one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Lines to print
    Output(Vec<String>),
    /// The session should end now, without saving
    Exit,
}

impl Response {
    fn line(text: impl Into<String>) -> Self {
        Response::Output(vec![text.into()])
    }

    fn empty() -> Self {
        Response::Output(Vec::new())
    }

    /// Output lines, empty for [`Response::Exit`]
    pub fn lines(&self) -> &[String] {
        match self {
            Response::Output(lines) => lines,
            Response::Exit => &[],
        }
    }
}

/// CLI Command handler
pub struct CommandHandler {
    /// Filesystem view service
    service: FileSystemViewService,
    /// Where `save` writes by default
    store: Box<dyn StateStore>,
}

impl CommandHandler {
    /// Creates a handler over `service`, saving to `store`
    pub fn new(service: FileSystemViewService, store: Box<dyn StateStore>) -> Self {
        Self { service, store }
    }

    pub fn service(&self) -> &FileSystemViewService {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut FileSystemViewService {
        &mut self.service
    }

    /// Prompt shown before each read: `<current directory name>> `
    pub fn prompt(&self) -> String {
        format!("{}> ", self.service.current_name())
    }

    /// Parses and executes one input line
    pub fn execute_line(&mut self, line: &str) -> Response {
        match CommandParser::parse(line) {
            Ok(command) => self.execute(command),
            Err(CommandError::Empty) => Response::empty(),
            Err(err) => Response::line(err.to_string()),
        }
    }

    /// Executes a parsed command
    pub fn execute(&mut self, command: CliCommand) -> Response {
        match command {
            CliCommand::Mkdir { name } => Self::silent(self.service.mkdir(&name)),
            CliCommand::Cd { path } => match self.service.cd(&path) {
                Ok(_) => Response::line(format!(
                    "Current directory: {}",
                    self.service.current_name()
                )),
                Err(err) => Response::line(err.to_string()),
            },
            CliCommand::Ls { path } => match self.service.ls(path.as_deref()) {
                Ok(names) => Response::line(names.join(" ")),
                Err(err) => Response::line(err.to_string()),
            },
            CliCommand::Pwd => Response::line(self.service.pwd()),
            CliCommand::Touch { name } => Self::silent(self.service.touch(&name)),
            CliCommand::Echo { name, content } => Self::silent(self.service.echo(&name, &content)),
            CliCommand::Cat { name } => match self.service.cat(&name) {
                Ok(content) => Response::line(content),
                Err(err) => Response::line(err.to_string()),
            },
            CliCommand::Grep { query } => match self.service.grep(&query) {
                Ok(matches) => Response::Output(matches.iter().map(ToString::to_string).collect()),
                Err(err) => Response::line(err.to_string()),
            },
            CliCommand::Cp {
                source,
                destination,
            } => Self::silent(self.service.cp(&source, &destination)),
            CliCommand::Mv {
                source,
                destination,
            } => Self::silent(self.service.mv(&source, &destination)),
            CliCommand::Rm { path } => match self.service.rm(&path) {
                Ok(outcome) if outcome.current_reset => {
                    Response::line("Current directory was removed; returned to /")
                }
                Ok(_) => Response::empty(),
                Err(err) => Response::line(err.to_string()),
            },
            CliCommand::Save { path } => self.save(path.as_deref()),
            CliCommand::Help => {
                Response::Output(HELP_LINES.iter().map(|line| line.to_string()).collect())
            }
            CliCommand::Exit => Response::Exit,
        }
    }

    fn save(&mut self, path: Option<&str>) -> Response {
        let override_store = path.map(FileStateStore::new);
        let store: &dyn StateStore = match &override_store {
            Some(store) => store,
            None => self.store.as_ref(),
        };

        match self.service.save_state(store) {
            Ok(()) => Response::line(format!(
                "File system state saved successfully to {}",
                store.describe()
            )),
            Err(err) => Response::line(format!("Error saving file system state: {}", err)),
        }
    }

    fn silent<T, E: std::fmt::Display>(result: Result<T, E>) -> Response {
        match result {
            Ok(_) => Response::empty(),
            Err(err) => Response::line(err.to_string()),
        }
    }
}
