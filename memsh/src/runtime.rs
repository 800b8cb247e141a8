//! # Host Runtime
//!
//! The main loop that ties everything together.

use cli_console::{CommandHandler, Response};
use services_fs_view::{FileSystemViewService, NamePolicy, ServiceConfig};
use services_logger::LogLevel;
use services_storage::FileStateStore;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use thiserror::Error;

/// Default name of the state file
pub const DEFAULT_STATE_FILE: &str = "filesystem_state.ser";

/// Host runtime error types
#[derive(Debug, Error)]
pub enum HostRuntimeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Host runtime configuration
#[derive(Debug, Clone)]
pub struct HostRuntimeConfig {
    /// File used by `save` and by startup restore
    pub state_file: PathBuf,
    /// Whether to restore from `state_file` at startup
    pub load_state: bool,
    /// Optional script of commands, one per line, used instead of stdin
    pub script: Option<String>,
    /// Maximum commands to run (0 = unlimited)
    pub max_steps: usize,
    /// Minimum level written to the diagnostics stream
    pub log_level: LogLevel,
    /// Sibling name collision handling
    pub name_policy: NamePolicy,
}

impl Default for HostRuntimeConfig {
    fn default() -> Self {
        Self {
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            load_state: false,
            script: None,
            max_steps: 0,
            log_level: LogLevel::Warn,
            name_policy: NamePolicy::Strict,
        }
    }
}

/// Why a session stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The `exit` command
    Exit,
    /// Input ran out
    EndOfInput,
    /// `max_steps` commands were executed
    StepLimit,
}

/// Host runtime
pub struct HostRuntime {
    /// Configuration
    config: HostRuntimeConfig,
    /// Command dispatcher owning the engine
    handler: CommandHandler,
    /// Messages produced while starting up
    startup_messages: Vec<String>,
    /// Step counter
    steps: usize,
}

impl HostRuntime {
    /// Creates a new host runtime
    ///
    /// When `load_state` is set, a state that cannot be read or decoded is
    /// reported and replaced by a fresh, empty tree.
    pub fn new(config: HostRuntimeConfig) -> Self {
        let service_config = ServiceConfig {
            name_policy: config.name_policy,
            log_level: config.log_level,
        };
        let store = FileStateStore::new(config.state_file.clone());

        let mut startup_messages = Vec::new();
        let service = if config.load_state {
            let (service, failure) = FileSystemViewService::load_or_new(&store, service_config);
            match failure {
                None => startup_messages.push(format!(
                    "File system state loaded successfully from {}",
                    store.path().display()
                )),
                Some(err) => {
                    startup_messages.push(format!("Error loading file system state: {}", err));
                    startup_messages.push("Creating a new file system.".to_string());
                }
            }
            service
        } else {
            startup_messages.push("Creating a new file system.".to_string());
            FileSystemViewService::with_config(service_config)
        };

        Self {
            config,
            handler: CommandHandler::new(service, Box::new(store)),
            startup_messages,
            steps: 0,
        }
    }

    /// Runs over the configured script, or stdin when there is none
    pub fn run(&mut self) -> Result<SessionEnd, HostRuntimeError> {
        let stdout = io::stdout();
        let stderr = io::stderr();

        match self.config.script.clone() {
            Some(script) => {
                self.run_with(script.as_bytes(), &mut stdout.lock(), &mut stderr.lock())
            }
            None => {
                let stdin = io::stdin();
                let mut input = stdin.lock();
                self.run_with(&mut input, &mut stdout.lock(), &mut stderr.lock())
            }
        }
    }

    /// Runs the prompt/read/dispatch/print loop over arbitrary streams
    ///
    /// Command output goes to `output`; engine log entries at or above the
    /// configured level go to `diagnostics`.
    pub fn run_with<R: BufRead, W: Write, D: Write>(
        &mut self,
        mut input: R,
        output: &mut W,
        diagnostics: &mut D,
    ) -> Result<SessionEnd, HostRuntimeError> {
        let echo_input = self.config.script.is_some();

        for message in self.startup_messages.drain(..) {
            writeln!(output, "{}", message)?;
        }
        Self::flush_logs(&mut self.handler, diagnostics)?;

        let mut line = String::new();
        loop {
            if self.config.max_steps > 0 && self.steps >= self.config.max_steps {
                return Ok(SessionEnd::StepLimit);
            }

            write!(output, "{}", self.handler.prompt())?;
            output.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                return Ok(SessionEnd::EndOfInput);
            }
            if echo_input {
                writeln!(output, "{}", line.trim_end())?;
            }

            self.steps += 1;
            let response = self.handler.execute_line(&line);
            Self::flush_logs(&mut self.handler, diagnostics)?;

            match response {
                Response::Exit => return Ok(SessionEnd::Exit),
                Response::Output(lines) => {
                    for text in lines {
                        writeln!(output, "{}", text)?;
                    }
                }
            }
        }
    }

    fn flush_logs<D: Write>(handler: &mut CommandHandler, diagnostics: &mut D) -> io::Result<()> {
        for entry in handler.service_mut().drain_logs() {
            writeln!(diagnostics, "{}", entry)?;
        }
        Ok(())
    }

    pub fn step_count(&self) -> usize {
        self.steps
    }

    pub fn handler(&self) -> &CommandHandler {
        &self.handler
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_script(config: HostRuntimeConfig, script: &str) -> (String, String, SessionEnd) {
        let mut runtime = HostRuntime::new(config);
        let mut out = Vec::new();
        let mut diag = Vec::new();
        let end = runtime
            .run_with(script.as_bytes(), &mut out, &mut diag)
            .unwrap();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(diag).unwrap(),
            end,
        )
    }

    #[test]
    fn test_runtime_creation() {
        let runtime = HostRuntime::new(HostRuntimeConfig::default());
        assert_eq!(runtime.step_count(), 0);
        assert_eq!(runtime.handler().prompt(), "/> ");
    }

    #[test]
    fn test_runtime_exit_stops_reading() {
        let (out, _, end) = run_script(
            HostRuntimeConfig::default(),
            "mkdir docs\nexit\nmkdir never\n",
        );
        assert_eq!(end, SessionEnd::Exit);
        assert!(out.starts_with("Creating a new file system.\n/> "));
    }

    #[test]
    fn test_runtime_end_of_input() {
        let (_, _, end) = run_script(HostRuntimeConfig::default(), "ls\n");
        assert_eq!(end, SessionEnd::EndOfInput);
    }

    #[test]
    fn test_runtime_max_steps() {
        let config = HostRuntimeConfig {
            max_steps: 2,
            ..HostRuntimeConfig::default()
        };
        let mut runtime = HostRuntime::new(config);
        let mut out = Vec::new();
        let end = runtime
            .run_with("ls\nls\nls\n".as_bytes(), &mut out, &mut io::sink())
            .unwrap();

        assert_eq!(end, SessionEnd::StepLimit);
        assert_eq!(runtime.step_count(), 2);
    }

    #[test]
    fn test_runtime_routes_logs_to_diagnostics() {
        let config = HostRuntimeConfig {
            log_level: LogLevel::Debug,
            ..HostRuntimeConfig::default()
        };
        let (out, diag, _) = run_script(config, "mkdir docs\n");

        assert!(diag.contains("[DEBUG] fs_view: mkdir target=docs"));
        assert!(!out.contains("DEBUG"));
    }
}
