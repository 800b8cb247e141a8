//! # Console Commands
//!
//! Parses one input line into a [`CliCommand`].
//!
//! ## Command Set
//!
//! - `mkdir <directory_name>`
//! - `cd <path>`
//! - `ls [path]`
//! - `pwd`
//! - `touch <file_name>`
//! - `echo <file_name> <content>` - content is the rest of the line
//! - `cat <file_name>`
//! - `grep <search_string>`
//! - `cp <source_path> <destination_path>`
//! - `mv <source_path> <destination_path>`
//! - `rm <path>`
//! - `save [state_file]`
//! - `help`
//! - `exit`
//!
//! Surrounding double quotes are stripped from echo content and grep
//! queries; whitespace inside the quotes is kept.

use thiserror::Error;

/// Command parse errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("{0}")]
    Usage(&'static str),

    #[error("Unknown command: {0}. Type 'help' for a list of commands.")]
    UnknownCommand(String),
}

/// Console commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Mkdir { name: String },
    Cd { path: String },
    Ls { path: Option<String> },
    Pwd,
    Touch { name: String },
    Echo { name: String, content: String },
    Cat { name: String },
    Grep { query: String },
    Cp { source: String, destination: String },
    Mv { source: String, destination: String },
    Rm { path: String },
    /// Persist the whole state, optionally to a different file
    Save { path: Option<String> },
    Help,
    Exit,
}

pub const MKDIR_USAGE: &str = "Usage: mkdir <directory_name>";
pub const CD_USAGE: &str = "Usage: cd <path>";
pub const TOUCH_USAGE: &str = "Usage: touch <file_name>";
pub const ECHO_USAGE: &str = "Usage: echo <file_name> <content>";
pub const CAT_USAGE: &str = "Usage: cat <file_name>";
pub const GREP_USAGE: &str = "Usage: grep <search_string>";
pub const CP_USAGE: &str = "Usage: cp <source_path> <destination_path>";
pub const MV_USAGE: &str = "Usage: mv <source_path> <destination_path>";
pub const RM_USAGE: &str = "Usage: rm <path>";

/// One line per command, shown by `help`
pub const HELP_LINES: &[&str] = &[
    "mkdir <directory_name>                 create a directory",
    "cd <path>                              change directory (/, .., relative, absolute)",
    "ls [path]                              list a directory",
    "pwd                                    print the current directory path",
    "touch <file_name>                      create an empty file",
    "echo <file_name> <content>             append to a file, creating it if needed",
    "cat <file_name>                        print a file",
    "grep <search_string>                   search file contents below here",
    "cp <source_path> <destination_path>    copy a file into a directory",
    "mv <source_path> <destination_path>    move a file into a directory",
    "rm <path>                              remove a file or a directory tree",
    "save [state_file]                      save the file system state",
    "help                                   show this list",
    "exit                                   quit without saving",
];

/// Console command parser
pub struct CommandParser;

impl CommandParser {
    /// Parses a command line
    pub fn parse(input: &str) -> Result<CliCommand, CommandError> {
        let input = input.trim();

        if input.is_empty() {
            return Err(CommandError::Empty);
        }

        let (cmd, rest) = match input.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (input, ""),
        };

        match cmd {
            "mkdir" => Self::required(rest, MKDIR_USAGE).map(|name| CliCommand::Mkdir { name }),
            "cd" => Self::required(rest, CD_USAGE).map(|path| CliCommand::Cd { path }),
            "ls" => Ok(CliCommand::Ls {
                path: Self::optional(rest),
            }),
            "pwd" => Ok(CliCommand::Pwd),
            "touch" => Self::required(rest, TOUCH_USAGE).map(|name| CliCommand::Touch { name }),
            "echo" => Self::parse_echo(rest),
            "cat" => Self::required(rest, CAT_USAGE).map(|name| CliCommand::Cat { name }),
            "grep" => Self::required(rest, GREP_USAGE).map(|query| CliCommand::Grep {
                query: Self::unquote(&query).to_string(),
            }),
            "cp" => Self::parse_pair(rest, CP_USAGE).map(|(source, destination)| CliCommand::Cp {
                source,
                destination,
            }),
            "mv" => Self::parse_pair(rest, MV_USAGE).map(|(source, destination)| CliCommand::Mv {
                source,
                destination,
            }),
            "rm" => Self::required(rest, RM_USAGE).map(|path| CliCommand::Rm { path }),
            "save" => Ok(CliCommand::Save {
                path: Self::optional(rest),
            }),
            "help" => Ok(CliCommand::Help),
            "exit" => Ok(CliCommand::Exit),
            _ => Err(CommandError::UnknownCommand(cmd.to_string())),
        }
    }

    fn required(rest: &str, usage: &'static str) -> Result<String, CommandError> {
        if rest.is_empty() {
            Err(CommandError::Usage(usage))
        } else {
            Ok(rest.to_string())
        }
    }

    fn optional(rest: &str) -> Option<String> {
        (!rest.is_empty()).then(|| rest.to_string())
    }

    /// Parses `echo <name> <content...>`; content may be empty
    fn parse_echo(rest: &str) -> Result<CliCommand, CommandError> {
        if rest.is_empty() {
            return Err(CommandError::Usage(ECHO_USAGE));
        }

        let (name, content) = match rest.split_once(char::is_whitespace) {
            Some((name, content)) => (name, content.trim()),
            None => (rest, ""),
        };

        Ok(CliCommand::Echo {
            name: name.to_string(),
            content: Self::unquote(content).to_string(),
        })
    }

    /// Parses exactly two whitespace-separated arguments
    fn parse_pair(rest: &str, usage: &'static str) -> Result<(String, String), CommandError> {
        let args: Vec<&str> = rest.split_whitespace().collect();
        match args.as_slice() {
            [first, second] => Ok((first.to_string(), second.to_string())),
            _ => Err(CommandError::Usage(usage)),
        }
    }

    /// Strips one pair of surrounding double quotes
    fn unquote(text: &str) -> &str {
        if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
            &text[1..text.len() - 1]
        } else {
            text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mkdir() {
        assert_eq!(
            CommandParser::parse("mkdir docs").unwrap(),
            CliCommand::Mkdir {
                name: "docs".to_string()
            }
        );
    }

    #[test]
    fn test_parse_mkdir_missing_name() {
        assert_eq!(
            CommandParser::parse("mkdir"),
            Err(CommandError::Usage(MKDIR_USAGE))
        );
    }

    #[test]
    fn test_parse_ls_optional_path() {
        assert_eq!(
            CommandParser::parse("ls").unwrap(),
            CliCommand::Ls { path: None }
        );
        assert_eq!(
            CommandParser::parse("ls /docs").unwrap(),
            CliCommand::Ls {
                path: Some("/docs".to_string())
            }
        );
    }

    #[test]
    fn test_parse_echo_keeps_rest_of_line() {
        assert_eq!(
            CommandParser::parse("echo a.txt hello   big world").unwrap(),
            CliCommand::Echo {
                name: "a.txt".to_string(),
                content: "hello   big world".to_string()
            }
        );
    }

    #[test]
    fn test_parse_echo_quoted_content_keeps_spaces() {
        assert_eq!(
            CommandParser::parse("echo a.txt \"hello \"").unwrap(),
            CliCommand::Echo {
                name: "a.txt".to_string(),
                content: "hello ".to_string()
            }
        );
    }

    #[test]
    fn test_parse_echo_without_content() {
        assert_eq!(
            CommandParser::parse("echo a.txt").unwrap(),
            CliCommand::Echo {
                name: "a.txt".to_string(),
                content: String::new()
            }
        );
        assert_eq!(
            CommandParser::parse("echo"),
            Err(CommandError::Usage(ECHO_USAGE))
        );
    }

    #[test]
    fn test_parse_grep_unquotes() {
        assert_eq!(
            CommandParser::parse("grep \"hello\"").unwrap(),
            CliCommand::Grep {
                query: "hello".to_string()
            }
        );
        assert_eq!(
            CommandParser::parse("grep two words").unwrap(),
            CliCommand::Grep {
                query: "two words".to_string()
            }
        );
    }

    #[test]
    fn test_parse_cp_arity() {
        assert_eq!(
            CommandParser::parse("cp a.txt /docs").unwrap(),
            CliCommand::Cp {
                source: "a.txt".to_string(),
                destination: "/docs".to_string()
            }
        );
        assert_eq!(
            CommandParser::parse("cp a.txt"),
            Err(CommandError::Usage(CP_USAGE))
        );
        assert_eq!(
            CommandParser::parse("cp a b c"),
            Err(CommandError::Usage(CP_USAGE))
        );
    }

    #[test]
    fn test_parse_mv_arity() {
        assert_eq!(
            CommandParser::parse("mv"),
            Err(CommandError::Usage(MV_USAGE))
        );
        assert!(matches!(
            CommandParser::parse("mv x y").unwrap(),
            CliCommand::Mv { .. }
        ));
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(CommandParser::parse("exit").unwrap(), CliCommand::Exit);
        assert_eq!(CommandParser::parse("help").unwrap(), CliCommand::Help);
        assert_eq!(CommandParser::parse("pwd").unwrap(), CliCommand::Pwd);
        assert_eq!(
            CommandParser::parse("save").unwrap(),
            CliCommand::Save { path: None }
        );
    }

    #[test]
    fn test_parse_whitespace_handling() {
        assert_eq!(
            CommandParser::parse("  cd \t docs  ").unwrap(),
            CliCommand::Cd {
                path: "docs".to_string()
            }
        );
    }

    #[test]
    fn test_parse_empty_command() {
        assert_eq!(CommandParser::parse("   "), Err(CommandError::Empty));
    }

    #[test]
    fn test_parse_unknown_command() {
        let err = CommandParser::parse("format c:").unwrap_err();
        assert_eq!(err, CommandError::UnknownCommand("format".to_string()));
        assert!(err.to_string().contains("Type 'help'"));
    }

    #[test]
    fn test_unquote_only_strips_matching_pair() {
        assert_eq!(CommandParser::unquote("\"x\""), "x");
        assert_eq!(CommandParser::unquote("\"x"), "\"x");
        assert_eq!(CommandParser::unquote("\""), "\"");
        assert_eq!(CommandParser::unquote("plain"), "plain");
    }
}
