//! services/client/src/shell/protocol.rs
//!
//! Defines the line-based command protocol between the user and the shell.

use std::path::PathBuf;

/// Matches the backend's own default for `/chat/history`.
pub const DEFAULT_HISTORY_LIMIT: u32 = 50;

pub const HELP: &str = "\
Commands:
  ask <question>     ask a question about the uploaded documents
  history [n]        show the last n stored exchanges (default 50)
  upload <path.pdf>  upload and index one PDF document
  list               refresh the document list
  delete <id>        delete a document (asks for confirmation)
  stats              show totals over all documents
  dismiss            close the current alert
  help               show this message
  quit               leave the shell";

/// Represents the commands a user can type into the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Submits a question. Blank questions are passed through and ignored
    /// by the chat controller.
    Ask(String),

    /// Shows stored exchanges from the backend, newest first. Display only.
    History(u32),

    /// Uploads the file at the given path. `None` means no file was given.
    Upload(Option<PathBuf>),

    /// Re-fetches the document list.
    List,

    /// Deletes the document with the given id.
    Delete(String),

    Stats,

    /// The alert's close control.
    Dismiss,

    Help,

    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command '{0}', type 'help' for a list")]
    Unknown(String),
    #[error("'{0}' needs {1}")]
    MissingArgument(&'static str, &'static str),
    #[error("'{0}' expects {1}, got '{2}'")]
    InvalidArgument(&'static str, &'static str, String),
}

impl Command {
    /// Parses one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        let command = match verb.to_ascii_lowercase().as_str() {
            "ask" => Command::Ask(rest.to_string()),
            "history" => {
                if rest.is_empty() {
                    Command::History(DEFAULT_HISTORY_LIMIT)
                } else {
                    match rest.parse::<u32>() {
                        Ok(limit) if limit > 0 => Command::History(limit),
                        _ => {
                            return Err(CommandError::InvalidArgument(
                                "history",
                                "a positive number",
                                rest.to_string(),
                            ))
                        }
                    }
                }
            }
            "upload" => Command::Upload((!rest.is_empty()).then(|| PathBuf::from(rest))),
            "list" | "ls" => Command::List,
            "delete" | "rm" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument("delete", "a document id"));
                }
                Command::Delete(rest.to_string())
            }
            "stats" => Command::Stats,
            "dismiss" => Command::Dismiss,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}
