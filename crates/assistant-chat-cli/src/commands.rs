//! Slash commands typed into the chat input.

use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

/// Short reference shown by `/help`.
pub const HELP_TEXT: &str = "/files  /upload <path> [metadata-json]  /refs  /citations  /new  /quit";

/// A command entered in place of a chat message.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Reload and show the assistant's files.
    Files,
    /// Upload a local file, optionally with JSON metadata.
    Upload {
        /// Path of the file to send.
        path: PathBuf,
        /// Metadata attached to the upload.
        metadata: Option<Value>,
    },
    /// Show every file cited this session.
    Refs,
    /// Toggle citations under replies.
    Citations,
    /// Start a new conversation.
    New,
    /// Show the command list.
    Help,
    /// Leave the application.
    Quit,
}

/// Why a command could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The name after `/` is not a command.
    #[error("unknown command /{0} (try /help)")]
    Unknown(String),

    /// `/upload` without a path.
    #[error("usage: /upload <path> [metadata-json]")]
    MissingPath,

    /// The metadata after the path is not JSON.
    #[error("metadata is not valid JSON: {0}")]
    InvalidMetadata(String),
}

/// Parse `input` as a command.
///
/// Returns `None` for ordinary chat text, i.e. anything not starting with `/`.
#[must_use]
pub fn parse(input: &str) -> Option<Result<Command, CommandError>> {
    let rest = input.trim().strip_prefix('/')?;
    let (name, args) = rest
        .split_once(char::is_whitespace)
        .map_or((rest, ""), |(name, args)| (name, args.trim()));

    Some(match name {
        "files" => Ok(Command::Files),
        "upload" => parse_upload(args),
        "refs" => Ok(Command::Refs),
        "citations" => Ok(Command::Citations),
        "new" => Ok(Command::New),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    })
}

/// `<path> [metadata-json]`; the metadata starts at the first `{`.
fn parse_upload(args: &str) -> Result<Command, CommandError> {
    let (path, metadata) = match args.find('{') {
        Some(idx) => (args[..idx].trim(), Some(&args[idx..])),
        None => (args, None),
    };
    if path.is_empty() {
        return Err(CommandError::MissingPath);
    }

    let metadata = metadata
        .map(serde_json::from_str::<Value>)
        .transpose()
        .map_err(|e| CommandError::InvalidMetadata(e.to_string()))?;

    Ok(Command::Upload {
        path: PathBuf::from(path),
        metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_text_is_not_a_command() {
        assert!(parse("what does the manual say?").is_none());
        assert!(parse("").is_none());
    }

    #[test]
    fn parses_simple_commands() {
        assert_eq!(parse("/files"), Some(Ok(Command::Files)));
        assert_eq!(parse("  /refs  "), Some(Ok(Command::Refs)));
        assert_eq!(parse("/new"), Some(Ok(Command::New)));
        assert_eq!(parse("/exit"), Some(Ok(Command::Quit)));
        assert_eq!(parse("/citations"), Some(Ok(Command::Citations)));
    }

    #[test]
    fn upload_takes_path_and_metadata() {
        assert_eq!(
            parse("/upload docs/manual.pdf"),
            Some(Ok(Command::Upload {
                path: PathBuf::from("docs/manual.pdf"),
                metadata: None,
            }))
        );
        assert_eq!(
            parse(r#"/upload my notes.txt {"team": "docs"}"#),
            Some(Ok(Command::Upload {
                path: PathBuf::from("my notes.txt"),
                metadata: Some(json!({"team": "docs"})),
            }))
        );
    }

    #[test]
    fn upload_errors() {
        assert_eq!(parse("/upload"), Some(Err(CommandError::MissingPath)));
        assert_eq!(
            parse(r#"/upload {"a": 1}"#),
            Some(Err(CommandError::MissingPath))
        );
        assert!(matches!(
            parse("/upload a.txt {not json"),
            Some(Err(CommandError::InvalidMetadata(_)))
        ));
    }

    #[test]
    fn unknown_command() {
        assert_eq!(
            parse("/frobnicate now"),
            Some(Err(CommandError::Unknown("frobnicate".to_string())))
        );
    }
}
