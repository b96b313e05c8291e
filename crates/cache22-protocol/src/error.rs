use cache22_store::StoreError;
use thiserror::Error;

/// Failures reported back to the client as an `ERROR:` line.
///
/// None of these close the connection or reach other connections.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Please enter a command.")]
    EmptyCommand,

    #[error("Unknown command '{0}'. Type QUIT to exit.")]
    UnknownCommand(String),

    #[error("GET command requires a path and a key. Usage: GET <path> <key>")]
    GetUsage,

    #[error("PUT command requires a path and a key=value pair. Usage: PUT <path> <key>=<value>")]
    PutUsage,

    #[error("PUT value must be in key=value format.")]
    MissingDelimiter,

    #[error("Key or Value cannot be empty in PUT command.")]
    EmptyKeyOrValue,

    #[error("CD command requires a path. Usage: CD <path>")]
    CdUsage,

    #[error("Path and key must be valid UTF-8.")]
    InvalidUtf8,

    #[error("Path '{0}' not found.")]
    PathNotFound(String),

    #[error("Key '{key}' not found in path '{path}'.")]
    KeyNotFound { key: String, path: String },

    #[error("{0}")]
    Store(#[from] StoreError),
}

pub type CommandResult<T> = Result<T, CommandError>;
