use std::path::PathBuf;
use thiserror::Error;

/// Startup failures. Any of these ends the process before the terminal is touched.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read reference file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown word list `{name}` (available: {available})")]
    UnknownWordList { name: String, available: String },

    #[error("word list `{name}` is malformed: {source}")]
    MalformedWordList {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("reference text is empty")]
    EmptyReference,

    #[error("cannot open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// A keystroke or tick that the current session state cannot accept.
///
/// Callers treat these as no-ops; they never surface to the user.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum InvalidState {
    #[error("session already complete")]
    SessionComplete,

    #[error("cursor is at the start of the text")]
    AtStart,
}
