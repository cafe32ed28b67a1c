//! Error types for rescue-core

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in rescue-core
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to enumerate a directory
    #[error("failed to read directory '{path}': {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Failed to create a destination directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The filesystem rejected a move
    #[error("failed to move '{from}' to '{to}': {source}")]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file with the same name is already at the destination
    #[error("cannot move '{from}': destination '{to}' already exists")]
    DestinationExists { from: PathBuf, to: PathBuf },

    /// File content is not valid in the configured encoding
    #[error("failed to decode '{path}' as {encoding}")]
    Decode {
        path: PathBuf,
        encoding: &'static str,
    },

    /// Output contains characters the configured encoding cannot represent
    #[error("failed to encode '{path}' as {encoding}")]
    Encode {
        path: PathBuf,
        encoding: &'static str,
    },

    /// Failed to parse CSV
    #[error("failed to parse CSV '{path}': {message}")]
    CsvParse { path: PathBuf, message: String },

    /// CSV error from the csv crate
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Encoding label not known to encoding_rs
    #[error("unknown encoding label: {0}")]
    UnknownEncoding(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse grouping of errors, used when summarizing failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Reading, writing or listing failed
    Io,
    /// A file could not be relocated
    Move,
    /// Content could not be decoded or parsed as delimited text
    Parse,
    /// Configuration could not be read or understood
    Config,
}

impl Error {
    /// Classify this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::MoveFailed { .. } | Error::DestinationExists { .. } => ErrorCategory::Move,
            Error::Decode { .. }
            | Error::Encode { .. }
            | Error::CsvParse { .. }
            | Error::Csv { .. } => ErrorCategory::Parse,
            Error::UnknownEncoding(_) | Error::Json(_) => ErrorCategory::Config,
            Error::FileRead { .. }
            | Error::FileWrite { .. }
            | Error::DirectoryRead { .. }
            | Error::CreateDir { .. }
            | Error::Io(_) => ErrorCategory::Io,
        }
    }

    /// Whether the content, rather than the filesystem, was at fault
    pub fn is_parse_error(&self) -> bool {
        self.category() == ErrorCategory::Parse
    }
}
