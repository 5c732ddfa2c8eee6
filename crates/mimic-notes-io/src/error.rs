use std::io;
use std::path::PathBuf;

use thiserror::Error;

use mimic_notes_core::error::Error as CoreError;

/// Result type local to mimic-notes-io.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("expected file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("invalid gzip stream in {}: {source}", path.display())]
    Decompress {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSV parse error in {} at line {line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: u64,
        message: String,
    },

    #[error("schema error: {0}")]
    Schema(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Coarse taxonomy for callers that branch on the failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    NotFound,
    Decompression,
    Parse,
    Schema,
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) => ErrorKind::Configuration,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::Decompress { .. } => ErrorKind::Decompression,
            Error::Parse { .. } => ErrorKind::Parse,
            Error::Schema(_) => ErrorKind::Schema,
            Error::Io(_) | Error::Json(_) | Error::Internal(_) => ErrorKind::Io,
        }
    }
}

impl From<CoreError> for Error {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Config(m) => Error::Config(m),
            CoreError::Schema(m) => Error::Schema(m),
            CoreError::Hash(m) => Error::Internal(m),
        }
    }
}
