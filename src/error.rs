// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can abort a batch run.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("No input file present in input data directory {}", .dir.display())]
    NoInput { dir: PathBuf },

    #[error("no address rows found in supported files under {}", .dir.display())]
    NoRows { dir: PathBuf },

    /// `row` is 1-based over the concatenated table.
    #[error("row {row} is not a valid address query: {reason}")]
    SchemaValidation { row: usize, reason: String },

    #[error("Exception while parsing the address")]
    RemoteFailure {
        #[source]
        cause: RemoteCause,
    },

    #[error("invalid endpoint URL {url:?}: {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to read spreadsheet {}: {message}", .path.display())]
    Spreadsheet { path: PathBuf, message: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Why the remote round trip produced no usable result.
#[derive(Debug, Error)]
pub enum RemoteCause {
    /// Timeout, refused connection and the like. Never surfaced on its own.
    #[error("transport failure: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("service answered with status {0}")]
    Status(u16),

    #[error("response body is not valid JSON: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("response body has no `Outputs` array")]
    MissingOutputs,
}

impl BatchError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn schema(row: usize, reason: impl Into<String>) -> Self {
        Self::SchemaValidation {
            row,
            reason: reason.into(),
        }
    }

    /// Process exit status for this failure class.
    pub fn exit_code(&self) -> u8 {
        match self {
            BatchError::NoInput { .. } | BatchError::NoRows { .. } => 2,
            BatchError::RemoteFailure { .. } => 4,
            BatchError::SchemaValidation { .. } => 5,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, BatchError>;
