use std::path::PathBuf;

use rawnet_tensor::TensorError;
use thiserror::Error;

/// Error raised while reading or writing a record.
#[derive(Error, Debug)]
pub enum RecordError {
    /// The record file couldn't be opened or created.
    #[error("Failed opening file {path}: {source}")]
    Open {
        /// Path of the file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The record ended before all the announced items were read.
    #[error("Unexpected EOF: {what} not reached")]
    UnexpectedEof {
        /// What was being read.
        what: &'static str,
    },

    /// Any other I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The metadata of the record can't describe a valid item.
    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),

    /// The tensor described by the record couldn't be built.
    #[error("Invalid tensor: {0}")]
    Tensor(#[from] TensorError),
}

/// Result type of the record operations.
pub type RecordResult<T> = Result<T, RecordError>;
