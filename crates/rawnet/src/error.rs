use rawnet_core::record::RecordError;
use rawnet_core::tensor::TensorError;
use thiserror::Error;

/// Error raised while evaluating the model.
#[derive(Error, Debug)]
pub enum InferenceError {
    /// The layer records couldn't be loaded.
    #[error("Error reading network parameters: {0}")]
    Model(#[source] RecordError),

    /// The image or its label couldn't be loaded.
    #[error("Error reading image data {index}: {source}")]
    Data {
        /// Index of the image.
        index: usize,
        /// The underlying error.
        #[source]
        source: RecordError,
    },

    /// The forward pass failed.
    #[error("Failed forward pass on image {index}: {source}")]
    Forward {
        /// Index of the image.
        index: usize,
        /// The underlying error.
        #[source]
        source: TensorError,
    },
}

impl InferenceError {
    /// The process exit code reported for this error: `255` when the model can't be loaded, `1`
    /// when the run fails.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Model(_) => 255,
            Self::Data { .. } | Self::Forward { .. } => 1,
        }
    }
}
