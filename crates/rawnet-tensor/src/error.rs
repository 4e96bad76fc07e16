use crate::Shape;
use thiserror::Error;

/// Errors returned by the tensor kernels and utility operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TensorError {
    /// The operands of an operation don't have compatible shapes.
    #[error("{operation}: dimension mismatch between {lhs} and {rhs}")]
    DimensionMismatch {
        /// The operation that failed.
        operation: &'static str,
        /// Shape of the left hand side operand.
        lhs: Shape,
        /// Shape of the right hand side operand.
        rhs: Shape,
    },

    /// The kernel is larger than the input, has a zero stride, or doesn't have as many channels
    /// as the input.
    #[error("Invalid convolution: {reason} (input {input}, kernel {kernel})")]
    InvalidConvolution {
        /// Shape of the convolved input.
        input: Shape,
        /// Shape of the kernel weights.
        kernel: Shape,
        /// What is wrong with the pair.
        reason: &'static str,
    },

    /// The pooling window is larger than the input or has a zero stride.
    #[error("Invalid pooling: {reason} (input {input}, window {window:?}, stride {stride:?})")]
    InvalidPooling {
        /// Shape of the pooled input.
        input: Shape,
        /// The pooling window `[m, n]`.
        window: [usize; 2],
        /// The pooling stride `[m_stride, n_stride]`.
        stride: [usize; 2],
        /// What is wrong with the pair.
        reason: &'static str,
    },

    /// A buffer of the requested number of elements couldn't be allocated.
    #[error("Failed allocation: tensor sized {shape}")]
    AllocationFailure {
        /// The shape that was requested.
        shape: Shape,
    },

    /// The tensor doesn't have the shape the operation requires.
    #[error("Invalid shape {shape}: {reason}")]
    InvalidShape {
        /// The offending shape.
        shape: Shape,
        /// What the operation expected.
        reason: &'static str,
    },

    /// The operation was called without any tensor.
    #[error("{operation}: at least one tensor is required")]
    EmptyInput {
        /// The operation that failed.
        operation: &'static str,
    },
}

/// Result type of the tensor operations.
pub type TensorResult<T> = Result<T, TensorError>;
