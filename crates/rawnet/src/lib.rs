#![warn(missing_docs)]

//! Evaluates the rawnet convolutional network over stored images.
//!
//! The [model](rawnet_core::model::ConvNet) is loaded from its layer records, every image is
//! classified and compared with its label, and the accuracy is reported in an
//! [EvaluationReport].

/// Command line arguments of the `rawnet` binary.
pub mod cli;

/// Logger installation.
pub mod logger;

mod error;
mod inference;

pub use error::*;
pub use inference::*;
