#![warn(missing_docs)]

//! The core crate of rawnet.
//!
//! It provides the [dense](nn::dense) and [convolution](nn::convolution) layers, the two stage
//! [ConvNet](model::ConvNet) model, and the binary [records](record) the parameters are stored
//! in.

#[macro_use]
extern crate derive_new;

/// The configuration trait.
pub mod config;

/// Model composed of the layers.
pub mod model;

/// Neural network layers.
pub mod nn;

/// Reading and writing of parameter records.
pub mod record;

pub use config::*;

/// The tensor crate, re-exported.
pub mod tensor {
    pub use rawnet_tensor::*;
}
