#![warn(missing_docs)]

//! This library provides the tensor data model and the compute kernels used by the rawnet
//! inference engine.
//!
//! Tensors are dense, three dimensional `(m, n, o)` arrays of `f32`: `m` rows, `n` columns and
//! `o` channel planes laid out one after the other. The kernels ([sum], [matmul], [conv],
//! [pool]) never mutate their inputs and always return a freshly allocated tensor.

#[macro_use]
extern crate derive_new;

mod error;
mod parallel;
mod tensor;

pub use error::*;
pub use tensor::*;
