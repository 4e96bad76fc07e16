mod activation;
mod base;
mod kernel;
mod shape;

/// The compute kernels and utility operations.
pub mod ops;

pub use activation::*;
pub use base::*;
pub use kernel::*;
pub use ops::{argmax, combine, combined_shape, conv, flatten, matmul, pool, sum};
pub use shape::*;
