//! Binary records of the model parameters and of the evaluated images.
//!
//! Every size is stored as a 64-bit little-endian unsigned integer and every value as a 32-bit
//! little-endian float:
//!
//! | Record          | Layout                                                          |
//! |-----------------|-----------------------------------------------------------------|
//! | Tensor          | `m, n, o` sizes, then `m * n * o` floats                        |
//! | Kernel          | `m, n, o, m_stride, n_stride` sizes, the bias, `m * n * o` floats |
//! | Pooler          | `m, n, m_stride, n_stride` sizes                                |
//! | Dense           | a tensor record for the weights, then one for the biases        |
//! | Convolutional   | a `count` size, then `count` kernel records                     |
//! | Label           | a single size                                                   |

mod base;
mod error;
mod file;

pub use base::*;
pub use error::*;
pub use file::*;
