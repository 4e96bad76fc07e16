use serde::{Deserialize, Serialize};

use crate::{Shape, Tensor};

/// A convolution filter.
///
/// The weights have one plane per channel of the convolved input. A kernel always produces a
/// single output plane, the `bias` being added once per output element.
#[derive(new, Debug, Clone, PartialEq)]
pub struct Kernel {
    /// The filter weights, `(m, n, o)`.
    pub weights: Tensor,
    /// The stride `[m_stride, n_stride]`.
    pub stride: [usize; 2],
    /// Added to every output element.
    pub bias: f32,
}

impl Kernel {
    /// Shape of the filter weights.
    pub fn shape(&self) -> Shape {
        self.weights.shape()
    }
}

/// A max pooling window, without learnable parameters.
#[derive(new, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pooler {
    /// The window size `[m, n]`.
    pub window: [usize; 2],
    /// The stride `[m_stride, n_stride]`.
    pub stride: [usize; 2],
}
