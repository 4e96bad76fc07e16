use rawnet_tensor::{combine, conv, iter_range_par, run_par};
use rawnet_tensor::{Activation, Kernel, Tensor, TensorResult};

/// A convolutional layer: a bank of kernels, each producing one output channel.
#[derive(new, Debug, Clone, PartialEq)]
pub struct Convolutional {
    /// The kernels, in output channel order.
    pub kernels: Vec<Kernel>,
}

impl Convolutional {
    /// Applies the layer to the input, see [convolution].
    pub fn forward(&self, input: &Tensor, activation: Activation) -> TensorResult<Tensor> {
        convolution(input, self, activation)
    }

    /// Number of output channels.
    pub fn num_kernels(&self) -> usize {
        self.kernels.len()
    }
}

/// Applies a convolutional layer to the input.
///
/// Every kernel is convolved with the whole input, the output planes are concatenated in kernel
/// order and the activation is applied in place.
///
/// # Arguments:
///
/// - `input` is the input tensor, ``[m, n, o]``.
/// - `layer` holds the kernels, each ``[m_k, n_k, o]``.
///
/// # Returns:
///
/// The activated tensor, ``[m_out, n_out, kernels]``.
///
/// When a kernel fails, the planes already produced are dropped and the error is returned. A
/// layer without kernels fails with [EmptyInput](rawnet_tensor::TensorError::EmptyInput).
pub fn convolution(
    input: &Tensor,
    layer: &Convolutional,
    activation: Activation,
) -> TensorResult<Tensor> {
    let kernels = &layer.kernels;

    let planes = run_par!(|| {
        iter_range_par!(0, kernels.len())
            .map(|k| conv(input, &kernels[k]))
            .collect::<TensorResult<Vec<_>>>()
    })?;

    let mut output = combine(planes)?;
    activation.apply(&mut output);

    Ok(output)
}
