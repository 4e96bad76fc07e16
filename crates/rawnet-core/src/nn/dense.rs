use rawnet_tensor::{matmul, sum, Activation, Tensor, TensorResult};

/// A fully connected layer.
#[derive(new, Debug, Clone, PartialEq)]
pub struct Dense {
    /// The weights, `[d_input, d_output, o]`.
    pub weights: Tensor,
    /// The biases, shaped like the product of the input with the weights.
    pub biases: Tensor,
}

impl Dense {
    /// Applies the layer to the input, see [dense].
    pub fn forward(&self, input: &Tensor, activation: Activation) -> TensorResult<Tensor> {
        dense(input, self, activation)
    }
}

/// Applies a fully connected layer to the input.
///
/// ```math
/// y = activation(x @ weights + biases)
/// ```
///
/// # Arguments:
///
/// - `input` is the input tensor, ``[m, d_input, o]``.
/// - `layer` holds the weights ``[d_input, d_output, o]`` and the biases ``[m, d_output, o]``.
///
/// # Returns:
///
/// The activated tensor, ``[m, d_output, o]``.
///
/// The biases must have exactly the shape of the product; they are not broadcast.
pub fn dense(input: &Tensor, layer: &Dense, activation: Activation) -> TensorResult<Tensor> {
    let alpha = matmul(input, &layer.weights)?;
    let mut output = sum(&[&alpha, &layer.biases])?;

    activation.apply(&mut output);

    Ok(output)
}
