use crate::tensor::base::try_alloc;
use crate::{Tensor, TensorError, TensorResult};

/// Sums same-shaped tensors element-wise into a new tensor.
///
/// The inputs are left untouched. Fails with
/// [DimensionMismatch](TensorError::DimensionMismatch) as soon as one tensor doesn't have the
/// shape of the first one, before anything is allocated.
pub fn sum(tensors: &[&Tensor]) -> TensorResult<Tensor> {
    let Some((first, others)) = tensors.split_first() else {
        return Err(TensorError::EmptyInput { operation: "sum" });
    };
    let shape = first.shape();

    if let Some(tensor) = others.iter().find(|tensor| tensor.shape() != shape) {
        return Err(TensorError::DimensionMismatch {
            operation: "sum",
            lhs: shape,
            rhs: tensor.shape(),
        });
    }

    let mut output = try_alloc(shape)?;
    output.copy_from_slice(first.as_slice());

    for tensor in others {
        for (acc, value) in output.iter_mut().zip(tensor.as_slice()) {
            *acc += *value;
        }
    }

    Tensor::from_data(output, shape)
}
