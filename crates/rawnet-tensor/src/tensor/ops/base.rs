use crate::{Shape, Tensor, TensorError, TensorResult};

/// Returns the shape [combine] would produce, without taking ownership of the tensors.
///
/// Fails with [DimensionMismatch](TensorError::DimensionMismatch) when a tensor doesn't share
/// the `(m, n)` of the first one, and with [EmptyInput](TensorError::EmptyInput) when there is
/// no tensor.
pub fn combined_shape(tensors: &[Tensor]) -> TensorResult<Shape> {
    let Some((first, others)) = tensors.split_first() else {
        return Err(TensorError::EmptyInput { operation: "combine" });
    };
    let Shape { m, n, o } = first.shape();
    let mut channels = o;

    for tensor in others {
        let shape = tensor.shape();
        if shape.m != m || shape.n != n {
            return Err(TensorError::DimensionMismatch {
                operation: "combine",
                lhs: first.shape(),
                rhs: shape,
            });
        }
        channels = channels
            .checked_add(shape.o)
            .ok_or(TensorError::AllocationFailure {
                shape: Shape::new(m, n, usize::MAX),
            })?;
    }

    Ok(Shape::new(m, n, channels))
}

/// Concatenates tensors along the channel dimension.
///
/// The buffer of the first tensor is grown to hold the planes of the others, in order. The
/// output has `sum(o)` channels.
///
/// The tensors are consumed even when the call fails. Use [combined_shape] first to validate
/// them while keeping ownership.
///
/// # Shapes
///
/// - tensors: `[m, n, o_i]`
/// - output: `[m, n, o_0 + o_1 + ...]`
pub fn combine(tensors: Vec<Tensor>) -> TensorResult<Tensor> {
    let shape = combined_shape(&tensors)?;
    let len = shape
        .checked_num_elements()
        .ok_or(TensorError::AllocationFailure { shape })?;

    let mut tensors = tensors.into_iter();
    let (_, mut data) = tensors
        .next()
        .ok_or(TensorError::EmptyInput { operation: "combine" })?
        .into_parts();
    data.try_reserve_exact(len - data.len())
        .map_err(|_| TensorError::AllocationFailure { shape })?;

    for tensor in tensors {
        data.extend_from_slice(tensor.as_slice());
    }

    Ok(Tensor::from_parts(shape, data))
}

/// Reshapes the tensor to a single row `(1, m * n * o, 1)` without touching its buffer.
pub fn flatten(tensor: &mut Tensor) {
    let shape = tensor.shape().flatten();
    tensor.set_shape(shape);
}

/// Returns the index of the largest element of a flat `(1, n, 1)` tensor.
///
/// Ties are broken by the first occurrence.
pub fn argmax(tensor: &Tensor) -> TensorResult<usize> {
    let shape = tensor.shape();

    if !shape.is_flat() {
        return Err(TensorError::InvalidShape {
            shape,
            reason: "argmax requires a flat tensor",
        });
    }

    let values = tensor.as_slice();
    let Some(first) = values.first() else {
        return Err(TensorError::InvalidShape {
            shape,
            reason: "argmax requires at least one element",
        });
    };

    let mut max_val = *first;
    let mut max_idx = 0;

    for (idx, val) in values.iter().enumerate().skip(1) {
        if *val > max_val {
            max_val = *val;
            max_idx = idx;
        }
    }

    Ok(max_idx)
}
