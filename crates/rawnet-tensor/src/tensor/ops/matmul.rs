use ndarray::linalg::general_mat_mul;
use ndarray::{ArrayView2, ArrayViewMut2};

use crate::tensor::base::try_alloc;
use crate::{Shape, Tensor, TensorError, TensorResult};

/// Batched matrix multiplication, the channel dimension being the batch.
///
/// Every plane `c` of the output is `main[c] @ opp[c]`, so the output shape is
/// `(main.m, opp.n, main.o)`.
///
/// # Shapes
///
/// - main: `[m, t, o]`
/// - opp: `[t, n, o]`
/// - output: `[m, n, o]`
pub fn matmul(main: &Tensor, opp: &Tensor) -> TensorResult<Tensor> {
    let Shape { m, n: t, o } = main.shape();
    let n = opp.shape().n;

    if o != opp.shape().o || t != opp.shape().m {
        return Err(TensorError::DimensionMismatch {
            operation: "matmul",
            lhs: main.shape(),
            rhs: opp.shape(),
        });
    }

    let shape = Shape::new(m, n, o);
    let mut output = try_alloc(shape)?;

    if shape.num_elements() > 0 {
        for ((out, lhs), rhs) in output
            .chunks_mut(m * n)
            .zip(main.channels())
            .zip(opp.channels())
        {
            let lhs = plane_view(lhs, [m, t])?;
            let rhs = plane_view(rhs, [t, n])?;
            let mut out = ArrayViewMut2::from_shape((m, n), out).map_err(|_| {
                TensorError::InvalidShape {
                    shape,
                    reason: "output plane doesn't match the matmul shape",
                }
            })?;

            general_mat_mul(1.0, &lhs, &rhs, 0.0, &mut out);
        }
    }

    Tensor::from_data(output, shape)
}

fn plane_view(plane: &[f32], [rows, cols]: [usize; 2]) -> TensorResult<ArrayView2<'_, f32>> {
    ArrayView2::from_shape((rows, cols), plane).map_err(|_| TensorError::InvalidShape {
        shape: Shape::new(rows, cols, 1),
        reason: "plane doesn't match the matmul shape",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matmul_d2() {
        let lhs = Tensor::from_floats(&[1.0, 7.0, 2.0, 3.0, 1.0, 5.0], [3, 2, 1]).unwrap();
        let rhs = Tensor::from_floats(&[4.0, 7.0, 5.0, 2.0, 3.0, 5.0], [2, 3, 1]).unwrap();

        let output = matmul(&lhs, &rhs).unwrap();

        assert_eq!(output.dims(), [3, 3, 1]);
        assert_eq!(
            output.as_slice(),
            &[18.0, 28.0, 40.0, 14.0, 23.0, 25.0, 14.0, 22.0, 30.0]
        );
    }

    #[test]
    fn should_multiply_each_plane_independently() {
        let lhs = Tensor::from_floats(&[1.0, 7.0, 2.0, 3.0, 1.0, 0.0, 0.0, 1.0], [2, 2, 2])
            .unwrap();
        let rhs = Tensor::from_floats(&[4.0, 7.0, 2.0, 3.0, 2.0, 5.0, 6.0, 3.0], [2, 2, 2])
            .unwrap();

        let output = matmul(&lhs, &rhs).unwrap();

        assert_eq!(output.dims(), [2, 2, 2]);
        assert_eq!(
            output.as_slice(),
            &[18.0, 28.0, 14.0, 23.0, 2.0, 5.0, 6.0, 3.0]
        );
    }

    #[test]
    fn should_produce_row_vector_times_matrix() {
        let input = Tensor::from_floats(&[1.0, 2.0, 3.0], [1, 3, 1]).unwrap();
        let weights =
            Tensor::from_floats(&[1.0, 0.0, 0.0, 1.0, 1.0, 1.0], [3, 2, 1]).unwrap();

        let output = matmul(&input, &weights).unwrap();

        assert_eq!(output.dims(), [1, 2, 1]);
        assert_eq!(output.as_slice(), &[4.0, 5.0]);
    }

    #[test]
    fn should_fail_on_inner_dimension_mismatch() {
        let lhs = Tensor::zeros([2, 3, 1]).unwrap();
        let rhs = Tensor::zeros([2, 3, 1]).unwrap();

        assert!(matches!(
            matmul(&lhs, &rhs),
            Err(TensorError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn should_fail_on_batch_mismatch() {
        let lhs = Tensor::zeros([2, 3, 2]).unwrap();
        let rhs = Tensor::zeros([3, 2, 1]).unwrap();

        assert!(matches!(
            matmul(&lhs, &rhs),
            Err(TensorError::DimensionMismatch { .. })
        ));
    }
}
