use crate::tensor::base::try_alloc;
use crate::{chunks_mut_par, run_par};
use crate::{Pooler, Shape, Tensor, TensorError, TensorResult};

use super::calculate_output_size;

/// Max pooling applied independently to every channel plane.
///
/// # Shapes
///
/// - main: `[m, n, o]`
/// - output: `[(m - window_m) / m_stride + 1, (n - window_n) / n_stride + 1, o]`
pub fn pool(main: &Tensor, pooler: &Pooler) -> TensorResult<Tensor> {
    let Shape { m, n, o } = main.shape();
    let [kernel_height, kernel_width] = pooler.window;
    let [stride_height, stride_width] = pooler.stride;

    let invalid = |reason| TensorError::InvalidPooling {
        input: main.shape(),
        window: pooler.window,
        stride: pooler.stride,
        reason,
    };

    if m < kernel_height || n < kernel_width {
        return Err(invalid("oversized pooling window"));
    }
    if kernel_height == 0 || kernel_width == 0 {
        return Err(invalid("empty pooling window"));
    }
    if stride_height == 0 || stride_width == 0 {
        return Err(invalid("zero stride"));
    }

    let out_height = calculate_output_size(kernel_height, stride_height, m);
    let out_width = calculate_output_size(kernel_width, stride_width, n);

    let shape = Shape::new(out_height, out_width, o);
    let mut output = try_alloc(shape)?;
    let input = main.as_slice();
    let plane_size = m * n;

    run_par!(|| {
        chunks_mut_par!(output, out_height * out_width)
            .enumerate()
            .for_each(|(c, out)| {
                let plane = &input[c * plane_size..(c + 1) * plane_size];

                for oh in 0..out_height {
                    for ow in 0..out_width {
                        let ih_start = oh * stride_height;
                        let iw_start = ow * stride_width;
                        let mut max_val = plane[ih_start * n + iw_start];

                        for ih in ih_start..ih_start + kernel_height {
                            for iw in iw_start..iw_start + kernel_width {
                                let val = plane[ih * n + iw];
                                if val > max_val {
                                    max_val = val;
                                }
                            }
                        }

                        out[oh * out_width + ow] = max_val;
                    }
                }
            })
    });

    Tensor::from_data(output, shape)
}
