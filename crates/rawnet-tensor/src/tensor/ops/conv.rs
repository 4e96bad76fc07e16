use crate::tensor::base::try_alloc;
use crate::{Kernel, Shape, Tensor, TensorError, TensorResult};

/// Calculate the output size of a strided window sliding over `size_in` elements without
/// padding: `(size_in - kernel_size) / stride + 1`.
///
/// The caller must ensure `kernel_size <= size_in` and `stride > 0`.
pub fn calculate_output_size(kernel_size: usize, stride: usize, size_in: usize) -> usize {
    (size_in - kernel_size) / stride + 1
}

/// Convolves a multi-channel input with a single kernel.
///
/// Each input plane is cross-correlated (the kernel isn't flipped) with the matching kernel
/// plane, the results of all planes are accumulated into a single output plane and the kernel
/// bias is added once per output element. Stacking the outputs of several kernels is done by
/// [combine](crate::combine).
///
/// # Shapes
///
/// - channels: `[m, n, o]`
/// - kernel: `[m_k, n_k, o]`
/// - output: `[(m - m_k) / m_stride + 1, (n - n_k) / n_stride + 1, 1]`
pub fn conv(channels: &Tensor, kernel: &Kernel) -> TensorResult<Tensor> {
    let Shape { m, n, o } = channels.shape();
    let Shape {
        m: kernel_height,
        n: kernel_width,
        o: kernel_channels,
    } = kernel.shape();
    let [stride_height, stride_width] = kernel.stride;

    let invalid = |reason| TensorError::InvalidConvolution {
        input: channels.shape(),
        kernel: kernel.shape(),
        reason,
    };

    if o != kernel_channels {
        return Err(invalid("channel count mismatch"));
    }
    if m < kernel_height || n < kernel_width {
        return Err(invalid("oversized kernel"));
    }
    if kernel_height == 0 || kernel_width == 0 {
        return Err(invalid("empty kernel"));
    }
    if stride_height == 0 || stride_width == 0 {
        return Err(invalid("zero stride"));
    }

    let out_height = calculate_output_size(kernel_height, stride_height, m);
    let out_width = calculate_output_size(kernel_width, stride_width, n);

    let shape = Shape::new(out_height, out_width, 1);
    let mut output = try_alloc(shape)?;

    for oh in 0..out_height {
        for ow in 0..out_width {
            let mut acc = 0.0;

            for (plane, weights) in channels.channels().zip(kernel.weights.channels()) {
                for kh in 0..kernel_height {
                    let ih = oh * stride_height + kh;
                    let iw = ow * stride_width;
                    let row = &plane[ih * n + iw..ih * n + iw + kernel_width];
                    let weights = &weights[kh * kernel_width..(kh + 1) * kernel_width];

                    for (x, w) in row.iter().zip(weights) {
                        acc += x * w;
                    }
                }
            }

            output[oh * out_width + ow] = acc + kernel.bias;
        }
    }

    Tensor::from_data(output, shape)
}
