use approx::assert_abs_diff_eq;
use rawnet_tensor::{
    argmax, combine, conv, flatten, matmul, pool, relu, sigmoid, softmax, sum, Kernel, Pooler,
    Shape, SoftmaxScope, Tensor, TensorError,
};

fn arange(shape: [usize; 3]) -> Tensor {
    let values: Vec<f32> = (0..shape.iter().product::<usize>())
        .map(|v| v as f32)
        .collect();
    Tensor::from_floats(&values, shape).unwrap()
}

#[test]
fn strided_convolution_of_arange() {
    let input = arange([4, 4, 1]);
    let weights = Tensor::from_floats(&[0.0, 1.0, 2.0, 3.0], [2, 2, 1]).unwrap();
    let kernel = Kernel::new(weights, [2, 2], 0.0);

    let output = conv(&input, &kernel).unwrap();

    assert_eq!(output.shape(), Shape::new(2, 2, 1));
    assert_eq!(output.as_slice(), &[24.0, 36.0, 72.0, 84.0]);
}

#[test]
fn sum_rejects_channel_mismatch() {
    let lhs = arange([2, 2, 1]);
    let rhs = arange([2, 2, 2]);

    let result = sum(&[&lhs, &rhs]);

    assert!(matches!(result, Err(TensorError::DimensionMismatch { .. })));
}

#[test]
fn relu_and_sigmoid_known_values() {
    let mut tensor = Tensor::from_floats(&[-1.0, 0.0, 2.5], [1, 3, 1]).unwrap();
    relu(&mut tensor);
    assert_eq!(tensor.as_slice(), &[0.0, 0.0, 2.5]);

    let mut tensor = Tensor::from_floats(&[0.0], [1, 1, 1]).unwrap();
    sigmoid(&mut tensor);
    assert_eq!(tensor.as_slice(), &[0.5]);
}

#[test]
fn softmax_of_equal_values_sums_to_one() {
    let mut tensor = Tensor::from_floats(&[0.25; 10], [1, 10, 1]).unwrap();

    softmax(&mut tensor, SoftmaxScope::Plane);

    for value in tensor.as_slice() {
        assert_abs_diff_eq!(*value, 0.1, epsilon = 1e-6);
    }
    assert_abs_diff_eq!(tensor.as_slice().iter().sum::<f32>(), 1.0, epsilon = 1e-5);
}

#[test]
fn output_extents_follow_the_window_formula() {
    for (size, window, stride) in [(28, 5, 1), (24, 2, 2), (12, 3, 1), (10, 2, 2), (7, 3, 2)] {
        let input = Tensor::zeros([size, size, 1]).unwrap();
        let expected = (size - window) / stride + 1;

        let kernel = Kernel::new(
            Tensor::zeros([window, window, 1]).unwrap(),
            [stride, stride],
            0.0,
        );
        assert_eq!(conv(&input, &kernel).unwrap().dims(), [expected, expected, 1]);

        let pooler = Pooler::new([window, window], [stride, stride]);
        assert_eq!(pool(&input, &pooler).unwrap().dims(), [expected, expected, 1]);
    }
}

#[test]
fn inputs_smaller_than_the_window_always_fail() {
    let input = Tensor::zeros([3, 3, 1]).unwrap();

    let kernel = Kernel::new(Tensor::zeros([4, 1, 1]).unwrap(), [1, 1], 0.0);
    assert!(matches!(
        conv(&input, &kernel),
        Err(TensorError::InvalidConvolution { .. })
    ));

    let pooler = Pooler::new([1, 4], [1, 1]);
    assert!(matches!(
        pool(&input, &pooler),
        Err(TensorError::InvalidPooling { .. })
    ));
}

#[test]
fn matmul_output_shape() {
    let main = Tensor::zeros([3, 4, 2]).unwrap();
    let opp = Tensor::zeros([4, 5, 2]).unwrap();

    assert_eq!(matmul(&main, &opp).unwrap().shape(), Shape::new(3, 5, 2));
    assert!(matmul(&opp, &main).is_err());
}

#[test]
fn argmax_is_stable_under_permutations_keeping_the_first_maximum() {
    let tensor = Tensor::from_floats(&[0.3, 0.9, 0.1, 0.9, 0.2], [1, 5, 1]).unwrap();
    let permuted = Tensor::from_floats(&[0.2, 0.9, 0.9, 0.3, 0.1], [1, 5, 1]).unwrap();

    assert_eq!(argmax(&tensor).unwrap(), 1);
    assert_eq!(argmax(&permuted).unwrap(), 1);
}

#[test]
fn combine_flatten_pipeline() {
    let planes: Vec<Tensor> = (0..3)
        .map(|c| Tensor::from_floats(&[c as f32; 4], [2, 2, 1]).unwrap())
        .collect();

    let mut combined = combine(planes).unwrap();
    flatten(&mut combined);

    assert_eq!(combined.dims(), [1, 12, 1]);
    assert_eq!(argmax(&combined).unwrap(), 8);
}
