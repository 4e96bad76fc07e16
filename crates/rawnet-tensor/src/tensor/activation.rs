use serde::{Deserialize, Serialize};

use crate::Tensor;

/// The elements a softmax normalizes over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SoftmaxScope {
    /// Each channel plane is an independent distribution, the channel dimension being the batch.
    #[default]
    Plane,
    /// The whole tensor is a single distribution.
    Tensor,
}

/// Activation applied in place at the end of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Activation {
    /// Leaves the values untouched.
    #[default]
    Identity,
    /// `max(0, x)`.
    Relu,
    /// `1 / (1 + e^-x)`.
    Sigmoid,
    /// `e^x / sum(e^x)`, computed without subtracting the maximum first.
    ///
    /// Each exponential is computed in `f64` and summed in `f32`. Past `ln(f32::MAX)` (about
    /// 88.7) the sum overflows to infinity and every value of the distribution becomes `0`; past
    /// `ln(f64::MAX)` (about 709.8) the exponential overflows too and its value becomes `NaN`.
    /// See [StableSoftmax](Activation::StableSoftmax).
    Softmax(SoftmaxScope),
    /// `e^(x - max) / sum(e^(x - max))`.
    ///
    /// A distribution whose maximum is infinite, or holding a `NaN`, becomes `NaN` everywhere.
    StableSoftmax(SoftmaxScope),
}

impl Activation {
    /// Applies the activation to every element of the tensor.
    pub fn apply(&self, tensor: &mut Tensor) {
        match self {
            Activation::Identity => {}
            Activation::Relu => relu(tensor),
            Activation::Sigmoid => sigmoid(tensor),
            Activation::Softmax(scope) => softmax(tensor, *scope),
            Activation::StableSoftmax(scope) => stable_softmax(tensor, *scope),
        }
    }
}

/// Applies the rectified linear unit function element-wise.
pub fn relu(tensor: &mut Tensor) {
    for elem in tensor.as_mut_slice() {
        if *elem < 0.0 {
            *elem = 0.0;
        }
    }
}

/// Applies the sigmoid function element-wise.
pub fn sigmoid(tensor: &mut Tensor) {
    for elem in tensor.as_mut_slice() {
        *elem = (1.0 / (1.0 + f64::exp(-(*elem as f64)))) as f32;
    }
}

/// Applies the softmax function over the given scope.
pub fn softmax(tensor: &mut Tensor, scope: SoftmaxScope) {
    for_each_distribution(tensor, scope, |values| {
        let sum: f32 = values.iter().map(|x| f64::exp(*x as f64) as f32).sum();

        for x in values.iter_mut() {
            *x = (f64::exp(*x as f64) / sum as f64) as f32;
        }
    });
}

/// Applies the softmax function over the given scope, subtracting the maximum of each
/// distribution before exponentiating.
///
/// A distribution whose maximum is infinite, or holding a `NaN`, becomes `NaN` everywhere.
pub fn stable_softmax(tensor: &mut Tensor, scope: SoftmaxScope) {
    for_each_distribution(tensor, scope, |values| {
        let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let sum: f32 = values
            .iter()
            .map(|x| f64::exp((*x - max) as f64) as f32)
            .sum();

        for x in values.iter_mut() {
            *x = (f64::exp((*x - max) as f64) / sum as f64) as f32;
        }
    });
}

fn for_each_distribution<F>(tensor: &mut Tensor, scope: SoftmaxScope, func: F)
where
    F: Fn(&mut [f32]),
{
    match scope {
        SoftmaxScope::Plane => tensor.channels_mut().for_each(func),
        SoftmaxScope::Tensor => func(tensor.as_mut_slice()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_relu() {
        let mut tensor = Tensor::from_floats(&[-1.0, 0.0, 2.5], [1, 3, 1]).unwrap();

        relu(&mut tensor);

        assert_eq!(tensor.as_slice(), &[0.0, 0.0, 2.5]);
    }

    #[test]
    fn test_sigmoid() {
        let mut tensor = Tensor::from_floats(&[0.0, 1.0, 7.0, -3.0], [1, 4, 1]).unwrap();

        sigmoid(&mut tensor);

        let output = tensor.as_slice();
        assert_eq!(output[0], 0.5);
        assert_abs_diff_eq!(output[1], 0.7311, epsilon = 1e-4);
        assert_abs_diff_eq!(output[2], 0.9991, epsilon = 1e-4);
        assert_abs_diff_eq!(output[3], 0.0474, epsilon = 1e-4);
    }

    #[test]
    fn test_sigmoid_overflow() {
        let mut tensor = Tensor::from_floats(&[f32::MAX, f32::MIN], [1, 2, 1]).unwrap();

        sigmoid(&mut tensor);

        assert_eq!(tensor.as_slice(), &[1.0, 0.0]);
    }

    #[test]
    fn softmax_of_equal_values_is_uniform() {
        let n = 8;
        let mut tensor = Tensor::from_floats(&vec![3.0; n], [1, n, 1]).unwrap();

        softmax(&mut tensor, SoftmaxScope::Plane);

        for value in tensor.as_slice() {
            assert_abs_diff_eq!(*value, 1.0 / n as f32, epsilon = 1e-6);
        }
        assert_abs_diff_eq!(tensor.as_slice().iter().sum::<f32>(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn softmax_normalizes_each_plane_independently() {
        let mut tensor = Tensor::from_floats(&[1.0, 2.0, 3.0, 0.0, 0.0, 5.0], [1, 3, 2]).unwrap();

        softmax(&mut tensor, SoftmaxScope::Plane);

        for plane in tensor.channels() {
            assert_abs_diff_eq!(plane.iter().sum::<f32>(), 1.0, epsilon = 1e-6);
        }
        assert_abs_diff_eq!(tensor.as_slice()[0], 0.0900, epsilon = 1e-4);
        assert_abs_diff_eq!(tensor.as_slice()[2], 0.6652, epsilon = 1e-4);
    }

    #[test]
    fn softmax_over_whole_tensor() {
        let mut tensor = Tensor::from_floats(&[1.0, 1.0, 1.0, 1.0], [1, 2, 2]).unwrap();

        softmax(&mut tensor, SoftmaxScope::Tensor);

        for value in tensor.as_slice() {
            assert_abs_diff_eq!(*value, 0.25, epsilon = 1e-6);
        }
    }

    #[test]
    fn naive_softmax_overflows_on_large_activations() {
        let mut tensor = Tensor::from_floats(&[1000.0, 0.0], [1, 2, 1]).unwrap();

        softmax(&mut tensor, SoftmaxScope::Plane);

        assert!(tensor.as_slice()[0].is_nan());
        assert_eq!(tensor.as_slice()[1], 0.0);
    }

    #[test]
    fn naive_softmax_vanishes_when_the_sum_overflows() {
        let mut tensor = Tensor::from_floats(&[100.0, 0.0], [1, 2, 1]).unwrap();

        softmax(&mut tensor, SoftmaxScope::Plane);

        assert_eq!(tensor.as_slice(), &[0.0, 0.0]);
    }

    #[test]
    fn stable_softmax_of_non_finite_values_is_nan() {
        let values = [f32::INFINITY, 0.0, f32::NEG_INFINITY, f32::NEG_INFINITY];
        let mut tensor = Tensor::from_floats(&values, [1, 2, 2]).unwrap();

        stable_softmax(&mut tensor, SoftmaxScope::Plane);

        assert!(tensor.as_slice().iter().all(|x| x.is_nan()));
    }

    #[test]
    fn stable_softmax_handles_large_activations() {
        let mut tensor = Tensor::from_floats(&[1000.0, 0.0], [1, 2, 1]).unwrap();

        stable_softmax(&mut tensor, SoftmaxScope::Plane);

        assert_abs_diff_eq!(tensor.as_slice()[0], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(tensor.as_slice()[1], 0.0, epsilon = 1e-6);
    }

    #[test]
    fn stable_softmax_matches_naive_on_small_values() {
        let values = [0.5, -1.0, 2.0, 0.25];
        let mut naive = Tensor::from_floats(&values, [2, 2, 1]).unwrap();
        let mut stable = naive.clone();

        softmax(&mut naive, SoftmaxScope::Plane);
        stable_softmax(&mut stable, SoftmaxScope::Plane);

        for (a, b) in naive.as_slice().iter().zip(stable.as_slice()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-6);
        }
    }

    #[test]
    fn identity_is_a_no_op() {
        let mut tensor = Tensor::from_floats(&[-1.0, 2.0], [1, 2, 1]).unwrap();

        Activation::Identity.apply(&mut tensor);

        assert_eq!(tensor.as_slice(), &[-1.0, 2.0]);
    }
}
