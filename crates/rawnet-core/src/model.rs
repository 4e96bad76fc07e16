use std::path::Path;

use rawnet_tensor::{argmax, flatten, pool, Activation, Pooler, SoftmaxScope, Tensor, TensorResult};

use crate::nn::{Convolutional, Dense};
use crate::record::{load_record, save_record, RecordResult};

/// Two convolution and pooling stages followed by a dense classifier.
///
/// ```text
/// conv1 -> relu -> pool1 -> conv2 -> sigmoid -> pool2 -> flatten -> dense1 -> softmax
/// ```
#[derive(new, Debug, Clone, PartialEq)]
pub struct ConvNet {
    /// First convolutional layer.
    pub conv1: Convolutional,
    /// First pooling window.
    pub pool1: Pooler,
    /// Second convolutional layer.
    pub conv2: Convolutional,
    /// Second pooling window.
    pub pool2: Pooler,
    /// The classifier.
    pub dense1: Dense,
    /// The softmax applied to the classifier output.
    #[new(value = "Activation::Softmax(SoftmaxScope::Plane)")]
    pub softmax: Activation,
}

impl ConvNet {
    /// File names of the records, in pipeline order.
    pub const RECORDS: [&'static str; 5] = [
        "conv1.bin",
        "pool1.bin",
        "conv2.bin",
        "pool2.bin",
        "dense1.bin",
    ];

    /// Loads every layer from its record in the given directory.
    pub fn load<P: AsRef<Path>>(dir: P) -> RecordResult<Self> {
        let dir = dir.as_ref();
        let [conv1, pool1, conv2, pool2, dense1] = Self::RECORDS.map(|name| dir.join(name));

        let model = Self::new(
            load_record(conv1)?,
            load_record(pool1)?,
            load_record(conv2)?,
            load_record(pool2)?,
            load_record(dense1)?,
        );
        log::info!(
            "Loaded model from {} ({} and {} kernels)",
            dir.display(),
            model.conv1.num_kernels(),
            model.conv2.num_kernels()
        );

        Ok(model)
    }

    /// Saves every layer to its record in the given directory.
    pub fn save<P: AsRef<Path>>(&self, dir: P) -> RecordResult<()> {
        let dir = dir.as_ref();
        let [conv1, pool1, conv2, pool2, dense1] = Self::RECORDS.map(|name| dir.join(name));

        save_record(&self.conv1, conv1)?;
        save_record(&self.pool1, pool1)?;
        save_record(&self.conv2, conv2)?;
        save_record(&self.pool2, pool2)?;
        save_record(&self.dense1, dense1)
    }

    /// Replaces the activation of the classifier output.
    pub fn with_softmax(mut self, softmax: Activation) -> Self {
        self.softmax = softmax;
        self
    }

    /// Runs a forward pass, returning the flat class scores `[1, classes, 1]`.
    pub fn forward(&self, image: &Tensor) -> TensorResult<Tensor> {
        let x = self.conv1.forward(image, Activation::Relu)?;
        let x = pool(&x, &self.pool1)?;
        let x = self.conv2.forward(&x, Activation::Sigmoid)?;
        let mut x = pool(&x, &self.pool2)?;
        flatten(&mut x);

        self.dense1.forward(&x, self.softmax)
    }

    /// Runs a forward pass and returns the predicted class with the class scores.
    pub fn predict(&self, image: &Tensor) -> TensorResult<(usize, Tensor)> {
        let output = self.forward(image)?;
        let class = argmax(&output)?;

        Ok((class, output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rawnet_tensor::Kernel;

    fn identity_kernel() -> Kernel {
        Kernel::new(Tensor::from_floats(&[1.0], [1, 1, 1]).unwrap(), [1, 1], 0.0)
    }

    fn model() -> ConvNet {
        let weights =
            Tensor::from_floats(&[1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0], [4, 2, 1]).unwrap();

        ConvNet::new(
            Convolutional::new(vec![identity_kernel()]),
            Pooler::new([1, 1], [1, 1]),
            Convolutional::new(vec![identity_kernel()]),
            Pooler::new([1, 1], [1, 1]),
            Dense::new(weights, Tensor::zeros([1, 2, 1]).unwrap()),
        )
    }

    #[test]
    fn should_output_flat_distribution() {
        let image = Tensor::from_floats(&[1.0, -1.0, 2.0, 0.0], [2, 2, 1]).unwrap();

        let output = model().forward(&image).unwrap();

        assert_eq!(output.dims(), [1, 2, 1]);
        assert_abs_diff_eq!(output.as_slice().iter().sum::<f32>(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn should_predict_argmax_class() {
        let image = Tensor::from_floats(&[5.0, 0.0, -5.0, 0.0], [2, 2, 1]).unwrap();

        let (class, output) = model().predict(&image).unwrap();

        assert_eq!(class, 0);
        assert!(output.as_slice()[0] > output.as_slice()[1]);
    }

    #[test]
    fn should_use_configured_softmax() {
        let model = model().with_softmax(Activation::StableSoftmax(SoftmaxScope::Plane));

        assert_eq!(
            model.softmax,
            Activation::StableSoftmax(SoftmaxScope::Plane)
        );
    }
}
