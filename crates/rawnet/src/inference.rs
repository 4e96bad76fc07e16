use core::fmt;
use std::path::{Path, PathBuf};

use rawnet_core::model::ConvNet;
use rawnet_core::record::{load_record, Label};
use rawnet_core::tensor::{iter_range_par, run_par};
use rawnet_core::tensor::{Activation, SoftmaxScope, Tensor};
use rawnet_core::Config;
use serde::{Deserialize, Serialize};

use crate::InferenceError;

/// The softmax applied to the classifier output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoftmaxKind {
    /// Exponentiates the raw scores.
    #[default]
    Naive,
    /// Subtracts the maximum score before exponentiating.
    Stable,
}

impl SoftmaxKind {
    /// The activation applied to the flat classifier output.
    pub fn activation(&self) -> Activation {
        match self {
            Self::Naive => Activation::Softmax(SoftmaxScope::Plane),
            Self::Stable => Activation::StableSoftmax(SoftmaxScope::Plane),
        }
    }
}

/// Configuration of an evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Directory holding `conv1.bin`, `pool1.bin`, `conv2.bin`, `pool2.bin` and `dense1.bin`.
    #[serde(default = "default_model_dir")]
    pub model_dir: PathBuf,
    /// Directory holding the `img_{i}.bin` image records.
    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,
    /// Directory holding the `img_{i}.bin` label records.
    #[serde(default = "default_labels_dir")]
    pub labels_dir: PathBuf,
    /// Number of images to evaluate, starting from `img_0.bin`.
    pub num_points: usize,
    /// The softmax applied to the classifier output.
    #[serde(default)]
    pub softmax: SoftmaxKind,
    /// Evaluate the images in parallel.
    #[serde(default)]
    pub parallel: bool,
}

fn default_model_dir() -> PathBuf {
    PathBuf::from("parameters")
}

fn default_images_dir() -> PathBuf {
    PathBuf::from("../data/images")
}

fn default_labels_dir() -> PathBuf {
    PathBuf::from("../data/labels")
}

impl Config for InferenceConfig {}

impl InferenceConfig {
    /// Creates a configuration evaluating `num_points` images from the default directories.
    pub fn new(num_points: usize) -> Self {
        Self {
            model_dir: default_model_dir(),
            images_dir: default_images_dir(),
            labels_dir: default_labels_dir(),
            num_points,
            softmax: SoftmaxKind::default(),
            parallel: false,
        }
    }

    /// Sets the directory of the layer records.
    pub fn with_model_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.model_dir = dir.into();
        self
    }

    /// Sets the directory of the image records.
    pub fn with_images_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.images_dir = dir.into();
        self
    }

    /// Sets the directory of the label records.
    pub fn with_labels_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.labels_dir = dir.into();
        self
    }

    /// Sets the number of images to evaluate.
    pub fn with_num_points(mut self, num_points: usize) -> Self {
        self.num_points = num_points;
        self
    }

    /// Sets the softmax applied to the classifier output.
    pub fn with_softmax(mut self, softmax: SoftmaxKind) -> Self {
        self.softmax = softmax;
        self
    }

    /// Sets whether the images are evaluated in parallel.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Path of the record of image `index`.
    pub fn image_path(&self, index: usize) -> PathBuf {
        record_path(&self.images_dir, index)
    }

    /// Path of the record of the label of image `index`.
    pub fn label_path(&self, index: usize) -> PathBuf {
        record_path(&self.labels_dir, index)
    }
}

fn record_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("img_{index}.bin"))
}

/// The outcome of the forward pass of a single image.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Index of the image.
    pub index: usize,
    /// The expected class.
    pub label: usize,
    /// The predicted class.
    pub predicted: usize,
    /// The class scores, `[1, classes, 1]`.
    pub output: Tensor,
}

impl Prediction {
    /// Whether the predicted class is the expected one.
    pub fn is_correct(&self) -> bool {
        self.label == self.predicted
    }
}

/// Accuracy of the model over the evaluated images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EvaluationReport {
    /// Number of correctly classified images.
    pub correct: usize,
    /// Number of evaluated images.
    pub total: usize,
}

impl EvaluationReport {
    /// Counts a prediction.
    pub fn update(&mut self, prediction: &Prediction) {
        self.total += 1;
        if prediction.is_correct() {
            self.correct += 1;
        }
    }

    /// The ratio of correctly classified images, `0` when nothing was evaluated.
    pub fn accuracy(&self) -> f32 {
        match self.total {
            0 => 0.0,
            total => self.correct as f32 / total as f32,
        }
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} correct; {} total; {}% accuracy;",
            self.correct,
            self.total,
            Significant(100.0 * self.accuracy())
        )
    }
}

/// Formats a value with 4 significant digits, dropping trailing zeros, the way `printf` does
/// with `%.4g`.
struct Significant(f32);

impl fmt::Display for Significant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0;
        if value == 0.0 || !value.is_finite() {
            return write!(f, "{value}");
        }

        let scientific = format!("{value:.3e}");
        let Some((mantissa, exp)) = scientific.split_once('e') else {
            return f.write_str(&scientific);
        };
        let Ok(exp) = exp.parse::<i32>() else {
            return f.write_str(&scientific);
        };

        if (-4..4).contains(&exp) {
            let fixed = format!("{:.*}", (3 - exp) as usize, value);
            f.write_str(trim_zeros(&fixed))
        } else {
            let sign = if exp < 0 { '-' } else { '+' };
            write!(f, "{}e{sign}{:02}", trim_zeros(mantissa), exp.abs())
        }
    }
}

fn trim_zeros(number: &str) -> &str {
    match number.contains('.') {
        true => number.trim_end_matches('0').trim_end_matches('.'),
        false => number,
    }
}

/// Loads the model described by the configuration.
pub fn load_model(config: &InferenceConfig) -> Result<ConvNet, InferenceError> {
    let model = ConvNet::load(&config.model_dir).map_err(InferenceError::Model)?;

    Ok(model.with_softmax(config.softmax.activation()))
}

/// Loads image `index` with its label and classifies it.
pub fn predict(
    model: &ConvNet,
    config: &InferenceConfig,
    index: usize,
) -> Result<Prediction, InferenceError> {
    let data_error = |source| InferenceError::Data { index, source };
    let image = load_record::<Tensor, _>(config.image_path(index)).map_err(data_error)?;
    let Label(label) = load_record::<Label, _>(config.label_path(index)).map_err(data_error)?;

    let (predicted, output) = model
        .predict(&image)
        .map_err(|source| InferenceError::Forward { index, source })?;

    Ok(Prediction {
        index,
        label,
        predicted,
        output,
    })
}

/// Loads the model and evaluates it over the configured images.
pub fn evaluate(config: &InferenceConfig) -> Result<EvaluationReport, InferenceError> {
    let model = load_model(config)?;
    evaluate_model(&model, config)
}

/// Evaluates the model over the configured images.
///
/// The run stops at the first image that fails. In parallel, the reported failure is one of the
/// failing images, not necessarily the first.
pub fn evaluate_model(
    model: &ConvNet,
    config: &InferenceConfig,
) -> Result<EvaluationReport, InferenceError> {
    let mut report = EvaluationReport::default();

    if config.parallel {
        if !cfg!(feature = "parallel") {
            log::warn!("Parallel evaluation requested without the `parallel` feature");
        }

        let predictions = run_par!(|| {
            iter_range_par!(0, config.num_points)
                .map(|index| predict(model, config, index))
                .collect::<Result<Vec<_>, _>>()
        })?;

        for prediction in predictions.iter() {
            report.update(prediction);
            log_prediction(prediction, &report, config.num_points);
        }
    } else {
        for index in 0..config.num_points {
            let prediction = predict(model, config, index)?;
            report.update(&prediction);
            log_prediction(&prediction, &report, config.num_points);
        }
    }

    Ok(report)
}

fn log_prediction(prediction: &Prediction, report: &EvaluationReport, num_points: usize) {
    log::info!(
        "{}/{} points; {}/{} correct; {}% accuracy;",
        report.total,
        num_points,
        report.correct,
        report.total,
        Significant(100.0 * report.accuracy())
    );
    log::debug!(
        "expected {}; raw output {:?};",
        prediction.label,
        prediction.output.as_slice()
    );
}
