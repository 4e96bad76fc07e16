use std::path::PathBuf;

use clap::Parser;
use rawnet_core::{Config, ConfigError};

use crate::{InferenceConfig, SoftmaxKind};

/// Evaluates the network over stored images and reports its accuracy.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Number of images to evaluate
    #[arg(required_unless_present = "config")]
    pub num_points: Option<usize>,

    /// JSON configuration file, overridden by the other arguments
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the layer records
    #[arg(long, value_name = "DIR")]
    pub model_dir: Option<PathBuf>,

    /// Directory holding the image records
    #[arg(long, value_name = "DIR")]
    pub images_dir: Option<PathBuf>,

    /// Directory holding the label records
    #[arg(long, value_name = "DIR")]
    pub labels_dir: Option<PathBuf>,

    /// Subtract the maximum score before the softmax
    #[arg(long)]
    pub stable_softmax: bool,

    /// Evaluate the images in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Log the raw output of every image
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Builds the run configuration, starting from the configuration file when one is given.
    pub fn to_config(&self) -> Result<InferenceConfig, ConfigError> {
        let mut config = match &self.config {
            Some(file) => InferenceConfig::load(file)?,
            None => InferenceConfig::new(self.num_points.unwrap_or_default()),
        };

        if let Some(num_points) = self.num_points {
            config.num_points = num_points;
        }
        if let Some(dir) = &self.model_dir {
            config.model_dir = dir.clone();
        }
        if let Some(dir) = &self.images_dir {
            config.images_dir = dir.clone();
        }
        if let Some(dir) = &self.labels_dir {
            config.labels_dir = dir.clone();
        }
        if self.stable_softmax {
            config.softmax = SoftmaxKind::Stable;
        }
        if self.parallel {
            config.parallel = true;
        }

        Ok(config)
    }
}
