use core::fmt::Debug;
use std::path::Path;

/// Configuration IO error.
#[derive(Debug)]
pub enum ConfigError {
    /// Invalid format.
    InvalidFormat(String),

    /// File not found.
    FileNotFound(String),

    /// The configuration couldn't be written.
    WriteFailed(String),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut message = "Config error => ".to_string();

        match self {
            Self::InvalidFormat(err) => {
                message += format!("Invalid format: {err}").as_str();
            }
            Self::FileNotFound(err) => {
                message += format!("File not found: {err}").as_str();
            }
            Self::WriteFailed(err) => {
                message += format!("Write failed: {err}").as_str();
            }
        };

        f.write_str(message.as_str())
    }
}

impl std::error::Error for ConfigError {}

/// Configuration trait.
///
/// Configurations are stored as pretty printed JSON.
pub trait Config: Debug + serde::Serialize + serde::de::DeserializeOwned {
    /// Saves the configuration to a file.
    ///
    /// # Arguments
    ///
    /// * `file` - File to save the configuration to.
    fn save<P: AsRef<Path>>(&self, file: P) -> Result<(), ConfigError> {
        let content = config_to_json(self)?;

        std::fs::write(file.as_ref(), content).map_err(|err| {
            ConfigError::WriteFailed(format!("{}: {err}", file.as_ref().display()))
        })
    }

    /// Loads the configuration from a file.
    ///
    /// # Arguments
    ///
    /// * `file` - File to load the configuration from.
    ///
    /// # Returns
    ///
    /// The loaded configuration.
    fn load<P: AsRef<Path>>(file: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(file.as_ref())
            .map_err(|_| ConfigError::FileNotFound(file.as_ref().to_string_lossy().to_string()))?;
        config_from_str(&content)
    }

    /// Loads the configuration from a binary buffer.
    ///
    /// # Arguments
    ///
    /// * `data` - Binary buffer to load the configuration from.
    ///
    /// # Returns
    ///
    /// The loaded configuration.
    fn load_binary(data: &[u8]) -> Result<Self, ConfigError> {
        let content = core::str::from_utf8(data).map_err(|_| {
            ConfigError::InvalidFormat("Could not parse data as utf-8.".to_string())
        })?;
        config_from_str(content)
    }
}

/// Converts a configuration to a JSON string.
pub fn config_to_json<C: Config>(config: &C) -> Result<String, ConfigError> {
    serde_json::to_string_pretty(config).map_err(|err| ConfigError::InvalidFormat(format!("{err}")))
}

fn config_from_str<C: Config>(content: &str) -> Result<C, ConfigError> {
    serde_json::from_str(content).map_err(|err| ConfigError::InvalidFormat(format!("{err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct StageConfig {
        kernels: usize,
        #[serde(default = "default_stride")]
        stride: usize,
    }

    fn default_stride() -> usize {
        1
    }

    impl Config for StageConfig {}

    #[test]
    fn should_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("stage.json");
        let config = StageConfig {
            kernels: 4,
            stride: 2,
        };

        config.save(&file).unwrap();

        assert_eq!(StageConfig::load(&file).unwrap(), config);
    }

    #[test]
    fn should_fill_defaults() {
        let config = StageConfig::load_binary(br#"{ "kernels": 2 }"#).unwrap();

        assert_eq!(
            config,
            StageConfig {
                kernels: 2,
                stride: 1
            }
        );
    }

    #[test]
    fn should_report_missing_file() {
        let result = StageConfig::load("does/not/exist.json");

        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn should_report_invalid_format() {
        let result = StageConfig::load_binary(b"kernels = 2");

        assert!(matches!(result, Err(ConfigError::InvalidFormat(_))));
    }
}
