//! Run configuration, loaded from TOML.
//!
//! ```toml
//! [data]
//! path = "raw_data/train.csv"
//! nrows = 10000
//!
//! [features]
//! utc_offset_hours = -5
//!
//! [training]
//! test_size = 0.15
//! seed = 42
//!
//! [output]
//! model_path = "trained_model/model.bin"
//! ```
//!
//! Every section and key is optional; omitted values take their defaults.

use crate::data::CleaningBounds;
use crate::error::{Result, TaxiFareError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub cleaning: CleaningBounds,
    pub features: FeaturesConfig,
    pub training: TrainingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub path: PathBuf,
    /// Maximum number of CSV records to read; `None` reads everything.
    pub nrows: Option<usize>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("raw_data/train.csv"),
            nrows: Some(10_000),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesConfig {
    /// Fixed offset from UTC at which calendar features are read.
    pub utc_offset_hours: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Fraction of rows held out for evaluation.
    pub test_size: f64,
    /// Seed for the train/test shuffle. `None` draws a fresh seed per run.
    pub seed: Option<u64>,
    pub learning_rate: f64,
    pub epochs: usize,
    pub batch_size: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_size: 0.15,
            seed: None,
            learning_rate: 0.05,
            epochs: 200,
            batch_size: 64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub model_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("trained_model/model.bin"),
        }
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates the TOML file at `path`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| TaxiFareError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Like [`from_file`](Self::from_file), but a missing file yields the
    /// default configuration.
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        let t = &self.training;
        if !(t.test_size > 0.0 && t.test_size < 1.0) {
            return Err(TaxiFareError::Config(format!(
                "training.test_size must be in (0, 1), got {}",
                t.test_size
            )));
        }
        if !(t.learning_rate > 0.0 && t.learning_rate.is_finite()) {
            return Err(TaxiFareError::Config(format!(
                "training.learning_rate must be positive, got {}",
                t.learning_rate
            )));
        }
        if t.epochs == 0 {
            return Err(TaxiFareError::Config(
                "training.epochs must be positive".to_string(),
            ));
        }
        if t.batch_size == 0 {
            return Err(TaxiFareError::Config(
                "training.batch_size must be positive".to_string(),
            ));
        }
        if !(-23..=23).contains(&self.features.utc_offset_hours) {
            return Err(TaxiFareError::Config(format!(
                "features.utc_offset_hours must be within ±23, got {}",
                self.features.utc_offset_hours
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.data.nrows, Some(10_000));
        assert_eq!(config.training.test_size, 0.15);
        assert_eq!(config.training.seed, None);
        assert_eq!(config.output.model_path, PathBuf::from("trained_model/model.bin"));
        assert_eq!(config.cleaning, CleaningBounds::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_toml() {
        let config = Config::from_toml_str(
            r#"
            [training]
            seed = 7
            epochs = 50

            [cleaning]
            fare_amount = [0.0, 500.0]

            [features]
            utc_offset_hours = -5
            "#,
        )
        .unwrap();
        assert_eq!(config.training.seed, Some(7));
        assert_eq!(config.training.epochs, 50);
        assert_eq!(config.training.batch_size, 64);
        assert_eq!(config.cleaning.fare_amount, (0.0, 500.0));
        assert_eq!(config.cleaning.pickup_latitude, (40.0, 42.0));
        assert_eq!(config.features.utc_offset_hours, -5);
    }

    #[test]
    fn test_invalid_values_rejected() {
        for toml in [
            "[training]\ntest_size = 1.0",
            "[training]\nlearning_rate = 0.0",
            "[training]\nbatch_size = 0",
            "[training]\nepochs = 0",
            "[features]\nutc_offset_hours = 24",
            "[training]\nepochs = \"many\"",
        ] {
            assert!(
                matches!(Config::from_toml_str(toml), Err(TaxiFareError::Config(_))),
                "{}",
                toml
            );
        }
    }

    #[test]
    fn test_file_loading() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("taxifare.toml");
        assert_eq!(Config::from_file_or_default(&missing).unwrap(), Config::default());
        assert!(matches!(Config::from_file(&missing), Err(TaxiFareError::Config(_))));

        std::fs::write(&missing, "[output]\nmodel_path = \"out/m.bin\"\n").unwrap();
        let config = Config::from_file_or_default(&missing).unwrap();
        assert_eq!(config.output.model_path, PathBuf::from("out/m.bin"));
    }
}
