//! Run-level error taxonomy.
//!
//! Every failure of a training run is tagged with the stage that produced
//! it. Lower-level errors convert into the matching stage via `From`, so
//! library code can use `?` throughout.

use crate::dataset::DatasetError;
use crate::metrics::MetricError;
use crate::model::ModelError;
use crate::preprocessing::PreprocessingError;
use crate::trainer::TrainingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaxiFareError {
    /// Malformed or missing columns, unparseable values, empty dataset.
    #[error("data error: {0}")]
    Data(String),
    /// Invalid coordinates, unparseable timestamps.
    #[error("feature error: {0}")]
    Feature(String),
    /// Degenerate training split or a failed fit.
    #[error("fit error: {0}")]
    Fit(String),
    /// Model artifact could not be written or read back.
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("evaluation error: {0}")]
    Evaluation(String),
    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, TaxiFareError>;

impl From<PreprocessingError> for TaxiFareError {
    fn from(err: PreprocessingError) -> Self {
        use PreprocessingError::*;
        let msg = err.to_string();
        match err {
            InvalidCoordinate(_) | MissingValues(_) | InvalidTimestamp(_) => Self::Feature(msg),
            SerializationError(_) | IoError(_) => Self::Persistence(msg),
            InvalidShape { .. }
            | NumericalError(_)
            | UnknownCategory { .. }
            | InvalidParameter(_)
            | EmptyData(_)
            | FeatureMismatch { .. } => Self::Fit(msg),
        }
    }
}

impl From<MetricError> for TaxiFareError {
    fn from(err: MetricError) -> Self {
        Self::Evaluation(err.to_string())
    }
}

impl From<TrainingError> for TaxiFareError {
    fn from(err: TrainingError) -> Self {
        Self::Fit(err.to_string())
    }
}

impl From<DatasetError> for TaxiFareError {
    fn from(err: DatasetError) -> Self {
        Self::Fit(err.to_string())
    }
}

impl From<ModelError> for TaxiFareError {
    fn from(err: ModelError) -> Self {
        Self::Persistence(err.to_string())
    }
}

impl From<bincode::Error> for TaxiFareError {
    fn from(err: bincode::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

impl From<csv::Error> for TaxiFareError {
    fn from(err: csv::Error) -> Self {
        Self::Data(err.to_string())
    }
}

impl From<toml::de::Error> for TaxiFareError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preprocessing_errors_map_to_stage() {
        let feature: TaxiFareError =
            PreprocessingError::InvalidCoordinate("latitude 91".to_string()).into();
        assert!(matches!(feature, TaxiFareError::Feature(_)));

        let fit: TaxiFareError = PreprocessingError::EmptyData("no rows".to_string()).into();
        assert!(matches!(fit, TaxiFareError::Fit(_)));

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let persist: TaxiFareError = PreprocessingError::from(io).into();
        assert!(matches!(persist, TaxiFareError::Persistence(_)));
    }

    #[test]
    fn test_message_names_stage() {
        let err: TaxiFareError = MetricError::Empty.into();
        assert!(err.to_string().starts_with("evaluation error:"));
        assert!(TaxiFareError::Fit("1 row".to_string())
            .to_string()
            .starts_with("fit error:"));
    }
}
