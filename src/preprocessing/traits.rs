//! Core traits for preprocessing transformers.
//!
//! - [`Transformer`]: configuration only; `fit` learns parameters and returns
//!   a new fitted value.
//! - [`FittedTransformer`]: immutable learned state; `transform` is pure.
//! - [`FeatureDeriver`]: stateless row-wise feature derivation, no fit step.
//!
//! Fitting never mutates the transformer it is called on, and transforming
//! never mutates the fitted value, so a transformer fit on the training split
//! is applied unchanged to any later data.

use crate::backend::{Backend, Tensor2D};
use crate::preprocessing::error::PreprocessingError;
use crate::serialization::SerializableParams;

/// An unfitted transformer with hyperparameters.
///
/// ```ignore
/// let fitted = StandardScaler::<CpuBackend>::new().fit(&train)?;
/// let scaled_test = fitted.transform(&test)?;
/// ```
pub trait Transformer<B: Backend>: Clone {
    /// Input data type for transformation.
    type Input: ?Sized;
    /// Output data type after transformation.
    type Output;
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;
    /// The fitted transformer type ready for inference.
    type Fitted: FittedTransformer<
        B,
        Params = Self::Params,
        Input = Self::Input,
        Output = Self::Output,
    >;

    /// Learns parameters from `data`.
    ///
    /// # Errors
    /// Empty data, invalid values, or an incompatible shape.
    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError>;

    /// Fits and transforms the same data in one step.
    fn fit_transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        self.fit(data)?.transform(data)
    }
}

/// A fitted transformer ready for inference.
///
/// `extract_params()` followed by `from_params()` reproduces a transformer
/// with identical output.
pub trait FittedTransformer<B: Backend>: Clone {
    /// Input data type for transformation.
    type Input: ?Sized;
    /// Output data type after transformation.
    type Output;
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;

    /// Transforms data using learned parameters.
    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError>;

    /// Extracts learned parameters as a serializable representation.
    fn extract_params(&self) -> Self::Params;

    /// Reconstructs a fitted transformer from parameters.
    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError>
    where
        Self: Sized;

    /// Number of features seen during fit.
    fn n_features_in(&self) -> usize;

    /// Number of columns `transform` produces.
    fn n_features_out(&self) -> usize;

    fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), PreprocessingError> {
        let bytes = self
            .extract_params()
            .to_bytes()
            .map_err(|e| PreprocessingError::SerializationError(e.to_string()))?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, PreprocessingError>
    where
        Self: Sized,
    {
        let bytes = std::fs::read(path)?;
        let params = Self::Params::from_bytes(&bytes)
            .map_err(|e| PreprocessingError::SerializationError(e.to_string()))?;
        Self::from_params(params)
    }
}

/// Stateless derivation of numeric feature columns from raw rows.
///
/// Implementors are pure functions of each row: the output for a row never
/// depends on any other row.
pub trait FeatureDeriver {
    /// Raw row type the deriver reads from.
    type Row;

    /// Names of the input columns this deriver reads.
    fn input_columns(&self) -> Vec<&str>;

    /// Names of the derived columns, in output order.
    fn output_columns(&self) -> Vec<&'static str>;

    /// Derives a `(rows.len(), output_columns().len())` matrix.
    fn derive<B: Backend>(&self, rows: &[Self::Row]) -> Result<Tensor2D<B>, PreprocessingError>;
}
