//! One-hot encoding for categorical features.

use crate::backend::{Backend, Tensor2D};
use crate::preprocessing::encoding::HandleUnknown;
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::marker::PhantomData;

/// One-hot encoder for categorical features.
///
/// Each input column is a categorical feature. `fit` learns the sorted set
/// of distinct values per column; `transform` emits one indicator column per
/// learned category, column blocks in input order.
///
/// ```ignore
/// let data = Tensor2D::new(vec![0.0, 1.0, 2.0], 3, 1);
/// let fitted = OneHotEncoder::<CpuBackend>::new().fit(&data)?;
/// let encoded = fitted.transform(&data)?; // 3x3 identity
/// ```
#[derive(Clone, Debug)]
pub struct OneHotEncoder<B: Backend> {
    handle_unknown: HandleUnknown,
    _backend: PhantomData<B>,
}

impl<B: Backend> OneHotEncoder<B> {
    pub fn new() -> Self {
        Self {
            handle_unknown: HandleUnknown::default(),
            _backend: PhantomData,
        }
    }

    /// Set the strategy for handling unknown categories.
    pub fn with_handle_unknown(mut self, strategy: HandleUnknown) -> Self {
        self.handle_unknown = strategy;
        self
    }
}

impl<B: Backend> Default for OneHotEncoder<B> {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable parameters for a fitted OneHotEncoder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoderParams {
    /// Sorted categories for each input column.
    pub categories: Vec<Vec<i64>>,
    pub handle_unknown: HandleUnknown,
}

/// Fitted OneHotEncoder ready for inference.
#[derive(Clone, Debug)]
pub struct FittedOneHotEncoder<B: Backend> {
    categories: Vec<Vec<i64>>,
    n_features_out: usize,
    handle_unknown: HandleUnknown,
    _backend: PhantomData<B>,
}

impl<B: Backend> FittedOneHotEncoder<B> {
    /// Categories learned for each input column, ascending.
    pub fn categories(&self) -> &[Vec<i64>] {
        &self.categories
    }

    pub fn handle_unknown(&self) -> HandleUnknown {
        self.handle_unknown
    }
}

fn as_category(val: f64) -> Option<i64> {
    if val.is_finite() && val >= 0.0 && val.fract() == 0.0 {
        Some(val as i64)
    } else {
        None
    }
}

impl<B: Backend> Transformer<B> for OneHotEncoder<B> {
    type Input = Tensor2D<B>;
    type Output = Tensor2D<B>;
    type Params = OneHotEncoderParams;
    type Fitted = FittedOneHotEncoder<B>;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        let (rows, cols) = data.shape();
        if rows == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit OneHotEncoder on empty data".to_string(),
            ));
        }

        let values = data.to_vec();
        let mut categories = Vec::with_capacity(cols);
        for col in 0..cols {
            let mut seen = BTreeSet::new();
            for row in 0..rows {
                let val = values[row * cols + col];
                if val.is_nan() {
                    return Err(PreprocessingError::MissingValues(format!(
                        "NaN at ({}, {})",
                        row, col
                    )));
                }
                let cat = as_category(val).ok_or_else(|| {
                    PreprocessingError::InvalidParameter(format!(
                        "OneHotEncoder expects non-negative integer values, got {} at ({}, {})",
                        val, row, col
                    ))
                })?;
                seen.insert(cat);
            }
            categories.push(seen.into_iter().collect());
        }

        FittedOneHotEncoder::from_params(OneHotEncoderParams {
            categories,
            handle_unknown: self.handle_unknown,
        })
    }
}

impl<B: Backend> FittedTransformer<B> for FittedOneHotEncoder<B> {
    type Input = Tensor2D<B>;
    type Output = Tensor2D<B>;
    type Params = OneHotEncoderParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        let (rows, cols) = data.shape();
        if cols != self.categories.len() {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.categories.len(),
                got_features: cols,
            });
        }

        let values = data.to_vec();
        let mut result = vec![0.0; rows * self.n_features_out];
        for row in 0..rows {
            let mut offset = row * self.n_features_out;
            for (col, cats) in self.categories.iter().enumerate() {
                let val = values[row * cols + col];
                if val.is_nan() {
                    return Err(PreprocessingError::MissingValues(format!(
                        "NaN at ({}, {})",
                        row, col
                    )));
                }
                match as_category(val).and_then(|c| cats.binary_search(&c).ok()) {
                    Some(idx) => result[offset + idx] = 1.0,
                    None if self.handle_unknown == HandleUnknown::Error => {
                        return Err(PreprocessingError::UnknownCategory { column: col, value: val });
                    }
                    // Ignore: block stays zero
                    None => {}
                }
                offset += cats.len();
            }
        }

        Ok(Tensor2D::new(result, rows, self.n_features_out))
    }

    fn extract_params(&self) -> Self::Params {
        OneHotEncoderParams {
            categories: self.categories.clone(),
            handle_unknown: self.handle_unknown,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        for (col, cats) in params.categories.iter().enumerate() {
            if cats.is_empty() || cats.windows(2).any(|w| w[0] >= w[1]) {
                return Err(PreprocessingError::InvalidParameter(format!(
                    "categories of column {} must be non-empty and strictly ascending",
                    col
                )));
            }
        }
        Ok(Self {
            n_features_out: params.categories.iter().map(Vec::len).sum(),
            categories: params.categories,
            handle_unknown: params.handle_unknown,
            _backend: PhantomData,
        })
    }

    fn n_features_in(&self) -> usize {
        self.categories.len()
    }

    fn n_features_out(&self) -> usize {
        self.n_features_out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_one_hot_encoder_single_column() {
        let data = Tensor2D::<CpuBackend>::new(vec![0.0, 1.0, 2.0], 3, 1);
        let fitted = OneHotEncoder::<CpuBackend>::new().fit(&data).unwrap();

        assert_eq!(fitted.n_features_in(), 1);
        assert_eq!(fitted.n_features_out(), 3);
        assert_eq!(fitted.categories()[0], vec![0, 1, 2]);

        let transformed = fitted.transform(&data).unwrap();
        assert_eq!(
            transformed.to_vec(),
            vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]
        );
    }

    #[test]
    fn test_one_hot_encoder_sparse_categories() {
        // category 1 never appears
        let data = Tensor2D::<CpuBackend>::new(vec![2.0, 0.0], 2, 1);
        let fitted = OneHotEncoder::<CpuBackend>::new().fit(&data).unwrap();

        assert_eq!(fitted.categories()[0], vec![0, 2]);
        assert_eq!(fitted.transform(&data).unwrap().to_vec(), vec![0.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_one_hot_encoder_multiple_columns() {
        // col 0: {0, 1, 2}, col 1: {0, 1}
        let data = Tensor2D::<CpuBackend>::new(vec![0.0, 1.0, 2.0, 0.0, 1.0, 0.0], 3, 2);
        let fitted = OneHotEncoder::<CpuBackend>::new().fit(&data).unwrap();

        assert_eq!(fitted.n_features_out(), 5);
        let vals = fitted.transform(&data).unwrap().to_vec();
        assert_eq!(&vals[0..5], &[1.0, 0.0, 0.0, 0.0, 1.0]);
        assert_eq!(&vals[5..10], &[0.0, 0.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_one_hot_encoder_unknown_error() {
        let train = Tensor2D::<CpuBackend>::new(vec![0.0, 1.0], 2, 1);
        let test = Tensor2D::<CpuBackend>::new(vec![2.0], 1, 1);
        let fitted = OneHotEncoder::<CpuBackend>::new().fit(&train).unwrap();

        assert!(matches!(
            fitted.transform(&test),
            Err(PreprocessingError::UnknownCategory { column: 0, .. })
        ));
    }

    #[test]
    fn test_one_hot_encoder_unknown_ignore() {
        let train = Tensor2D::<CpuBackend>::new(vec![0.0, 1.0, 5.0, 6.0], 2, 2);
        let test = Tensor2D::<CpuBackend>::new(vec![3.0, 6.0], 1, 2);
        let fitted = OneHotEncoder::<CpuBackend>::new()
            .with_handle_unknown(HandleUnknown::Ignore)
            .fit(&train)
            .unwrap();

        // unknown first column leaves its block zero; second column still encoded
        assert_eq!(fitted.transform(&test).unwrap().to_vec(), vec![0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_one_hot_encoder_rejects_invalid_values() {
        for bad in [-1.0, 0.5] {
            let data = Tensor2D::<CpuBackend>::new(vec![bad, 1.0], 2, 1);
            let err = OneHotEncoder::<CpuBackend>::new().fit(&data).unwrap_err();
            assert!(matches!(err, PreprocessingError::InvalidParameter(_)));
        }
        let data = Tensor2D::<CpuBackend>::new(vec![f64::NAN, 1.0], 2, 1);
        let err = OneHotEncoder::<CpuBackend>::new().fit(&data).unwrap_err();
        assert!(matches!(err, PreprocessingError::MissingValues(_)));
    }

    #[test]
    fn test_one_hot_encoder_empty_data() {
        let data = Tensor2D::<CpuBackend>::zeros(0, 2);
        let err = OneHotEncoder::<CpuBackend>::new().fit(&data).unwrap_err();
        assert!(matches!(err, PreprocessingError::EmptyData(_)));
    }

    #[test]
    fn test_one_hot_encoder_empty_transform() {
        let data = Tensor2D::<CpuBackend>::new(vec![0.0, 1.0], 2, 1);
        let fitted = OneHotEncoder::<CpuBackend>::new().fit(&data).unwrap();
        let result = fitted.transform(&Tensor2D::zeros(0, 1)).unwrap();
        assert_eq!(result.shape(), (0, 2));
    }

    #[test]
    fn test_one_hot_encoder_feature_mismatch() {
        let train = Tensor2D::<CpuBackend>::new(vec![0.0, 1.0, 2.0, 3.0], 2, 2);
        let test = Tensor2D::<CpuBackend>::new(vec![0.0, 1.0, 2.0], 1, 3);
        let fitted = OneHotEncoder::<CpuBackend>::new().fit(&train).unwrap();

        assert!(matches!(
            fitted.transform(&test),
            Err(PreprocessingError::FeatureMismatch { .. })
        ));
    }

    #[test]
    fn test_one_hot_encoder_params_roundtrip() {
        let data = Tensor2D::<CpuBackend>::new(vec![3.0, 1.0, 2.0], 3, 1);
        let fitted = OneHotEncoder::<CpuBackend>::new()
            .with_handle_unknown(HandleUnknown::Ignore)
            .fit(&data)
            .unwrap();

        let restored =
            FittedOneHotEncoder::<CpuBackend>::from_params(fitted.extract_params()).unwrap();
        assert_eq!(restored.handle_unknown(), HandleUnknown::Ignore);
        assert_eq!(
            restored.transform(&data).unwrap().to_vec(),
            fitted.transform(&data).unwrap().to_vec()
        );
    }

    #[test]
    fn test_one_hot_encoder_from_params_rejects_unsorted() {
        let params = OneHotEncoderParams {
            categories: vec![vec![2, 1]],
            handle_unknown: HandleUnknown::Error,
        };
        assert!(FittedOneHotEncoder::<CpuBackend>::from_params(params).is_err());
    }
}
