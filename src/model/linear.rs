//! Linear regression with compile-time state tracking.
//!
//! - [`LinearRegression`] = `LinearModel<Unfitted>`, used during training.
//! - `LinearModel<Fitted>`, inference-only and serializable.
//!
//! The fare model is `fare = w · features + b` over the assembled feature
//! matrix; weights start at zero.

use crate::backend::{Backend, Scalar, Tensor1D, Tensor2D};
use crate::model::{Fitted, InferenceModel, ModelError, ParamOps, TrainableModel, Unfitted};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Trainable parameters of a linear model: weights and bias.
#[derive(Clone, Debug)]
pub struct LinearParams<B: Backend> {
    pub weights: Tensor1D<B>,
    pub bias: Scalar<B>,
}

/// Plain-data form of [`LinearParams`].
///
/// Stored as `f64` so a reloaded model predicts exactly what the in-memory
/// model predicted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializableLinearParams {
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl<B: Backend> From<&LinearParams<B>> for SerializableLinearParams {
    fn from(params: &LinearParams<B>) -> Self {
        Self {
            weights: params.weights.to_vec(),
            bias: params.bias.to_f64(),
        }
    }
}

impl<B: Backend> TryFrom<SerializableLinearParams> for LinearParams<B> {
    type Error = ModelError;

    fn try_from(value: SerializableLinearParams) -> Result<Self, Self::Error> {
        if !value.bias.is_finite() || value.weights.iter().any(|w| !w.is_finite()) {
            return Err(ModelError::InvalidParams(
                "weights and bias must be finite".to_string(),
            ));
        }
        Ok(Self {
            weights: Tensor1D::<B>::new(value.weights),
            bias: Scalar::<B>::new(value.bias),
        })
    }
}

impl<B: Backend> ParamOps<B> for LinearParams<B> {
    fn add(&self, other: &Self) -> Self {
        Self {
            weights: self.weights.add(&other.weights),
            bias: self.bias + other.bias,
        }
    }

    fn scale(&self, scalar: Scalar<B>) -> Self {
        Self {
            weights: self.weights.scale(&scalar),
            bias: self.bias * scalar,
        }
    }
}

/// A linear model with state encoded at the type level.
///
/// - `S = Unfitted`: implements [`TrainableModel`].
/// - `S = Fitted`: implements [`InferenceModel`].
pub struct LinearModel<B: Backend, S> {
    params: LinearParams<B>,
    _state: PhantomData<S>,
}

impl<B: Backend> Clone for LinearModel<B, Fitted> {
    fn clone(&self) -> Self {
        Self::new(self.params.clone())
    }
}

impl<B: Backend, S> std::fmt::Debug for LinearModel<B, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinearModel")
            .field("params", &self.params)
            .finish()
    }
}

impl<B: Backend> LinearModel<B, Fitted> {
    /// Creates a fitted linear model from trained parameters.
    pub fn new(params: LinearParams<B>) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }

    pub fn n_features(&self) -> usize {
        self.params.weights.len()
    }
}

/// Inference for a trained linear model: `y = wᵀx + b`.
impl<B: Backend> InferenceModel<B> for LinearModel<B, Fitted> {
    type InputSingle = Tensor1D<B>;
    type InputBatch = Tensor2D<B>;
    type OutputSingle = Scalar<B>;
    type OutputBatch = Tensor1D<B>;
    type ParamsRepr = SerializableLinearParams;

    fn predict(&self, input: &Self::InputSingle) -> Self::OutputSingle {
        self.params.weights.dot(input) + self.params.bias
    }

    fn predict_batch(&self, input: &Self::InputBatch) -> Self::OutputBatch {
        input
            .dot(&self.params.weights)
            .add_scalar(&self.params.bias)
    }

    fn extract_params(&self) -> Self::ParamsRepr {
        (&self.params).into()
    }

    fn from_params(params: Self::ParamsRepr) -> Result<Self, ModelError> {
        Ok(Self::new(LinearParams::<B>::try_from(params)?))
    }
}

/// Forward pass: `X @ w + b`
/// Backward pass: `∇w = Xᵀ · grad`, `∇b = Σ grad`
impl<B: Backend> TrainableModel<B> for LinearModel<B, Unfitted> {
    type Params = LinearParams<B>;
    type Gradients = LinearParams<B>;
    type Prediction = Tensor1D<B>;
    type Input = Tensor2D<B>;
    type Output = LinearModel<B, Fitted>;

    fn forward(&self, x: &Self::Input) -> Self::Prediction {
        x.dot(&self.params.weights).add_scalar(&self.params.bias)
    }

    fn params(&self) -> &Self::Params {
        &self.params
    }

    fn update_params(&mut self, params: &Self::Params) {
        self.params = params.clone();
    }

    fn into_fitted(self) -> LinearModel<B, Fitted> {
        LinearModel::<B, Fitted>::new(self.params)
    }

    fn backward(&self, x: &Self::Input, grad_output: &Self::Prediction) -> Self::Gradients {
        LinearParams {
            weights: x.tdot(grad_output),
            bias: grad_output.sum(),
        }
    }
}

/// An **unfitted** linear regression model, the input to the SGD trainer.
pub type LinearRegression<B> = LinearModel<B, Unfitted>;

impl<B: Backend> LinearRegression<B> {
    /// Zero-initialised model over `n_features` inputs.
    pub fn new(n_features: usize) -> Self {
        Self {
            params: LinearParams {
                weights: Tensor1D::<B>::zeros(n_features),
                bias: Scalar::<B>::new(0.),
            },
            _state: PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    fn params(weights: Vec<f64>, bias: f64) -> LinearParams<CpuBackend> {
        LinearParams {
            weights: Tensor1D::new(weights),
            bias: Scalar::new(bias),
        }
    }

    #[test]
    fn test_param_ops_add() {
        let result = params(vec![1.0, 2.0], 0.5).add(&params(vec![0.5, 1.0], 0.5));
        assert_eq!(result.weights.to_vec(), vec![1.5, 3.0]);
        assert_eq!(result.bias.to_f64(), 1.0);
    }

    #[test]
    fn test_param_ops_scale() {
        let result = params(vec![2.0, 4.0], 1.0).scale(Scalar::new(-0.5));
        assert_eq!(result.weights.to_vec(), vec![-1.0, -2.0]);
        assert_eq!(result.bias.to_f64(), -0.5);
    }

    #[test]
    fn test_linear_regression_new_zero_initialized() {
        let model = LinearRegression::<CpuBackend>::new(3);
        assert_eq!(model.params().weights.to_vec(), vec![0.0, 0.0, 0.0]);
        assert_eq!(model.params().bias.to_f64(), 0.0);
    }

    #[test]
    fn test_linear_regression_forward_batch() {
        let mut model = LinearRegression::<CpuBackend>::new(2);
        model.update_params(&params(vec![2.0, -1.0], 0.5));
        let x = Tensor2D::<CpuBackend>::new(vec![1.0, 1.0, 3.0, 2.0], 2, 2);
        assert_eq!(model.forward(&x).to_vec(), vec![1.5, 4.5]);
    }

    #[test]
    fn test_linear_regression_backward_batch() {
        let model = LinearRegression::<CpuBackend>::new(2);
        let x = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
        let grad = Tensor1D::<CpuBackend>::new(vec![1.0, -1.0]);
        let g = model.backward(&x, &grad);
        assert_eq!(g.weights.to_vec(), vec![-2.0, -2.0]);
        assert_eq!(g.bias.to_f64(), 0.0);
    }

    #[test]
    fn test_linear_model_predict_single_and_batch_agree() {
        let fitted = LinearModel::<CpuBackend, Fitted>::new(params(vec![0.5, 2.0], 1.0));
        let single = fitted.predict(&Tensor1D::new(vec![2.0, 3.0])).to_f64();
        let batch = fitted.predict_batch(&Tensor2D::new(vec![2.0, 3.0], 1, 2));
        assert_eq!(single, 8.0);
        assert_eq!(batch.to_vec(), vec![single]);
    }

    #[test]
    fn test_linear_model_params_roundtrip_is_exact() {
        let fitted =
            LinearModel::<CpuBackend, Fitted>::new(params(vec![0.1 + 0.2, 1.0 / 3.0], -7.25));
        let restored =
            LinearModel::<CpuBackend, Fitted>::from_params(fitted.extract_params()).unwrap();
        assert_eq!(restored.extract_params(), fitted.extract_params());
        assert_eq!(restored.n_features(), 2);
    }

    #[test]
    fn test_from_params_rejects_non_finite() {
        let bad = SerializableLinearParams {
            weights: vec![1.0, f64::NAN],
            bias: 0.0,
        };
        let err = LinearModel::<CpuBackend, Fitted>::from_params(bad).unwrap_err();
        assert!(matches!(err, ModelError::InvalidParams(_)));
    }
}
