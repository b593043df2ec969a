//! Models with compile-time training state.
//!
//! A model is either [`Unfitted`] (implements [`TrainableModel`], driven by
//! the SGD [`Trainer`](crate::trainer::Trainer)) or [`Fitted`] (implements
//! [`InferenceModel`], carries only prediction parameters).

use crate::backend::{Backend, Scalar};
use thiserror::Error;

pub mod linear;
pub mod state;

pub use linear::{LinearModel, LinearParams, LinearRegression, SerializableLinearParams};
pub use state::{Fitted, Unfitted};

/// Error raised when rebuilding a model from stored parameters.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid model parameters: {0}")]
    InvalidParams(String),
}

/// Training-side interface: forward pass, gradients, parameter updates.
pub trait TrainableModel<B: Backend> {
    type Input;
    type Prediction;
    type Params;
    type Gradients;
    /// The inference model produced once training finishes.
    type Output;

    fn forward(&self, input: &Self::Input) -> Self::Prediction;
    fn backward(&self, input: &Self::Input, grad_output: &Self::Prediction) -> Self::Gradients;
    fn params(&self) -> &Self::Params;
    fn update_params(&mut self, new_params: &Self::Params);

    fn into_fitted(self) -> Self::Output;
}

/// Arithmetic the optimizer needs on a parameter set.
pub trait ParamOps<B: Backend>: Clone {
    fn add(&self, other: &Self) -> Self;
    fn scale(&self, scalar: Scalar<B>) -> Self;
}

/// Inference-side interface of a fitted model.
pub trait InferenceModel<B: Backend>: Sized {
    type InputSingle;
    type OutputSingle;
    type InputBatch;
    type OutputBatch;
    /// Plain-data parameter representation used for persistence.
    type ParamsRepr;

    fn predict(&self, input: &Self::InputSingle) -> Self::OutputSingle;
    fn predict_batch(&self, input: &Self::InputBatch) -> Self::OutputBatch;

    fn extract_params(&self) -> Self::ParamsRepr;
    fn from_params(params: Self::ParamsRepr) -> Result<Self, ModelError>;
}
