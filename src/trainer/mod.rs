//! Training loops.
//!
//! - [`Trainer`]: mini-batch gradient descent over any [`Dataset`], built
//!   with [`TrainerBuilder`].
//! - [`FareTrainer`]: the end-to-end fare workflow (split, fit, persist,
//!   evaluate) on top of it.

use crate::{
    backend::{Backend, Scalar, Tensor1D, Tensor2D},
    dataset::Dataset,
    loss::Loss,
    model::{ParamOps, TrainableModel},
    optimizer::Optimizer,
};
use std::marker::PhantomData;
use thiserror::Error;
use tracing::{debug, info};

pub mod fare;
pub use fare::{FareTrainer, TrainingReport};

/// Failure of the SGD loop.
#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("dataset is empty")]
    EmptyDataset,
    #[error("dataset length unknown")]
    UnknownLength,
    #[error("batch size must be positive")]
    ZeroBatchSize,
    #[error("number of epochs must be positive")]
    ZeroEpochs,
    #[error("failed to load batch: {0}")]
    Batch(String),
    #[error("loss diverged at epoch {epoch} (loss = {loss})")]
    Diverged { epoch: usize, loss: f64 },
}

/// Orchestrates the training loop for a `TrainableModel`.
///
/// Combines a loss function and an optimizer. Once built via
/// [`TrainerBuilder`] it is immutable and can be reused across models of
/// the same type. `fit` returns the model's fitted form.
pub struct Trainer<B, L, O, M, P>
where
    B: Backend,
    L: Loss<B>,
    M: TrainableModel<B, Params = P, Gradients = P>,
    O: Optimizer<B, P>,
{
    pub(crate) batch_size: usize,
    pub(crate) max_epochs: usize,
    pub(crate) verbose: bool,
    pub(crate) loss_fn: L,
    pub(crate) optimizer: O,
    _phantom_backend: PhantomData<B>,
    _phantom_model: PhantomData<M>,
}

/// Fluent builder for [`Trainer`].
///
/// Defaults:
/// - `batch_size`: 32
/// - `max_epochs`: 1000
/// - `verbose`: true
pub struct TrainerBuilder<B, L, O, M, P>
where
    B: Backend,
    L: Loss<B>,
    M: TrainableModel<B, Params = P, Gradients = P>,
    O: Optimizer<B, P>,
{
    batch_size: usize,
    max_epochs: usize,
    verbose: bool,
    loss_fn: L,
    optimizer: O,
    _phantom_backend: PhantomData<B>,
    _phantom_model: PhantomData<M>,
}

impl<B, L, O, M, P> TrainerBuilder<B, L, O, M, P>
where
    B: Backend,
    L: Loss<B>,
    M: TrainableModel<B, Params = P, Gradients = P>,
    O: Optimizer<B, P>,
{
    pub fn new(loss_fn: L, optimizer: O) -> Self {
        Self {
            batch_size: 32,
            max_epochs: 1000,
            verbose: true,
            loss_fn,
            optimizer,
            _phantom_backend: PhantomData,
            _phantom_model: PhantomData,
        }
    }

    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    pub fn max_epochs(mut self, epochs: usize) -> Self {
        self.max_epochs = epochs;
        self
    }

    /// When `false`, per-epoch loss is not logged.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn build(self) -> Trainer<B, L, O, M, P> {
        Trainer {
            batch_size: self.batch_size,
            max_epochs: self.max_epochs,
            verbose: self.verbose,
            loss_fn: self.loss_fn,
            optimizer: self.optimizer,
            _phantom_backend: PhantomData,
            _phantom_model: PhantomData,
        }
    }
}

impl<B, L, O, M, P> Trainer<B, L, O, M, P>
where
    B: Backend,
    L: Loss<B, Target = Tensor1D<B>, Prediction = Tensor1D<B>>,
    M: TrainableModel<B, Input = Tensor2D<B>, Prediction = Tensor1D<B>, Params = P, Gradients = P>,
    O: Optimizer<B, P>,
    P: ParamOps<B>,
{
    /// Starts the builder pattern; same as `TrainerBuilder::new`.
    pub fn builder(loss_fn: L, optimizer: O) -> TrainerBuilder<B, L, O, M, P> {
        TrainerBuilder::new(loss_fn, optimizer)
    }

    /// Trains the model on the provided dataset for `max_epochs`.
    ///
    /// Loss is averaged per sample over each epoch; gradients are averaged
    /// per batch by the loss. A non-finite epoch loss stops training with
    /// [`TrainingError::Diverged`].
    pub fn fit<D>(&self, mut model: M, dataset: &D) -> Result<M::Output, TrainingError>
    where
        D: Dataset,
    {
        let n_total = dataset.len().ok_or(TrainingError::UnknownLength)?;
        if n_total == 0 {
            return Err(TrainingError::EmptyDataset);
        }
        if self.batch_size == 0 {
            return Err(TrainingError::ZeroBatchSize);
        }
        if self.max_epochs == 0 {
            return Err(TrainingError::ZeroEpochs);
        }

        for epoch in 0..self.max_epochs {
            let mut total_loss = Scalar::<B>::new(0.);
            for batch_result in dataset.batches::<B>(self.batch_size) {
                let (batch_x, batch_y) =
                    batch_result.map_err(|e| TrainingError::Batch(format!("{:?}", e)))?;
                let preds = model.forward(&batch_x);
                let batch_n = Scalar::<B>::new(batch_y.len() as f64);
                total_loss = total_loss + self.loss_fn.loss(&preds, &batch_y) * batch_n;
                let grad_preds = self.loss_fn.grad_wrt_prediction(&preds, &batch_y);
                let grads = model.backward(&batch_x, &grad_preds);
                let new_params = self.optimizer.step(model.params(), &grads);
                model.update_params(&new_params);
            }

            let avg_loss = (total_loss / Scalar::<B>::new(n_total as f64)).to_f64();
            if !avg_loss.is_finite() {
                return Err(TrainingError::Diverged {
                    epoch,
                    loss: avg_loss,
                });
            }
            if self.verbose {
                debug!(epoch, loss = avg_loss, "epoch finished");
            }
        }

        info!(epochs = self.max_epochs, samples = n_total, "training finished");
        Ok(model.into_fitted())
    }
}
