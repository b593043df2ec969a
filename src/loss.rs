//! Differentiable loss functions for model training.

use crate::backend::{Backend, Scalar, Tensor1D};

/// A differentiable loss used by the SGD trainer.
///
/// `loss` is reported per epoch; `grad_wrt_prediction` feeds the model's
/// `backward()`.
pub trait Loss<B: Backend> {
    type Prediction;
    type Target;

    /// Scalar loss value for a batch.
    fn loss(&self, prediction: &Self::Prediction, target: &Self::Target) -> Scalar<B>;

    /// Gradient of the loss w.r.t. the prediction: ∂L/∂pred.
    fn grad_wrt_prediction(
        &self,
        prediction: &Self::Prediction,
        target: &Self::Target,
    ) -> Self::Prediction;
}

/// Mean squared error: `L = (1/n) * Σ(pred_i - target_i)^2`
///
/// The gradient is `(pred - target) / n`; the factor of 2 is absorbed into
/// the learning rate.
#[derive(Debug, Clone, Copy, Default)]
pub struct MSELoss;

impl<B: Backend> Loss<B> for MSELoss {
    type Prediction = Tensor1D<B>;
    type Target = Tensor1D<B>;

    fn loss(&self, pred: &Self::Prediction, target: &Self::Target) -> Scalar<B> {
        let diff = pred.sub(target);
        diff.dot(&diff) / Scalar::<B>::new(diff.len() as f64)
    }

    fn grad_wrt_prediction(&self, pred: &Self::Prediction, target: &Self::Target) -> Tensor1D<B> {
        let n = Scalar::<B>::new(1. / pred.len() as f64);
        pred.sub(target).scale(&n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_mse_loss_value() {
        let pred = Tensor1D::<CpuBackend>::new(vec![1.0, 2.0, 3.0]);
        let target = Tensor1D::<CpuBackend>::new(vec![1.0, 4.0, 0.0]);
        let l = Loss::<CpuBackend>::loss(&MSELoss, &pred, &target);
        assert!((l.to_f64() - 13.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_mse_zero_for_exact_predictions() {
        let y = Tensor1D::<CpuBackend>::new(vec![2.5, -1.0]);
        assert_eq!(Loss::<CpuBackend>::loss(&MSELoss, &y, &y).to_f64(), 0.0);
    }

    #[test]
    fn test_mse_gradient() {
        let pred = Tensor1D::<CpuBackend>::new(vec![3.0, 0.0]);
        let target = Tensor1D::<CpuBackend>::new(vec![1.0, 2.0]);
        let g = Loss::<CpuBackend>::grad_wrt_prediction(&MSELoss, &pred, &target);
        assert_eq!(g.to_vec(), vec![1.0, -1.0]);
    }
}
