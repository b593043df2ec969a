//! Parameter update rules.

use crate::backend::{Backend, Scalar};
use crate::model::ParamOps;

/// Gradient-based optimizer.
///
/// Optimizers are decoupled from the training loop: the
/// [`Trainer`](crate::trainer::Trainer) computes gradients, the optimizer
/// turns `(params, gradients)` into new parameters.
pub trait Optimizer<B: Backend, P> {
    /// Returns updated parameters; inputs are not mutated.
    fn step(&self, params: &P, gradients: &P) -> P;
}

/// Plain stochastic gradient descent: `θ ← θ - η · ∇L(θ)`.
///
/// ```rust
/// use taxifare::backend::CpuBackend;
/// use taxifare::optimizer::SGD;
///
/// let optimizer = SGD::<CpuBackend>::new(0.05);
/// assert_eq!(optimizer.learning_rate(), 0.05);
/// ```
#[derive(Clone, Debug)]
pub struct SGD<B: Backend> {
    lr: Scalar<B>,
}

impl<B: Backend> SGD<B> {
    pub fn new(lr: f64) -> Self {
        Self {
            lr: Scalar::<B>::new(lr),
        }
    }

    pub fn learning_rate(&self) -> f64 {
        self.lr.to_f64()
    }
}

impl<B: Backend, P: ParamOps<B>> Optimizer<B, P> for SGD<B> {
    fn step(&self, params: &P, gradients: &P) -> P {
        let neg_lr = Scalar::<B>::new(0.0) - self.lr;
        params.add(&gradients.scale(neg_lr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{CpuBackend, Tensor1D};
    use crate::model::LinearParams;

    fn params(weights: Vec<f64>, bias: f64) -> LinearParams<CpuBackend> {
        LinearParams {
            weights: Tensor1D::new(weights),
            bias: Scalar::new(bias),
        }
    }

    #[test]
    fn test_sgd_step_moves_against_gradient() {
        let sgd = SGD::<CpuBackend>::new(0.1);
        let updated = sgd.step(&params(vec![2.0, 3.0], 1.0), &params(vec![1.0, -1.0], 0.5));
        let w = updated.weights.to_vec();
        assert!((w[0] - 1.9).abs() < 1e-12);
        assert!((w[1] - 3.1).abs() < 1e-12);
        assert!((updated.bias.to_f64() - 0.95).abs() < 1e-12);
    }

    #[test]
    fn test_sgd_zero_gradient_is_identity() {
        let sgd = SGD::<CpuBackend>::new(0.5);
        let p = params(vec![4.0], -2.0);
        let updated = sgd.step(&p, &params(vec![0.0], 0.0));
        assert_eq!(updated.weights.to_vec(), vec![4.0]);
        assert_eq!(updated.bias.to_f64(), -2.0);
    }
}
