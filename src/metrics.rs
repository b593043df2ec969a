//! Regression metrics.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MetricError {
    #[error("predictions and actuals differ in length ({predictions} vs {actuals})")]
    LengthMismatch { predictions: usize, actuals: usize },
    #[error("cannot score an empty set of predictions")]
    Empty,
    #[error("metric is not finite")]
    NonFinite,
}

/// Root mean squared error between `predictions` and `actuals`.
///
/// ```
/// use taxifare::metrics::rmse;
///
/// let err = rmse(&[2.0, 4.0], &[2.0, 2.0]).unwrap();
/// assert!((err - 2.0f64.sqrt()).abs() < 1e-12);
/// ```
pub fn rmse(predictions: &[f64], actuals: &[f64]) -> Result<f64, MetricError> {
    if predictions.len() != actuals.len() {
        return Err(MetricError::LengthMismatch {
            predictions: predictions.len(),
            actuals: actuals.len(),
        });
    }
    if predictions.is_empty() {
        return Err(MetricError::Empty);
    }

    let mse = predictions
        .iter()
        .zip(actuals)
        .map(|(p, a)| (p - a) * (p - a))
        .sum::<f64>()
        / predictions.len() as f64;
    let value = mse.sqrt();
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MetricError::NonFinite)
    }
}
