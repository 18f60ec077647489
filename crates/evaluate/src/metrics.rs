//! Point-forecast error metrics.

use tandem_stats::{mean_abs, root_mean_square};

use crate::error::EvaluateError;

/// Mean absolute error.
///
/// # Errors
///
/// [`EvaluateError::Empty`] for empty input, [`EvaluateError::Alignment`]
/// if the lengths differ.
pub fn mae(actual: &[f64], predicted: &[f64]) -> Result<f64, EvaluateError> {
    Ok(mean_abs(&errors(actual, predicted)?))
}

/// Root mean squared error.
///
/// # Errors
///
/// Same as [`mae`].
pub fn rmse(actual: &[f64], predicted: &[f64]) -> Result<f64, EvaluateError> {
    Ok(root_mean_square(&errors(actual, predicted)?))
}

/// Relative improvement `(baseline - candidate) / baseline` of an error metric.
///
/// Positive when the candidate has lower error.
///
/// # Errors
///
/// Returns [`EvaluateError::DivisionByZero`] if `baseline` is 0.
pub fn relative_improvement(
    metric: &'static str,
    baseline: f64,
    candidate: f64,
) -> Result<f64, EvaluateError> {
    if baseline == 0.0 {
        return Err(EvaluateError::DivisionByZero { metric });
    }
    Ok((baseline - candidate) / baseline)
}

fn errors(actual: &[f64], predicted: &[f64]) -> Result<Vec<f64>, EvaluateError> {
    if actual.is_empty() {
        return Err(EvaluateError::Empty);
    }
    if actual.len() != predicted.len() {
        return Err(EvaluateError::Alignment {
            what: "predictions",
            reason: format!("length {}, expected {}", predicted.len(), actual.len()),
        });
    }
    Ok(actual.iter().zip(predicted).map(|(a, p)| a - p).collect())
}
