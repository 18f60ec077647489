//! Two-forecast comparison against actuals.

use serde::Serialize;
use tandem_series::DatedValues;

use crate::error::EvaluateError;
use crate::metrics::{mae, relative_improvement, rmse};

/// Accuracy of a baseline forecast (A) and a candidate forecast (B).
///
/// The relative improvements are `None` when the baseline metric is 0;
/// [`EvaluationSummary::improvement_mae`] and
/// [`EvaluationSummary::improvement_rmse`] report that case as
/// [`EvaluateError::DivisionByZero`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationSummary {
    /// Number of evaluated dates.
    pub n: usize,
    /// MAE of forecast A.
    pub mae_a: f64,
    /// RMSE of forecast A.
    pub rmse_a: f64,
    /// MAE of forecast B.
    pub mae_b: f64,
    /// RMSE of forecast B.
    pub rmse_b: f64,
    /// `(mae_a - mae_b) / mae_a`.
    pub relative_improvement_mae: Option<f64>,
    /// `(rmse_a - rmse_b) / rmse_a`.
    pub relative_improvement_rmse: Option<f64>,
}

impl EvaluationSummary {
    /// Relative MAE improvement of B over A.
    ///
    /// # Errors
    ///
    /// [`EvaluateError::DivisionByZero`] if `mae_a` is 0.
    pub fn improvement_mae(&self) -> Result<f64, EvaluateError> {
        relative_improvement("mae", self.mae_a, self.mae_b)
    }

    /// Relative RMSE improvement of B over A.
    ///
    /// # Errors
    ///
    /// [`EvaluateError::DivisionByZero`] if `rmse_a` is 0.
    pub fn improvement_rmse(&self) -> Result<f64, EvaluateError> {
        relative_improvement("rmse", self.rmse_a, self.rmse_b)
    }
}

/// Scores two forecasts against the same actuals.
///
/// All three sequences must have identical dates.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`EvaluateError::Empty`] | `actual` is empty |
/// | [`EvaluateError::Alignment`] | a forecast's dates differ from `actual`'s |
pub fn evaluate(
    actual: &DatedValues,
    forecast_a: &DatedValues,
    forecast_b: &DatedValues,
) -> Result<EvaluationSummary, EvaluateError> {
    if actual.is_empty() {
        return Err(EvaluateError::Empty);
    }
    for (what, forecast) in [("forecast A", forecast_a), ("forecast B", forecast_b)] {
        forecast
            .check_aligned(actual.dates())
            .map_err(|e| EvaluateError::Alignment {
                what,
                reason: e.to_string(),
            })?;
    }

    let mae_a = mae(actual.values(), forecast_a.values())?;
    let rmse_a = rmse(actual.values(), forecast_a.values())?;
    let mae_b = mae(actual.values(), forecast_b.values())?;
    let rmse_b = rmse(actual.values(), forecast_b.values())?;
    let summary = EvaluationSummary {
        n: actual.len(),
        mae_a,
        rmse_a,
        mae_b,
        rmse_b,
        relative_improvement_mae: relative_improvement("mae", mae_a, mae_b).ok(),
        relative_improvement_rmse: relative_improvement("rmse", rmse_a, rmse_b).ok(),
    };
    tracing::debug!(?summary, "evaluation complete");
    Ok(summary)
}

/// Serializes a summary as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`EvaluateError::Serialization`] if serialization fails.
pub fn to_json(summary: &EvaluationSummary) -> Result<String, EvaluateError> {
    serde_json::to_string_pretty(summary).map_err(|e| EvaluateError::Serialization {
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> EvaluationSummary {
        EvaluationSummary {
            n: 3,
            mae_a: 2.0,
            rmse_a: 2.5,
            mae_b: 1.0,
            rmse_b: 2.0,
            relative_improvement_mae: Some(0.5),
            relative_improvement_rmse: Some(0.2),
        }
    }

    #[test]
    fn test_to_json_fields() {
        let json = to_json(&summary()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["n"], 3);
        assert_eq!(value["mae_a"], 2.0);
        assert_eq!(value["relative_improvement_rmse"], 0.2);
    }

    #[test]
    fn test_undefined_improvement_is_null() {
        let mut s = summary();
        s.relative_improvement_mae = None;
        let value: serde_json::Value = serde_json::from_str(&to_json(&s).unwrap()).unwrap();
        assert!(value["relative_improvement_mae"].is_null());
    }
}
