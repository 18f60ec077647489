//! Chronological train/evaluate backtest.

use serde::Serialize;
use tandem_boost::BoostFit;
use tandem_calendar::{HolidayCalendar, SplitBoundary};
use tandem_evaluate::{EvaluationSummary, evaluate};
use tandem_series::{DatedValues, Series};
use tracing::info;

use crate::config::HybridConfig;
use crate::error::HybridError;
use crate::forecaster::{HybridForecaster, records};
use crate::record::ForecastRecord;

/// What the residual learner did during training.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stage2Diagnostics {
    pub rounds_used: usize,
    pub rounds_trained: usize,
    /// Best holdout RMSE.
    pub best_score: f64,
    pub n_fit: usize,
    pub n_holdout: usize,
    /// `(feature, total split gain)` in matrix column order.
    pub feature_importance: Vec<(String, f64)>,
}

impl From<&BoostFit> for Stage2Diagnostics {
    fn from(fit: &BoostFit) -> Self {
        Self {
            rounds_used: fit.rounds_used(),
            rounds_trained: fit.rounds_trained(),
            best_score: fit.best_score(),
            n_fit: fit.n_fit(),
            n_holdout: fit.n_holdout(),
            feature_importance: fit.feature_importance(),
        }
    }
}

/// Result of a backtest.
#[derive(Debug, Clone)]
pub struct Backtest {
    /// One record per evaluation date, with actuals.
    pub records: Vec<ForecastRecord>,
    /// Stage 1 alone (A) against the hybrid forecast (B).
    pub summary: EvaluationSummary,
    pub stage2: Stage2Diagnostics,
}

/// Splits `series` at `boundary`, fits on the training side only and scores
/// Stage 1 against the hybrid forecast on the evaluation side.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`HybridError::Series`] | the boundary leaves one side empty |
/// | [`HybridError::Stage1`] / [`HybridError::Stage2`] | fitting fails |
/// | [`HybridError::Evaluate`] | scoring fails |
#[tracing::instrument(skip_all, fields(cutoff = %boundary.cutoff()))]
pub fn backtest(
    series: &Series,
    calendar: &HolidayCalendar,
    boundary: &SplitBoundary,
    config: &HybridConfig,
) -> Result<Backtest, HybridError> {
    let (train, test) = series.split(boundary)?;
    info!(train = train.len(), test = test.len(), "split");

    let fit = HybridForecaster::new(config.clone()).fit(&train, calendar)?;
    let (stage1, stage2, hybrid) = fit.predict_parts(test.frame())?;
    let actual = DatedValues::new(test.dates().to_vec(), test.targets().to_vec())?;
    let summary = evaluate(&actual, &stage1, &hybrid)?;
    info!(
        rmse_stage1 = summary.rmse_a,
        rmse_hybrid = summary.rmse_b,
        "backtest scored"
    );

    Ok(Backtest {
        records: records(&stage1, &stage2, &hybrid, Some(&actual)),
        summary,
        stage2: Stage2Diagnostics::from(fit.stage2()),
    })
}
