//! Per-date forecast output.

use chrono::NaiveDate;
use serde::Serialize;

/// One forecast date with both stage outputs and the combined forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastRecord {
    pub date: NaiveDate,
    /// Decomposition forecast.
    pub stage1: f64,
    /// Residual correction.
    pub stage2: f64,
    /// `stage1 + stage2`, after the clip policy.
    pub hybrid: f64,
    /// Observed target, when known.
    pub actual: Option<f64>,
}
