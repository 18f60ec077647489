//! Fitted decomposition model.

use chrono::NaiveDate;
use ndarray::{Array1, Array2, ArrayView1, s};
use tandem_calendar::{HolidayCalendar, HolidayColumn};
use tandem_series::{DatedValues, FeatureFrame, Series};

use crate::design::{Layout, WEEKLY, YEARLY};
use crate::error::DecomposeError;
use crate::spec::DecompositionSpec;

/// A fitted decomposition model produced by [`DecompositionSpec::fit()`].
///
/// Immutable. Holds the coefficients, the time axis and regressor scaling
/// fixed at fit time, and the holiday calendar used for prediction.
///
/// ```mermaid
/// graph LR
///     B["DecompositionFit"] --> C[".predict(&frame)?"]
///     B --> D[".predict_in_sample(&train)?"]
///     B --> E[".components(&frame)?"]
/// ```
#[derive(Debug, Clone)]
pub struct DecompositionFit {
    spec: DecompositionSpec,
    layout: Layout,
    calendar: HolidayCalendar,
    coefficients: Vec<f64>,
    y_scale: f64,
    sigma_obs: f64,
    refined: bool,
}

/// Per-date additive breakdown of a prediction, in target units.
///
/// `trend + yearly + weekly + holidays + regressors` equals the prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct Components {
    /// Dates of the rows.
    pub dates: Vec<NaiveDate>,
    /// Piecewise-linear trend.
    pub trend: Vec<f64>,
    /// Yearly cycle (zeros when disabled).
    pub yearly: Vec<f64>,
    /// Weekly cycle (zeros when disabled).
    pub weekly: Vec<f64>,
    /// Sum of holiday effects.
    pub holidays: Vec<f64>,
    /// Sum of regressor contributions.
    pub regressors: Vec<f64>,
}

impl Components {
    /// Sum of all components per date.
    pub fn total(&self) -> Vec<f64> {
        (0..self.dates.len())
            .map(|i| {
                self.trend[i]
                    + self.yearly[i]
                    + self.weekly[i]
                    + self.holidays[i]
                    + self.regressors[i]
            })
            .collect()
    }
}

impl DecompositionFit {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        spec: DecompositionSpec,
        layout: Layout,
        calendar: HolidayCalendar,
        coefficients: Vec<f64>,
        y_scale: f64,
        sigma_obs: f64,
        refined: bool,
    ) -> Self {
        Self {
            spec,
            layout,
            calendar,
            coefficients,
            y_scale,
            sigma_obs,
            refined,
        }
    }

    /// Returns the spec that produced this fit.
    pub fn spec(&self) -> &DecompositionSpec {
        &self.spec
    }

    /// Returns all coefficients in design order (scaled target units).
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Returns the base growth rate per day, in target units.
    pub fn growth_rate(&self) -> f64 {
        self.coefficients[1] * self.y_scale / self.layout.t_span
    }

    /// Returns the changepoint rate adjustments (scaled units).
    pub fn changepoint_deltas(&self) -> &[f64] {
        &self.coefficients[2..self.layout.trend_range().end]
    }

    /// Returns the number of changepoints actually placed.
    pub fn n_changepoints(&self) -> usize {
        self.layout.changepoints.len()
    }

    /// Returns the holiday columns seen in training, in design order.
    pub fn holiday_columns(&self) -> &[HolidayColumn] {
        &self.layout.holidays
    }

    /// Returns the effect of each holiday column in target units.
    pub fn holiday_effects(&self) -> Vec<(HolidayColumn, f64)> {
        self.layout
            .holidays
            .iter()
            .cloned()
            .zip(self.coefficients[self.layout.holiday_range()].iter())
            .map(|(c, b)| (c, b * self.y_scale))
            .collect()
    }

    /// Returns the regressor names used at fit time.
    pub fn regressors(&self) -> Vec<&str> {
        self.layout.regressors.iter().map(|r| r.name.as_str()).collect()
    }

    /// Returns the target scale (largest absolute training target).
    pub fn y_scale(&self) -> f64 {
        self.y_scale
    }

    /// Returns the in-sample residual standard deviation, in target units.
    pub fn sigma_obs(&self) -> f64 {
        self.sigma_obs * self.y_scale
    }

    /// Returns `true` if the L-BFGS refinement replaced the ridge start.
    pub fn refined(&self) -> bool {
        self.refined
    }

    /// Predicts the target for every date in `frame`.
    ///
    /// # Errors
    ///
    /// Returns [`DecomposeError::MissingFeature`] if a regressor used at fit
    /// time is absent from `frame`.
    pub fn predict(&self, frame: &FeatureFrame) -> Result<DatedValues, DecomposeError> {
        let x = self.layout.matrix(frame, &self.calendar)?;
        let beta = ArrayView1::from(self.coefficients.as_slice());
        let yhat = x.dot(&beta) * self.y_scale;
        Ok(DatedValues::new(frame.dates().to_vec(), yhat.to_vec())?)
    }

    /// Predicts the training series itself.
    ///
    /// Dates and length equal those of `train`.
    ///
    /// # Errors
    ///
    /// Same as [`predict`](Self::predict).
    pub fn predict_in_sample(&self, train: &Series) -> Result<DatedValues, DecomposeError> {
        self.predict(train.frame())
    }

    /// Splits the prediction for `frame` into its additive components.
    ///
    /// # Errors
    ///
    /// Same as [`predict`](Self::predict).
    pub fn components(&self, frame: &FeatureFrame) -> Result<Components, DecomposeError> {
        let x = self.layout.matrix(frame, &self.calendar)?;
        let n = frame.len();
        let block = |range: std::ops::Range<usize>| -> Vec<f64> {
            block_product(&x, &self.coefficients, range, self.y_scale)
        };

        let mut yearly = vec![0.0; n];
        let mut weekly = vec![0.0; n];
        for (i, cycle) in self.layout.cycles.iter().enumerate() {
            let values = block(self.layout.cycle_range(i));
            if cycle.name == YEARLY.name {
                yearly = values;
            } else if cycle.name == WEEKLY.name {
                weekly = values;
            }
        }

        Ok(Components {
            dates: frame.dates().to_vec(),
            trend: block(self.layout.trend_range()),
            yearly,
            weekly,
            holidays: block(self.layout.holiday_range()),
            regressors: block(self.layout.regressor_range()),
        })
    }
}

fn block_product(
    x: &Array2<f64>,
    coefficients: &[f64],
    range: std::ops::Range<usize>,
    scale: f64,
) -> Vec<f64> {
    if range.is_empty() {
        return vec![0.0; x.nrows()];
    }
    let beta = Array1::from(coefficients[range.clone()].to_vec());
    (x.slice(s![.., range]).dot(&beta) * scale).to_vec()
}
