//! Decomposition model specification (unfitted).

use tandem_calendar::HolidayCalendar;
use tandem_series::Series;

use crate::error::DecomposeError;
use crate::fit::DecompositionFit;

/// An unfitted decomposition model.
///
/// Entry point of the typestate workflow: configure with the `with_*`
/// builders, then call [`DecompositionSpec::fit()`] to obtain a
/// [`DecompositionFit`].
///
/// ```mermaid
/// graph LR
///     A["DecompositionSpec::new()"] -->|".with_regressors(..)"| A
///     A -->|".fit(&train, &calendar)?"| B["DecompositionFit"]
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DecompositionSpec {
    yearly: bool,
    weekly: bool,
    regressors: Vec<String>,
    n_changepoints: usize,
    changepoint_range: f64,
    changepoint_prior_scale: f64,
    seasonality_prior_scale: f64,
    holiday_prior_scale: f64,
    regressor_prior_scale: f64,
    max_iters: u64,
}

impl Default for DecompositionSpec {
    fn default() -> Self {
        Self {
            yearly: true,
            weekly: true,
            regressors: Vec::new(),
            n_changepoints: 25,
            changepoint_range: 0.8,
            changepoint_prior_scale: 0.05,
            seasonality_prior_scale: 10.0,
            holiday_prior_scale: 10.0,
            regressor_prior_scale: 10.0,
            max_iters: 200,
        }
    }
}

impl DecompositionSpec {
    /// Creates a spec with yearly and weekly cycles, 25 changepoints in the
    /// first 80 % of history, and no regressors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables the yearly cycle (period 365.25, order 10).
    pub fn with_yearly(mut self, enabled: bool) -> Self {
        self.yearly = enabled;
        self
    }

    /// Enables or disables the weekly cycle (period 7, order 3).
    pub fn with_weekly(mut self, enabled: bool) -> Self {
        self.weekly = enabled;
        self
    }

    /// Sets the regressor names, in design order.
    pub fn with_regressors<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regressors = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the number of trend changepoints.
    pub fn with_changepoints(mut self, n: usize) -> Self {
        self.n_changepoints = n;
        self
    }

    /// Sets the fraction of history in which changepoints are placed.
    pub fn with_changepoint_range(mut self, range: f64) -> Self {
        self.changepoint_range = range;
        self
    }

    /// Sets the Laplace scale on changepoint rate adjustments.
    pub fn with_changepoint_prior_scale(mut self, scale: f64) -> Self {
        self.changepoint_prior_scale = scale;
        self
    }

    /// Sets the Gaussian scale on Fourier coefficients.
    pub fn with_seasonality_prior_scale(mut self, scale: f64) -> Self {
        self.seasonality_prior_scale = scale;
        self
    }

    /// Sets the Gaussian scale on holiday effects.
    pub fn with_holiday_prior_scale(mut self, scale: f64) -> Self {
        self.holiday_prior_scale = scale;
        self
    }

    /// Sets the Gaussian scale on regressor coefficients.
    pub fn with_regressor_prior_scale(mut self, scale: f64) -> Self {
        self.regressor_prior_scale = scale;
        self
    }

    /// Sets the iteration cap of the L-BFGS refinement.
    pub fn with_max_iters(mut self, iters: u64) -> Self {
        self.max_iters = iters;
        self
    }

    /// Returns `true` if the yearly cycle is enabled.
    pub fn yearly(&self) -> bool {
        self.yearly
    }

    /// Returns `true` if the weekly cycle is enabled.
    pub fn weekly(&self) -> bool {
        self.weekly
    }

    /// Returns the regressor names.
    pub fn regressors(&self) -> &[String] {
        &self.regressors
    }

    /// Returns the requested number of changepoints.
    pub fn n_changepoints(&self) -> usize {
        self.n_changepoints
    }

    /// Returns the changepoint range.
    pub fn changepoint_range(&self) -> f64 {
        self.changepoint_range
    }

    /// Returns the changepoint prior scale.
    pub fn changepoint_prior_scale(&self) -> f64 {
        self.changepoint_prior_scale
    }

    /// Returns the seasonality prior scale.
    pub fn seasonality_prior_scale(&self) -> f64 {
        self.seasonality_prior_scale
    }

    /// Returns the holiday prior scale.
    pub fn holiday_prior_scale(&self) -> f64 {
        self.holiday_prior_scale
    }

    /// Returns the regressor prior scale.
    pub fn regressor_prior_scale(&self) -> f64 {
        self.regressor_prior_scale
    }

    /// Returns the refinement iteration cap.
    pub fn max_iters(&self) -> u64 {
        self.max_iters
    }

    /// Validates the settings.
    ///
    /// # Errors
    ///
    /// Returns [`DecomposeError::InvalidConfig`] for a non-positive or
    /// non-finite prior scale, a changepoint range outside `(0, 1]`, or
    /// duplicate regressor names.
    pub fn validate(&self) -> Result<(), DecomposeError> {
        let scales = [
            ("changepoint_prior_scale", self.changepoint_prior_scale),
            ("seasonality_prior_scale", self.seasonality_prior_scale),
            ("holiday_prior_scale", self.holiday_prior_scale),
            ("regressor_prior_scale", self.regressor_prior_scale),
        ];
        for (param, value) in scales {
            if !value.is_finite() || value <= 0.0 {
                return Err(DecomposeError::InvalidConfig {
                    param,
                    value: value.to_string(),
                });
            }
        }
        if !(self.changepoint_range > 0.0 && self.changepoint_range <= 1.0) {
            return Err(DecomposeError::InvalidConfig {
                param: "changepoint_range",
                value: self.changepoint_range.to_string(),
            });
        }
        for (i, name) in self.regressors.iter().enumerate() {
            if self.regressors[..i].contains(name) {
                return Err(DecomposeError::InvalidConfig {
                    param: "regressors",
                    value: name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Fits the model to a training series.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`DecomposeError::InvalidConfig`] | [`validate`](Self::validate) fails |
    /// | [`DecomposeError::InvalidInput`] | fewer than 2 observations, or history shorter than two cycles of the longest enabled period |
    /// | [`DecomposeError::MissingFeature`] | a regressor is not in the series schema |
    /// | [`DecomposeError::SingularSystem`] | the ridge starting point cannot be solved |
    pub fn fit(
        &self,
        train: &Series,
        calendar: &HolidayCalendar,
    ) -> Result<DecompositionFit, DecomposeError> {
        crate::optimizer::fit_decomposition(self, train, calendar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let spec = DecompositionSpec::new();
        assert!(spec.yearly());
        assert!(spec.weekly());
        assert_eq!(spec.n_changepoints(), 25);
        assert_eq!(spec.changepoint_range(), 0.8);
        assert_eq!(spec.changepoint_prior_scale(), 0.05);
        assert_eq!(spec.seasonality_prior_scale(), 10.0);
        assert!(spec.regressors().is_empty());
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn builder_chain() {
        let spec = DecompositionSpec::new()
            .with_yearly(false)
            .with_regressors(["temp", "promo"])
            .with_changepoints(5);
        assert!(!spec.yearly());
        assert_eq!(spec.regressors(), &["temp".to_string(), "promo".to_string()]);
        assert_eq!(spec.n_changepoints(), 5);
    }

    #[test]
    fn rejects_zero_prior_scale() {
        let err = DecompositionSpec::new()
            .with_holiday_prior_scale(0.0)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            DecomposeError::InvalidConfig {
                param: "holiday_prior_scale",
                ..
            }
        ));
    }

    #[test]
    fn rejects_changepoint_range() {
        let err = DecompositionSpec::new()
            .with_changepoint_range(1.5)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            DecomposeError::InvalidConfig {
                param: "changepoint_range",
                ..
            }
        ));
    }

    #[test]
    fn rejects_duplicate_regressor() {
        let err = DecompositionSpec::new()
            .with_regressors(["a", "a"])
            .validate()
            .unwrap_err();
        assert!(matches!(err, DecomposeError::InvalidConfig { param: "regressors", .. }));
    }
}
