//! Two-stage fit and forecast.

use tandem_boost::BoostFit;
use tandem_calendar::HolidayCalendar;
use tandem_decompose::DecompositionFit;
use tandem_series::{DatedValues, FeatureFrame, Series};
use tracing::info;

use crate::combine::combine_series;
use crate::config::HybridConfig;
use crate::error::HybridError;
use crate::record::ForecastRecord;
use crate::residual::extract_residuals;

/// Unfitted hybrid forecaster.
///
/// ```mermaid
/// graph LR
///     A["HybridForecaster::new(config)"] -->|".fit(&train, &calendar)?"| B["HybridFit"]
///     B -->|".forecast(&frame)?"| C["Vec&lt;ForecastRecord&gt;"]
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct HybridForecaster {
    config: HybridConfig,
}

impl HybridForecaster {
    pub fn new(config: HybridConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HybridConfig {
        &self.config
    }

    /// Fits Stage 1 to the targets and Stage 2 to the Stage 1 in-sample
    /// residuals.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`HybridError::Stage1`] | invalid decomposition settings or training series |
    /// | [`HybridError::Stage2`] | invalid boosting settings, or too few rows to hold out |
    /// | [`HybridError::MissingFeature`] | a Stage 2 regressor is not in `train` |
    /// | [`HybridError::InvalidConfig`] | no Stage 2 features |
    #[tracing::instrument(skip_all, fields(n = train.len()))]
    pub fn fit(
        &self,
        train: &Series,
        calendar: &HolidayCalendar,
    ) -> Result<HybridFit, HybridError> {
        self.config.validate()?;

        let stage1 = self.config.decomposition().fit(train, calendar)?;
        let in_sample = stage1.predict_in_sample(train)?;
        let residuals = extract_residuals(train, &in_sample)?;
        info!(sigma_obs = stage1.sigma_obs(), "stage 1 done");

        let features = self.config.stage2_features();
        let matrix = features.build_matrix(train.frame(), calendar)?;
        let stage2 = tandem_boost::fit(
            &matrix,
            residuals.values(),
            self.config.early_stopping(),
            self.config.boost(),
        )?;
        info!(
            rounds_used = stage2.rounds_used(),
            best_score = stage2.best_score(),
            "stage 2 done"
        );

        Ok(HybridFit {
            config: self.config.clone(),
            calendar: calendar.clone(),
            stage1,
            stage2,
        })
    }
}

/// Fitted hybrid model. Immutable; forecasting does not change it.
#[derive(Debug, Clone)]
pub struct HybridFit {
    config: HybridConfig,
    calendar: HolidayCalendar,
    stage1: DecompositionFit,
    stage2: BoostFit,
}

impl HybridFit {
    pub fn config(&self) -> &HybridConfig {
        &self.config
    }

    /// Fitted decomposition model.
    pub fn stage1(&self) -> &DecompositionFit {
        &self.stage1
    }

    /// Fitted residual learner.
    pub fn stage2(&self) -> &BoostFit {
        &self.stage2
    }

    /// Forecasts every date of `frame`. Records carry no actuals.
    ///
    /// # Errors
    ///
    /// [`HybridError::Stage1`] or [`HybridError::MissingFeature`] if a
    /// regressor is missing from `frame`.
    pub fn forecast(&self, frame: &FeatureFrame) -> Result<Vec<ForecastRecord>, HybridError> {
        let (stage1, stage2, hybrid) = self.predict_parts(frame)?;
        Ok(records(&stage1, &stage2, &hybrid, None))
    }

    /// Forecasts every date of `series`, recording its targets as actuals.
    ///
    /// # Errors
    ///
    /// Same as [`forecast`](Self::forecast).
    pub fn forecast_series(&self, series: &Series) -> Result<Vec<ForecastRecord>, HybridError> {
        let (stage1, stage2, hybrid) = self.predict_parts(series.frame())?;
        let actual = DatedValues::new(series.dates().to_vec(), series.targets().to_vec())?;
        Ok(records(&stage1, &stage2, &hybrid, Some(&actual)))
    }

    /// Returns `(stage1, stage2, hybrid)` for `frame`.
    pub(crate) fn predict_parts(
        &self,
        frame: &FeatureFrame,
    ) -> Result<(DatedValues, DatedValues, DatedValues), HybridError> {
        let stage1 = self.stage1.predict(frame)?;
        let matrix = self
            .config
            .stage2_features()
            .build_matrix(frame, &self.calendar)?;
        let correction = self.stage2.predict(&matrix)?;
        let stage2 = DatedValues::new(frame.dates().to_vec(), correction)?;
        let hybrid = combine_series(&stage1, &stage2, self.config.clip())?;
        Ok((stage1, stage2, hybrid))
    }
}

/// Zips date-aligned stage outputs into records.
pub(crate) fn records(
    stage1: &DatedValues,
    stage2: &DatedValues,
    hybrid: &DatedValues,
    actual: Option<&DatedValues>,
) -> Vec<ForecastRecord> {
    stage1
        .iter()
        .zip(stage2.values())
        .zip(hybrid.values())
        .enumerate()
        .map(|(i, (((date, s1), &s2), &h))| ForecastRecord {
            date,
            stage1: s1,
            stage2: s2,
            hybrid: h,
            actual: actual.map(|a| a.values()[i]),
        })
        .collect()
}
