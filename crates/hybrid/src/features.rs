//! Stage 2 feature matrix construction.
//!
//! Every Stage 2 feature is either a regressor supplied with the frame or
//! derived from the date alone, so forecasting never needs future targets.

use tandem_boost::FeatureMatrix;
use tandem_calendar::{HolidayCalendar, day_of_week, month_of_year};
use tandem_series::{FeatureFrame, SeriesError};

use crate::error::HybridError;

/// Column name of the day-of-week feature (0 = Monday).
pub const DAY_OF_WEEK: &str = "day_of_week";
/// Column name of the month feature (1..=12).
pub const MONTH: &str = "month";
/// Column name of the holiday indicator.
pub const HOLIDAY_FLAG: &str = "is_holiday";

/// Which features the residual learner sees.
///
/// Defaults to no regressors and all three calendar features.
#[derive(Debug, Clone, PartialEq)]
pub struct Stage2Features {
    regressors: Vec<String>,
    day_of_week: bool,
    month: bool,
    holiday_flag: bool,
}

impl Default for Stage2Features {
    fn default() -> Self {
        Self {
            regressors: Vec::new(),
            day_of_week: true,
            month: true,
            holiday_flag: true,
        }
    }
}

impl Stage2Features {
    /// Creates the default feature set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the frame regressors passed through to Stage 2.
    pub fn with_regressors<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regressors = names.into_iter().map(Into::into).collect();
        self
    }

    /// Enables or disables the day-of-week feature.
    pub fn with_day_of_week(mut self, enabled: bool) -> Self {
        self.day_of_week = enabled;
        self
    }

    /// Enables or disables the month feature.
    pub fn with_month(mut self, enabled: bool) -> Self {
        self.month = enabled;
        self
    }

    /// Enables or disables the holiday indicator.
    pub fn with_holiday_flag(mut self, enabled: bool) -> Self {
        self.holiday_flag = enabled;
        self
    }

    pub fn regressors(&self) -> &[String] {
        &self.regressors
    }

    pub fn day_of_week(&self) -> bool {
        self.day_of_week
    }

    pub fn month(&self) -> bool {
        self.month
    }

    pub fn holiday_flag(&self) -> bool {
        self.holiday_flag
    }

    /// Column names in matrix order: regressors first, then calendar features.
    pub fn names(&self) -> Vec<String> {
        let mut names = self.regressors.clone();
        for (enabled, name) in [
            (self.day_of_week, DAY_OF_WEEK),
            (self.month, MONTH),
            (self.holiday_flag, HOLIDAY_FLAG),
        ] {
            if enabled {
                names.push(name.to_string());
            }
        }
        names
    }

    /// Checks that at least one feature is enabled and names do not collide.
    ///
    /// # Errors
    ///
    /// Returns [`HybridError::InvalidConfig`] naming `stage2_features`.
    pub fn validate(&self) -> Result<(), HybridError> {
        let names = self.names();
        if names.is_empty() {
            return Err(HybridError::InvalidConfig {
                param: "stage2_features",
                value: "no features enabled".to_string(),
            });
        }
        for (i, name) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(HybridError::InvalidConfig {
                    param: "stage2_features",
                    value: "empty regressor name".to_string(),
                });
            }
            if names[..i].contains(name) {
                return Err(HybridError::InvalidConfig {
                    param: "stage2_features",
                    value: format!("duplicate feature '{name}'"),
                });
            }
        }
        Ok(())
    }

    /// Builds the Stage 2 matrix for every date of `frame`.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`HybridError::MissingFeature`] | a regressor is not a column of `frame` |
    /// | [`HybridError::Stage2`] | the matrix fails validation |
    pub fn build_matrix(
        &self,
        frame: &FeatureFrame,
        calendar: &HolidayCalendar,
    ) -> Result<FeatureMatrix, HybridError> {
        let mut columns: Vec<Vec<f64>> = Vec::with_capacity(self.names().len());
        for name in &self.regressors {
            let column = frame.column(name).map_err(|e| match e {
                SeriesError::MissingFeature { name } => HybridError::MissingFeature { name },
                other => HybridError::Series(other),
            })?;
            columns.push(column.to_vec());
        }
        let dates = frame.dates();
        if self.day_of_week {
            columns.push(dates.iter().map(|&d| f64::from(day_of_week(d))).collect());
        }
        if self.month {
            columns.push(dates.iter().map(|&d| f64::from(month_of_year(d))).collect());
        }
        if self.holiday_flag {
            columns.push(
                dates
                    .iter()
                    .map(|&d| if calendar.is_holiday(d) { 1.0 } else { 0.0 })
                    .collect(),
            );
        }

        let rows: Vec<Vec<f64>> = (0..dates.len())
            .map(|r| columns.iter().map(|c| c[r]).collect())
            .collect();
        Ok(FeatureMatrix::from_rows(self.names(), &rows)?)
    }
}
