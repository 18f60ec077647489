//! Design matrix layout shared by fitting and prediction.
//!
//! **Not part of the public API.**

use std::f64::consts::PI;
use std::ops::Range;

use chrono::NaiveDate;
use ndarray::Array2;
use tandem_calendar::{HolidayCalendar, HolidayColumn, epoch_days};
use tandem_series::{FeatureFrame, SeriesError};
use tandem_stats::Standardizer;

use crate::error::DecomposeError;
use crate::spec::DecompositionSpec;

/// Prior scale on the intercept and base growth rate.
const TREND_PRIOR_SCALE: f64 = 5.0;

/// A Fourier-series seasonal cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Cycle {
    pub(crate) name: &'static str,
    pub(crate) period: f64,
    pub(crate) order: usize,
}

pub(crate) const YEARLY: Cycle = Cycle {
    name: "yearly",
    period: 365.25,
    order: 10,
};

pub(crate) const WEEKLY: Cycle = Cycle {
    name: "weekly",
    period: 7.0,
    order: 3,
};

impl Cycle {
    pub(crate) fn width(&self) -> usize {
        2 * self.order
    }

    /// Writes `sin, cos` pairs for harmonics `1..=order` at day `t`.
    fn fill(&self, t: f64, out: &mut [f64]) {
        for k in 0..self.order {
            let x = 2.0 * PI * (k + 1) as f64 * t / self.period;
            out[2 * k] = x.sin();
            out[2 * k + 1] = x.cos();
        }
    }
}

/// Coefficient prior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Prior {
    Gaussian(f64),
    Laplace(f64),
}

impl Prior {
    pub(crate) fn scale(&self) -> f64 {
        match *self {
            Prior::Gaussian(s) | Prior::Laplace(s) => s,
        }
    }
}

/// A regressor column with the transform fixed at fit time.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RegressorColumn {
    pub(crate) name: String,
    pub(crate) standardizer: Standardizer,
}

/// Column layout of the design matrix.
///
/// Order: intercept, growth rate, changepoint adjustments, cycle blocks,
/// holiday columns, regressors.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Layout {
    pub(crate) t_start: f64,
    pub(crate) t_span: f64,
    pub(crate) changepoints: Vec<f64>,
    pub(crate) cycles: Vec<Cycle>,
    pub(crate) holidays: Vec<HolidayColumn>,
    pub(crate) regressors: Vec<RegressorColumn>,
}

impl Layout {
    pub(crate) fn trend_range(&self) -> Range<usize> {
        0..2 + self.changepoints.len()
    }

    pub(crate) fn cycle_range(&self, index: usize) -> Range<usize> {
        let start = self.trend_range().end
            + self.cycles[..index].iter().map(Cycle::width).sum::<usize>();
        start..start + self.cycles[index].width()
    }

    pub(crate) fn holiday_range(&self) -> Range<usize> {
        let start = self.trend_range().end + self.cycles.iter().map(Cycle::width).sum::<usize>();
        start..start + self.holidays.len()
    }

    pub(crate) fn regressor_range(&self) -> Range<usize> {
        let start = self.holiday_range().end;
        start..start + self.regressors.len()
    }

    pub(crate) fn n_columns(&self) -> usize {
        self.regressor_range().end
    }

    /// Maps a date onto the fitted time axis (0 at the first training date,
    /// 1 at the last).
    pub(crate) fn scaled_time(&self, date: NaiveDate) -> f64 {
        (epoch_days(date) - self.t_start) / self.t_span
    }

    /// One prior per design column.
    pub(crate) fn priors(&self, spec: &DecompositionSpec) -> Vec<Prior> {
        let mut priors = Vec::with_capacity(self.n_columns());
        priors.push(Prior::Gaussian(TREND_PRIOR_SCALE));
        priors.push(Prior::Gaussian(TREND_PRIOR_SCALE));
        priors.extend(
            self.changepoints
                .iter()
                .map(|_| Prior::Laplace(spec.changepoint_prior_scale())),
        );
        let seasonal: usize = self.cycles.iter().map(Cycle::width).sum();
        priors.extend((0..seasonal).map(|_| Prior::Gaussian(spec.seasonality_prior_scale())));
        priors.extend(
            self.holidays
                .iter()
                .map(|_| Prior::Gaussian(spec.holiday_prior_scale())),
        );
        priors.extend(
            self.regressors
                .iter()
                .map(|_| Prior::Gaussian(spec.regressor_prior_scale())),
        );
        priors
    }

    /// Builds the design matrix for `frame`.
    ///
    /// # Errors
    ///
    /// Returns [`DecomposeError::MissingFeature`] if a fitted regressor is not
    /// in `frame`.
    pub(crate) fn matrix(
        &self,
        frame: &FeatureFrame,
        calendar: &HolidayCalendar,
    ) -> Result<Array2<f64>, DecomposeError> {
        let columns = self
            .regressors
            .iter()
            .map(|r| {
                frame.column(&r.name).map_err(|e| match e {
                    SeriesError::MissingFeature { name } => DecomposeError::MissingFeature { name },
                    other => DecomposeError::Series(other),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let dates = frame.dates();
        let mut x = Array2::zeros((dates.len(), self.n_columns()));
        let cycle_start = self.trend_range().end;
        let holiday_start = self.holiday_range().start;
        let regressor_start = self.regressor_range().start;

        for (i, &date) in dates.iter().enumerate() {
            let mut row = x.row_mut(i);
            let t = self.scaled_time(date);
            row[0] = 1.0;
            row[1] = t;
            for (j, &s) in self.changepoints.iter().enumerate() {
                row[2 + j] = (t - s).max(0.0);
            }

            let day = epoch_days(date);
            let mut offset = cycle_start;
            let mut buf = Vec::new();
            for cycle in &self.cycles {
                buf.resize(cycle.width(), 0.0);
                cycle.fill(day, &mut buf);
                for (k, &v) in buf.iter().enumerate() {
                    row[offset + k] = v;
                }
                offset += cycle.width();
            }

            for effect in calendar.effects_on(date) {
                if let Ok(j) = self.holidays.binary_search(effect) {
                    row[holiday_start + j] = 1.0;
                }
            }

            for (j, (reg, column)) in self.regressors.iter().zip(&columns).enumerate() {
                row[regressor_start + j] = reg.standardizer.apply(column[i]);
            }
        }
        Ok(x)
    }
}

/// Picks `n` changepoints uniformly over the first `range` fraction of the
/// (scaled, sorted) time axis, excluding the first point.
pub(crate) fn select_changepoints(t: &[f64], n: usize, range: f64) -> Vec<f64> {
    let hist = ((t.len() as f64) * range).floor() as usize;
    if n == 0 || hist < 2 {
        return Vec::new();
    }
    let n = n.min(hist - 1);
    let mut points: Vec<f64> = (1..=n)
        .map(|i| {
            let idx = (i as f64 * (hist - 1) as f64 / n as f64).round() as usize;
            t[idx]
        })
        .collect();
    points.dedup();
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use tandem_calendar::{Holiday, shift_days};
    use tandem_series::FeatureSchema;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
    }

    fn layout(holidays: Vec<HolidayColumn>) -> Layout {
        Layout {
            t_start: epoch_days(start()),
            t_span: 99.0,
            changepoints: vec![0.25, 0.5],
            cycles: vec![WEEKLY],
            holidays,
            regressors: Vec::new(),
        }
    }

    fn frame(n: i64) -> FeatureFrame {
        let dates = (0..n).map(|i| shift_days(start(), i).unwrap()).collect();
        FeatureFrame::from_columns(FeatureSchema::empty(), dates, Vec::new()).unwrap()
    }

    #[test]
    fn ranges_are_contiguous() {
        let l = layout(vec![HolidayColumn {
            name: "h".to_string(),
            offset: 0,
        }]);
        assert_eq!(l.trend_range(), 0..4);
        assert_eq!(l.cycle_range(0), 4..10);
        assert_eq!(l.holiday_range(), 10..11);
        assert_eq!(l.regressor_range(), 11..11);
        assert_eq!(l.n_columns(), 11);
    }

    #[test]
    fn trend_hinges_start_at_changepoints() {
        let l = layout(Vec::new());
        let x = l.matrix(&frame(100), &HolidayCalendar::empty()).unwrap();
        assert_abs_diff_eq!(x[[0, 1]], 0.0);
        assert_abs_diff_eq!(x[[99, 1]], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x[[20, 2]], 0.0);
        assert_abs_diff_eq!(x[[99, 2]], 0.75, epsilon = 1e-12);
    }

    #[test]
    fn weekly_terms_repeat_every_seven_days() {
        let l = layout(Vec::new());
        let x = l.matrix(&frame(30), &HolidayCalendar::empty()).unwrap();
        for k in l.cycle_range(0) {
            assert_abs_diff_eq!(x[[3, k]], x[[10, k]], epsilon = 1e-9);
        }
    }

    #[test]
    fn holiday_column_set_only_on_holiday() {
        let day = shift_days(start(), 5).unwrap();
        let calendar = HolidayCalendar::new(vec![Holiday::new("h", day)]).unwrap();
        let l = layout(calendar.columns());
        let x = l.matrix(&frame(10), &calendar).unwrap();
        let col = l.holiday_range().start;
        assert_eq!(x[[5, col]], 1.0);
        assert_eq!(x[[4, col]], 0.0);
        assert_eq!(x[[6, col]], 0.0);
    }

    #[test]
    fn missing_regressor() {
        let mut l = layout(Vec::new());
        l.regressors.push(RegressorColumn {
            name: "temp".to_string(),
            standardizer: Standardizer::identity(),
        });
        let err = l.matrix(&frame(3), &HolidayCalendar::empty()).unwrap_err();
        assert_eq!(
            err,
            DecomposeError::MissingFeature {
                name: "temp".to_string()
            }
        );
    }

    #[test]
    fn changepoints_within_range() {
        let t: Vec<f64> = (0..100).map(|i| i as f64 / 99.0).collect();
        let cps = select_changepoints(&t, 25, 0.8);
        assert_eq!(cps.len(), 25);
        assert!(cps.iter().all(|&c| c > 0.0 && c <= 0.8));
        assert!(cps.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn changepoints_capped_by_history() {
        let t = [0.0, 0.25, 0.5, 0.75, 1.0];
        let cps = select_changepoints(&t, 25, 0.8);
        assert_eq!(cps, vec![0.25, 0.5, 0.75]);
    }
}
