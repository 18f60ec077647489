//! MAP estimation of the decomposition coefficients.
//!
//! A ridge solve gives the exact MAP estimate when every prior is Gaussian.
//! It seeds an L-BFGS run (argmin) on the objective with Laplace priors on
//! the changepoint adjustments.
//!
//! **Not part of the public API.**

use std::collections::BTreeSet;

use argmin::core::{CostFunction, Executor, Gradient, State};
use argmin::solver::linesearch::MoreThuenteLineSearch;
use argmin::solver::quasinewton::LBFGS;
use ndarray::{Array1, Array2, ArrayView1};
use tandem_calendar::{HolidayCalendar, HolidayColumn, epoch_days};
use tandem_series::{FeatureKind, Series, SeriesError};
use tandem_stats::{Standardizer, max_abs, root_mean_square};
use tracing::{debug, info, warn};

use crate::design::{Cycle, Layout, Prior, RegressorColumn, WEEKLY, YEARLY, select_changepoints};
use crate::error::DecomposeError;
use crate::fit::DecompositionFit;
use crate::linalg::cholesky_solve;
use crate::spec::DecompositionSpec;

/// Smoothing constant for `|d| ~ sqrt(d^2 + eps)`.
const LAPLACE_EPS: f64 = 1e-6;

/// L-BFGS history length.
const LBFGS_MEMORY: usize = 7;

/// Fits the decomposition model.
#[tracing::instrument(skip(spec, train, calendar), fields(n = train.len()))]
pub(crate) fn fit_decomposition(
    spec: &DecompositionSpec,
    train: &Series,
    calendar: &HolidayCalendar,
) -> Result<DecompositionFit, DecomposeError> {
    spec.validate()?;
    let layout = build_layout(spec, train, calendar)?;
    let x = layout.matrix(train.frame(), calendar)?;
    debug!(
        rows = x.nrows(),
        columns = x.ncols(),
        changepoints = layout.changepoints.len(),
        holidays = layout.holidays.len(),
        "design matrix built"
    );

    let y_scale = match max_abs(train.targets()) {
        m if m > 0.0 => m,
        _ => 1.0,
    };
    let y = Array1::from_iter(train.targets().iter().map(|v| v / y_scale));
    let priors = layout.priors(spec);

    // Two ridge passes: the first estimates the noise level that weighs the
    // likelihood against the priors in the second.
    let first = ridge(&x, &y, &priors, 1.0)?;
    let sigma = residual_rms(&x, &y, &first).max(1e-6);
    let start = ridge(&x, &y, &priors, sigma * sigma)?;
    let sigma = residual_rms(&x, &y, &start).max(1e-6);

    let cost = MapCost {
        x: &x,
        y: &y,
        priors: &priors,
        noise_var: sigma * sigma,
    };
    let (coefficients, refined) = match refine(cost, start.to_vec(), spec.max_iters()) {
        Ok(beta) => (beta, true),
        Err(reason) => {
            warn!(%reason, "L-BFGS refinement failed, keeping ridge estimate");
            (start.to_vec(), false)
        }
    };
    let sigma_obs = residual_rms(&x, &y, &Array1::from(coefficients.clone()));

    info!(
        columns = coefficients.len(),
        sigma_obs = sigma_obs * y_scale,
        refined,
        "stage 1 fitted"
    );
    Ok(DecompositionFit::new(
        spec.clone(),
        layout,
        calendar.clone(),
        coefficients,
        y_scale,
        sigma_obs,
        refined,
    ))
}

/// Validates the history and fixes the design layout.
fn build_layout(
    spec: &DecompositionSpec,
    train: &Series,
    calendar: &HolidayCalendar,
) -> Result<Layout, DecomposeError> {
    if train.len() < 2 {
        return Err(DecomposeError::InvalidInput {
            reason: format!("need at least 2 observations, got {}", train.len()),
        });
    }

    let mut cycles: Vec<Cycle> = Vec::new();
    if spec.yearly() {
        cycles.push(YEARLY);
    }
    if spec.weekly() {
        cycles.push(WEEKLY);
    }
    let covered = (train.span_days() + 1) as f64;
    if let Some(longest) = cycles.iter().map(|c| c.period).reduce(f64::max) {
        if covered < 2.0 * longest {
            return Err(DecomposeError::InvalidInput {
                reason: format!(
                    "history covers {covered} days, need at least {} (two cycles of period {longest})",
                    2.0 * longest
                ),
            });
        }
    }

    let mut regressors = Vec::with_capacity(spec.regressors().len());
    for name in spec.regressors() {
        let field = train
            .schema()
            .field(name)
            .map_err(|_| DecomposeError::MissingFeature { name: name.clone() })?;
        let column = train.frame().column(name).map_err(|e| match e {
            SeriesError::MissingFeature { name } => DecomposeError::MissingFeature { name },
            other => DecomposeError::Series(other),
        })?;
        let standardizer = match field.kind() {
            FeatureKind::Continuous => Standardizer::fit(column),
            FeatureKind::Binary => Standardizer::identity(),
        };
        regressors.push(RegressorColumn {
            name: name.clone(),
            standardizer,
        });
    }

    let dates = train.dates();
    let t_start = epoch_days(dates[0]);
    let t_span = train.span_days() as f64;
    let t: Vec<f64> = dates
        .iter()
        .map(|&d| (epoch_days(d) - t_start) / t_span)
        .collect();
    let changepoints = select_changepoints(&t, spec.n_changepoints(), spec.changepoint_range());

    let seen: BTreeSet<&HolidayColumn> = dates
        .iter()
        .flat_map(|&d| calendar.effects_on(d))
        .collect();
    let holidays: Vec<HolidayColumn> = seen.into_iter().cloned().collect();

    Ok(Layout {
        t_start,
        t_span,
        changepoints,
        cycles,
        holidays,
        regressors,
    })
}

/// Solves `(X'X / noise_var + diag(1 / scale^2)) beta = X'y / noise_var`.
///
/// Laplace priors enter with the same scale as a Gaussian.
fn ridge(
    x: &Array2<f64>,
    y: &Array1<f64>,
    priors: &[Prior],
    noise_var: f64,
) -> Result<Array1<f64>, DecomposeError> {
    let mut a = x.t().dot(x) / noise_var;
    for (j, prior) in priors.iter().enumerate() {
        let s = prior.scale();
        a[[j, j]] += 1.0 / (s * s);
    }
    let b = x.t().dot(y) / noise_var;
    cholesky_solve(&a, &b).ok_or(DecomposeError::SingularSystem {
        columns: x.ncols(),
    })
}

fn residual_rms(x: &Array2<f64>, y: &Array1<f64>, beta: &Array1<f64>) -> f64 {
    let r = y - &x.dot(beta);
    r.as_slice().map_or(0.0, root_mean_square)
}

/// Runs L-BFGS from `start`; returns the refined coefficients or why they
/// were rejected.
fn refine(cost: MapCost<'_>, start: Vec<f64>, max_iters: u64) -> Result<Vec<f64>, String> {
    let start_cost = cost.value(&start);
    let linesearch = MoreThuenteLineSearch::new();
    let solver = LBFGS::new(linesearch, LBFGS_MEMORY)
        .with_tolerance_grad(1e-8)
        .map_err(|e| e.to_string())?
        .with_tolerance_cost(1e-12)
        .map_err(|e| e.to_string())?;
    let result = Executor::new(cost, solver)
        .configure(|state| state.param(start).max_iters(max_iters))
        .run()
        .map_err(|e| e.to_string())?;

    let state = result.state();
    let best = state
        .best_param
        .as_ref()
        .ok_or_else(|| "no parameters returned".to_string())?;
    let best_cost = state.get_best_cost();
    if !best_cost.is_finite() || best.iter().any(|b| !b.is_finite()) {
        return Err("non-finite result".to_string());
    }
    if best_cost > start_cost {
        return Err(format!("objective rose from {start_cost} to {best_cost}"));
    }
    debug!(
        iterations = state.get_iter(),
        start_cost, best_cost, "refinement finished"
    );
    Ok(best.clone())
}

/// Negative log posterior (up to a constant) in scaled target units.
#[derive(Clone, Copy)]
struct MapCost<'a> {
    x: &'a Array2<f64>,
    y: &'a Array1<f64>,
    priors: &'a [Prior],
    noise_var: f64,
}

impl MapCost<'_> {
    fn residuals(&self, beta: &[f64]) -> Array1<f64> {
        self.y - &self.x.dot(&ArrayView1::from(beta))
    }

    fn value(&self, beta: &[f64]) -> f64 {
        let r = self.residuals(beta);
        let fit = 0.5 * r.dot(&r) / self.noise_var;
        let penalty: f64 = self
            .priors
            .iter()
            .zip(beta)
            .map(|(prior, &b)| match *prior {
                Prior::Gaussian(s) => 0.5 * b * b / (s * s),
                Prior::Laplace(s) => (b * b + LAPLACE_EPS).sqrt() / s,
            })
            .sum();
        fit + penalty
    }
}

impl CostFunction for MapCost<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, beta: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        Ok(self.value(beta))
    }
}

impl Gradient for MapCost<'_> {
    type Param = Vec<f64>;
    type Gradient = Vec<f64>;

    fn gradient(&self, beta: &Self::Param) -> Result<Self::Gradient, argmin::core::Error> {
        let r = self.residuals(beta);
        let data_grad = self.x.t().dot(&r) / -self.noise_var;
        Ok(data_grad
            .iter()
            .zip(self.priors)
            .zip(beta)
            .map(|((g, prior), &b)| match *prior {
                Prior::Gaussian(s) => g + b / (s * s),
                Prior::Laplace(s) => g + b / (s * (b * b + LAPLACE_EPS).sqrt()),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn gradient_matches_finite_difference() {
        let x = array![[1.0, 0.0, 0.5], [1.0, 0.5, -0.2], [1.0, 1.0, 0.3], [1.0, 0.2, 0.9]];
        let y = array![0.3, 0.1, -0.4, 0.8];
        let priors = [Prior::Gaussian(5.0), Prior::Laplace(0.05), Prior::Gaussian(10.0)];
        let cost = MapCost {
            x: &x,
            y: &y,
            priors: &priors,
            noise_var: 0.04,
        };
        let beta = vec![0.2, -0.1, 0.4];
        let grad = cost.gradient(&beta).unwrap();
        let h = 1e-6;
        for j in 0..3 {
            let mut up = beta.clone();
            let mut down = beta.clone();
            up[j] += h;
            down[j] -= h;
            let fd = (cost.value(&up) - cost.value(&down)) / (2.0 * h);
            assert_abs_diff_eq!(grad[j], fd, epsilon = 1e-4);
        }
    }

    #[test]
    fn ridge_recovers_line_with_weak_prior() {
        let x = Array2::from_shape_fn((50, 2), |(i, j)| if j == 0 { 1.0 } else { i as f64 / 49.0 });
        let y = Array1::from_iter((0..50).map(|i| 0.2 + 0.5 * i as f64 / 49.0));
        let priors = [Prior::Gaussian(1e3), Prior::Gaussian(1e3)];
        let beta = ridge(&x, &y, &priors, 1.0).unwrap();
        assert_abs_diff_eq!(beta[0], 0.2, epsilon = 1e-6);
        assert_abs_diff_eq!(beta[1], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn refine_does_not_increase_cost() {
        let x = Array2::from_shape_fn((40, 3), |(i, j)| match j {
            0 => 1.0,
            1 => i as f64 / 39.0,
            _ => (i as f64 / 39.0 - 0.5).max(0.0),
        });
        let y = Array1::from_iter((0..40).map(|i| {
            let t = i as f64 / 39.0;
            0.1 + 0.3 * t + 0.6 * (t - 0.5).max(0.0)
        }));
        let priors = [Prior::Gaussian(5.0), Prior::Gaussian(5.0), Prior::Laplace(0.05)];
        let start = ridge(&x, &y, &priors, 0.01).unwrap().to_vec();
        let cost = MapCost {
            x: &x,
            y: &y,
            priors: &priors,
            noise_var: 0.01,
        };
        let before = cost.value(&start);
        if let Ok(beta) = refine(cost, start, 100) {
            assert!(cost.value(&beta) <= before + 1e-12);
        }
    }
}
