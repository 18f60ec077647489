//! Boosting loop with seeded subsampling and holdout early stopping.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::{SliceRandom, index};
use tandem_stats::{mean, root_mean_square};
use tracing::{debug, info};

use crate::config::{BoostConfig, EarlyStopping};
use crate::error::BoostError;
use crate::matrix::FeatureMatrix;
use crate::model::BoostFit;
use crate::tree::{GrowParams, grow};

/// Fits a boosted tree ensemble to `target` (one value per matrix row).
///
/// Rows are split into fit and holdout subsets by a seeded uniform shuffle.
/// Each round grows one tree on a row and column subsample of the fit
/// subset and scores the holdout RMSE. Training stops after
/// `early_stopping.rounds()` rounds without improvement, or at `n_trees`;
/// the returned model keeps the trees up to the best round.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`BoostError::InvalidConfig`] | `config` or `early_stopping` fails validation |
/// | [`BoostError::InvalidInput`] | length mismatch, non-finite target, no columns, or an empty fit/holdout subset |
#[tracing::instrument(skip_all, fields(rows = matrix.n_rows(), cols = matrix.n_cols()))]
pub fn fit(
    matrix: &FeatureMatrix,
    target: &[f64],
    early_stopping: &EarlyStopping,
    config: &BoostConfig,
) -> Result<BoostFit, BoostError> {
    config.validate()?;
    early_stopping.validate()?;
    let n = matrix.n_rows();
    if target.len() != n {
        return Err(BoostError::InvalidInput {
            reason: format!("{} targets for {n} rows", target.len()),
        });
    }
    if let Some(i) = target.iter().position(|v| !v.is_finite()) {
        return Err(BoostError::InvalidInput {
            reason: format!("non-finite target at row {i}"),
        });
    }
    if matrix.n_cols() == 0 {
        return Err(BoostError::InvalidInput {
            reason: "matrix has no feature columns".to_string(),
        });
    }

    let mut rng = StdRng::seed_from_u64(config.seed());
    let (fit_rows, holdout_rows) =
        holdout_split(n, early_stopping.validation_fraction(), &mut rng)?;

    let base_score = mean(&fit_rows.iter().map(|&r| target[r]).collect::<Vec<_>>());
    let mut prediction = vec![base_score; n];
    let mut residual = vec![0.0; n];
    let x = matrix.view();
    let params = GrowParams {
        max_depth: config.max_depth(),
        min_samples_leaf: config.min_samples_leaf(),
        l2: config.l2_regularization(),
        learning_rate: config.learning_rate(),
    };
    let n_row_sample = sample_size(fit_rows.len(), config.row_subsample());
    let n_col_sample = sample_size(matrix.n_cols(), config.col_subsample());

    let mut trees = Vec::new();
    let mut history = Vec::new();
    let mut best_score = f64::INFINITY;
    let mut best_round = 0;
    let mut stale = 0;

    for round in 1..=config.n_trees() {
        let mut rows: Vec<usize> = index::sample(&mut rng, fit_rows.len(), n_row_sample)
            .into_iter()
            .map(|i| fit_rows[i])
            .collect();
        rows.sort_unstable();
        let mut cols = index::sample(&mut rng, matrix.n_cols(), n_col_sample).into_vec();
        cols.sort_unstable();

        for &r in &rows {
            residual[r] = target[r] - prediction[r];
        }
        let tree = grow(x, &residual, rows, &cols, &params);
        for (r, p) in prediction.iter_mut().enumerate() {
            *p += tree.predict(|f| x[[r, f]]);
        }
        let depth = tree.depth();
        trees.push(tree);

        let errors: Vec<f64> = holdout_rows.iter().map(|&r| target[r] - prediction[r]).collect();
        let score = root_mean_square(&errors);
        history.push(score);
        debug!(round, holdout_rmse = score, depth, "boosting round");

        if score < best_score {
            best_score = score;
            best_round = round;
            stale = 0;
        } else {
            stale += 1;
            if stale >= early_stopping.rounds() {
                break;
            }
        }
    }

    let rounds_trained = trees.len();
    trees.truncate(best_round);
    info!(
        rounds_trained,
        rounds_used = best_round,
        best_holdout_rmse = best_score,
        "stage 2 fitted"
    );
    Ok(BoostFit::new(
        matrix.names().to_vec(),
        base_score,
        trees,
        rounds_trained,
        best_score,
        history,
        fit_rows.len(),
        holdout_rows.len(),
    ))
}

/// Shuffles `0..n` and carves off the holdout; both parts are returned sorted.
fn holdout_split(
    n: usize,
    fraction: f64,
    rng: &mut StdRng,
) -> Result<(Vec<usize>, Vec<usize>), BoostError> {
    let n_holdout = (n as f64 * fraction).round() as usize;
    if n_holdout == 0 || n_holdout >= n {
        return Err(BoostError::InvalidInput {
            reason: format!(
                "validation fraction {fraction} of {n} rows leaves an empty fit or holdout subset"
            ),
        });
    }
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);
    let mut holdout = order[..n_holdout].to_vec();
    let mut fit = order[n_holdout..].to_vec();
    holdout.sort_unstable();
    fit.sort_unstable();
    Ok((fit, holdout))
}

fn sample_size(n: usize, fraction: f64) -> usize {
    ((n as f64 * fraction).round() as usize).clamp(1, n)
}
