//! Fitted tree ensemble.

use rayon::prelude::*;

use crate::error::BoostError;
use crate::matrix::FeatureMatrix;
use crate::tree::{Node, Tree};

/// A fitted boosted ensemble produced by [`fit()`](crate::fit).
///
/// Immutable. Keeps only the trees up to the round with the best holdout
/// score, plus the early-stopping record.
///
/// ```mermaid
/// graph LR
///     B["BoostFit"] --> C[".predict(&matrix)?"]
///     B --> D[".rounds_used() / .rounds_trained()"]
///     B --> E[".best_score() / .holdout_history()"]
///     B --> F[".feature_importance()"]
/// ```
#[derive(Debug, Clone)]
pub struct BoostFit {
    feature_names: Vec<String>,
    base_score: f64,
    trees: Vec<Tree>,
    rounds_trained: usize,
    best_score: f64,
    holdout_history: Vec<f64>,
    n_fit: usize,
    n_holdout: usize,
}

impl BoostFit {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        feature_names: Vec<String>,
        base_score: f64,
        trees: Vec<Tree>,
        rounds_trained: usize,
        best_score: f64,
        holdout_history: Vec<f64>,
        n_fit: usize,
        n_holdout: usize,
    ) -> Self {
        Self {
            feature_names,
            base_score,
            trees,
            rounds_trained,
            best_score,
            holdout_history,
            n_fit,
            n_holdout,
        }
    }

    /// Returns the feature names the ensemble was trained on.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Returns the constant prediction every tree adds to (fit-subset mean).
    pub fn base_score(&self) -> f64 {
        self.base_score
    }

    /// Number of trees kept (the best round). Never exceeds `n_trees`.
    pub fn rounds_used(&self) -> usize {
        self.trees.len()
    }

    /// Number of rounds trained before stopping.
    pub fn rounds_trained(&self) -> usize {
        self.rounds_trained
    }

    /// Best holdout RMSE, reached after [`rounds_used`](Self::rounds_used) rounds.
    pub fn best_score(&self) -> f64 {
        self.best_score
    }

    /// Holdout RMSE after each trained round.
    pub fn holdout_history(&self) -> &[f64] {
        &self.holdout_history
    }

    /// Number of rows used to grow trees.
    pub fn n_fit(&self) -> usize {
        self.n_fit
    }

    /// Number of rows held out for early stopping.
    pub fn n_holdout(&self) -> usize {
        self.n_holdout
    }

    /// Total split gain per feature over the kept trees, in feature order.
    pub fn feature_importance(&self) -> Vec<(String, f64)> {
        let mut totals = vec![0.0; self.feature_names.len()];
        for tree in &self.trees {
            for node in tree.nodes() {
                if let Node::Split { feature, gain, .. } = node {
                    totals[*feature] += gain;
                }
            }
        }
        self.feature_names.iter().cloned().zip(totals).collect()
    }

    /// Predicts one value per row of `matrix`.
    ///
    /// Columns are matched by name, so `matrix` may order them differently
    /// or carry extra columns.
    ///
    /// # Errors
    ///
    /// Returns [`BoostError::MissingFeature`] if a training feature is absent.
    pub fn predict(&self, matrix: &FeatureMatrix) -> Result<Vec<f64>, BoostError> {
        let columns = matrix.resolve(&self.feature_names)?;
        let view = matrix.view();
        Ok((0..matrix.n_rows())
            .into_par_iter()
            .map(|r| {
                self.base_score
                    + self
                        .trees
                        .iter()
                        .map(|t| t.predict(|f| view[[r, columns[f]]]))
                        .sum::<f64>()
            })
            .collect())
    }
}
