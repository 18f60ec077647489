//! Boosting hyperparameters and early-stopping settings.

use crate::error::BoostError;

/// Hyperparameters of the tree ensemble.
///
/// Use the builder methods to customise parameters.
///
/// # Example
///
/// ```
/// use tandem_boost::BoostConfig;
///
/// let config = BoostConfig::new()
///     .with_n_trees(300)
///     .with_learning_rate(0.1)
///     .with_max_depth(3);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BoostConfig {
    /// Upper bound on boosting rounds.
    n_trees: usize,
    /// Shrinkage applied to every leaf.
    learning_rate: f64,
    /// Maximum tree depth (a depth-1 tree is a stump).
    max_depth: usize,
    /// Fraction of fit rows drawn per round.
    row_subsample: f64,
    /// Fraction of features considered per round.
    col_subsample: f64,
    /// Seed for the holdout split and subsampling.
    seed: u64,
    /// Minimum rows on each side of a split.
    min_samples_leaf: usize,
    /// L2 penalty on leaf values.
    l2_regularization: f64,
}

impl BoostConfig {
    /// Creates a configuration with defaults: 500 trees, learning rate 0.05,
    /// depth 4, row and column subsample 0.8, seed 42, 5 rows per leaf,
    /// L2 penalty 1.
    pub fn new() -> Self {
        Self {
            n_trees: 500,
            learning_rate: 0.05,
            max_depth: 4,
            row_subsample: 0.8,
            col_subsample: 0.8,
            seed: 42,
            min_samples_leaf: 5,
            l2_regularization: 1.0,
        }
    }

    /// Sets the maximum number of boosting rounds.
    pub fn with_n_trees(mut self, n: usize) -> Self {
        self.n_trees = n;
        self
    }

    /// Sets the learning rate.
    pub fn with_learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    /// Sets the maximum tree depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Sets the row subsample fraction.
    pub fn with_row_subsample(mut self, fraction: f64) -> Self {
        self.row_subsample = fraction;
        self
    }

    /// Sets the column subsample fraction.
    pub fn with_col_subsample(mut self, fraction: f64) -> Self {
        self.col_subsample = fraction;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the minimum number of rows per leaf.
    pub fn with_min_samples_leaf(mut self, n: usize) -> Self {
        self.min_samples_leaf = n;
        self
    }

    /// Sets the L2 penalty on leaf values.
    pub fn with_l2_regularization(mut self, lambda: f64) -> Self {
        self.l2_regularization = lambda;
        self
    }

    /// Returns the maximum number of rounds.
    pub fn n_trees(&self) -> usize {
        self.n_trees
    }

    /// Returns the learning rate.
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Returns the maximum depth.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns the row subsample fraction.
    pub fn row_subsample(&self) -> f64 {
        self.row_subsample
    }

    /// Returns the column subsample fraction.
    pub fn col_subsample(&self) -> f64 {
        self.col_subsample
    }

    /// Returns the seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the minimum rows per leaf.
    pub fn min_samples_leaf(&self) -> usize {
        self.min_samples_leaf
    }

    /// Returns the L2 penalty.
    pub fn l2_regularization(&self) -> f64 {
        self.l2_regularization
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BoostError::InvalidConfig`] naming the first parameter out
    /// of range: `n_trees`, `max_depth` or `min_samples_leaf` of 0, a learning
    /// rate or subsample fraction outside `(0, 1]`, or a negative or
    /// non-finite L2 penalty.
    pub fn validate(&self) -> Result<(), BoostError> {
        if self.n_trees < 1 {
            return Err(invalid("n_trees", self.n_trees));
        }
        if !in_unit_interval(self.learning_rate) {
            return Err(invalid("learning_rate", self.learning_rate));
        }
        if self.max_depth < 1 {
            return Err(invalid("max_depth", self.max_depth));
        }
        if !in_unit_interval(self.row_subsample) {
            return Err(invalid("row_subsample", self.row_subsample));
        }
        if !in_unit_interval(self.col_subsample) {
            return Err(invalid("col_subsample", self.col_subsample));
        }
        if self.min_samples_leaf < 1 {
            return Err(invalid("min_samples_leaf", self.min_samples_leaf));
        }
        if !self.l2_regularization.is_finite() || self.l2_regularization < 0.0 {
            return Err(invalid("l2_regularization", self.l2_regularization));
        }
        Ok(())
    }
}

impl Default for BoostConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Holdout early-stopping settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EarlyStopping {
    validation_fraction: f64,
    rounds: usize,
}

impl EarlyStopping {
    /// Creates early-stopping settings.
    pub fn new(validation_fraction: f64, rounds: usize) -> Self {
        Self {
            validation_fraction,
            rounds,
        }
    }

    /// Fraction of rows held out for scoring, in `(0, 1)`.
    pub fn validation_fraction(&self) -> f64 {
        self.validation_fraction
    }

    /// Consecutive non-improving rounds tolerated before stopping.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Validates these settings.
    ///
    /// # Errors
    ///
    /// Returns [`BoostError::InvalidConfig`] if the fraction is not strictly
    /// between 0 and 1 or `rounds` is 0.
    pub fn validate(&self) -> Result<(), BoostError> {
        let f = self.validation_fraction;
        if !(f > 0.0 && f < 1.0) {
            return Err(invalid("validation_fraction", f));
        }
        if self.rounds < 1 {
            return Err(invalid("early_stopping_rounds", self.rounds));
        }
        Ok(())
    }
}

impl Default for EarlyStopping {
    /// 20 % holdout, patience of 20 rounds.
    fn default() -> Self {
        Self::new(0.2, 20)
    }
}

fn in_unit_interval(x: f64) -> bool {
    x > 0.0 && x <= 1.0
}

fn invalid(param: &'static str, value: impl ToString) -> BoostError {
    BoostError::InvalidConfig {
        param,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = BoostConfig::default();
        assert_eq!(cfg.n_trees(), 500);
        assert_eq!(cfg.max_depth(), 4);
        assert_eq!(cfg.seed(), 42);
        assert!(cfg.validate().is_ok());
        assert!(EarlyStopping::default().validate().is_ok());
    }

    #[test]
    fn test_builder_chaining() {
        let cfg = BoostConfig::new()
            .with_n_trees(10)
            .with_learning_rate(0.3)
            .with_row_subsample(0.5)
            .with_col_subsample(1.0)
            .with_min_samples_leaf(2)
            .with_l2_regularization(0.0)
            .with_seed(7);
        assert_eq!(cfg.n_trees(), 10);
        assert_eq!(cfg.learning_rate(), 0.3);
        assert_eq!(cfg.row_subsample(), 0.5);
        assert_eq!(cfg.min_samples_leaf(), 2);
        assert_eq!(cfg.seed(), 7);
        assert!(cfg.validate().is_ok());
    }

    fn param_of(err: BoostError) -> &'static str {
        match err {
            BoostError::InvalidConfig { param, .. } => param,
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_invalid_params() {
        let cases = [
            (BoostConfig::new().with_n_trees(0), "n_trees"),
            (BoostConfig::new().with_learning_rate(0.0), "learning_rate"),
            (BoostConfig::new().with_learning_rate(1.5), "learning_rate"),
            (BoostConfig::new().with_max_depth(0), "max_depth"),
            (BoostConfig::new().with_row_subsample(0.0), "row_subsample"),
            (BoostConfig::new().with_col_subsample(1.01), "col_subsample"),
            (BoostConfig::new().with_min_samples_leaf(0), "min_samples_leaf"),
            (
                BoostConfig::new().with_l2_regularization(-1.0),
                "l2_regularization",
            ),
            (
                BoostConfig::new().with_learning_rate(f64::NAN),
                "learning_rate",
            ),
        ];
        for (cfg, expected) in cases {
            assert_eq!(param_of(cfg.validate().unwrap_err()), expected);
        }
    }

    #[test]
    fn test_learning_rate_one_is_valid() {
        assert!(BoostConfig::new().with_learning_rate(1.0).validate().is_ok());
    }

    #[test]
    fn test_invalid_early_stopping() {
        assert_eq!(
            param_of(EarlyStopping::new(0.0, 5).validate().unwrap_err()),
            "validation_fraction"
        );
        assert_eq!(
            param_of(EarlyStopping::new(1.0, 5).validate().unwrap_err()),
            "validation_fraction"
        );
        assert_eq!(
            param_of(EarlyStopping::new(0.2, 0).validate().unwrap_err()),
            "early_stopping_rounds"
        );
    }
}
