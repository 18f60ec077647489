//! Error types for the tandem-hybrid crate.

use tandem_boost::BoostError;
use tandem_decompose::DecomposeError;
use tandem_evaluate::EvaluateError;
use tandem_series::SeriesError;

/// Error type for the hybrid pipeline.
///
/// Stage failures are wrapped so the caller can tell which stage failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HybridError {
    /// Returned when the pipeline configuration is inconsistent.
    #[error("invalid {param}: {value}")]
    InvalidConfig {
        /// Setting name.
        param: &'static str,
        /// Offending value, formatted.
        value: String,
    },

    /// Returned when a Stage 2 regressor is absent from the input frame.
    #[error("stage 2 feature '{name}' is not present")]
    MissingFeature {
        /// Feature name.
        name: String,
    },

    /// Returned when two dated sequences do not cover the same dates.
    #[error("alignment error: {0}")]
    Alignment(SeriesError),

    /// Stage 1 (decomposition) failed.
    #[error("stage 1 failed: {0}")]
    Stage1(#[from] DecomposeError),

    /// Stage 2 (boosted residual learner) failed.
    #[error("stage 2 failed: {0}")]
    Stage2(#[from] BoostError),

    /// Evaluation failed.
    #[error("evaluation failed: {0}")]
    Evaluate(#[from] EvaluateError),

    /// Series construction or splitting failed.
    #[error(transparent)]
    Series(#[from] SeriesError),
}
