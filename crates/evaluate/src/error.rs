//! Evaluation error types.

/// Errors that can occur during evaluation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluateError {
    /// The inputs contain no values.
    #[error("cannot evaluate an empty sequence")]
    Empty,

    /// Actuals and predictions differ in length or dates.
    #[error("{what} is not aligned with actuals: {reason}")]
    Alignment {
        /// Which input is misaligned.
        what: &'static str,
        /// First mismatch.
        reason: String,
    },

    /// The baseline metric is zero, so relative improvement is undefined.
    #[error("relative improvement in {metric} is undefined: baseline is 0")]
    DivisionByZero {
        /// Metric name (`mae` or `rmse`).
        metric: &'static str,
    },

    /// JSON serialization failed.
    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}
