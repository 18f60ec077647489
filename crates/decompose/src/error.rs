//! Error types for the tandem-decompose crate.

/// Error type for all fallible operations in the tandem-decompose crate.
///
/// Covers unusable training histories, invalid model settings, regressors
/// missing from the input, and numerical failures of the closed-form solve.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecomposeError {
    /// Returned when the training series cannot support the requested model.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What is wrong with the input.
        reason: String,
    },

    /// Returned when a model setting is out of range.
    #[error("invalid {param}: {value}")]
    InvalidConfig {
        /// Setting name.
        param: &'static str,
        /// Offending value, formatted.
        value: String,
    },

    /// Returned when a regressor is absent from the schema or frame.
    #[error("regressor '{name}' is missing from the input")]
    MissingFeature {
        /// Regressor name.
        name: String,
    },

    /// Returned when the regularised normal equations are not positive definite.
    #[error("normal equations are singular ({columns} columns)")]
    SingularSystem {
        /// Number of design columns.
        columns: usize,
    },

    /// Wraps a container validation error.
    #[error(transparent)]
    Series(#[from] tandem_series::SeriesError),
}
