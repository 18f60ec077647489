//! Error types for the tandem-boost crate.

/// Error type for all fallible operations in the tandem-boost crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BoostError {
    /// Returned when a hyperparameter is out of range.
    #[error("invalid {param}: {value}")]
    InvalidConfig {
        /// Hyperparameter name.
        param: &'static str,
        /// Offending value, formatted.
        value: String,
    },

    /// Returned when the training data cannot be used.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What is wrong with the input.
        reason: String,
    },

    /// Returned when a feature used at fit time is absent at prediction time.
    #[error("feature '{name}' is missing from the matrix")]
    MissingFeature {
        /// Feature name.
        name: String,
    },

    /// Returned when a matrix has the same column name twice.
    #[error("duplicate feature name '{name}'")]
    DuplicateFeature {
        /// The repeated name.
        name: String,
    },

    /// Returned when the number of names does not match the number of columns.
    #[error("{names} feature names for {columns} columns")]
    ShapeMismatch {
        /// Number of names.
        names: usize,
        /// Number of columns.
        columns: usize,
    },

    /// Returned when a matrix value is NaN or infinite.
    #[error("non-finite value at row {row}, column '{column}'")]
    NonFinite {
        /// Row index.
        row: usize,
        /// Column name.
        column: String,
    },
}
