//! Error types for the tandem-series crate.

use chrono::NaiveDate;
use tandem_calendar::CalendarError;

/// Error type for all fallible operations in the tandem-series crate.
///
/// Input validation failures carry the offending row index and field name.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeriesError {
    /// Returned when a series or frame has no rows.
    #[error("series must contain at least one observation")]
    Empty,

    /// Returned when a schema field has an empty name.
    #[error("feature at position {index} has an empty name")]
    EmptyFeatureName {
        /// Position of the field in the schema.
        index: usize,
    },

    /// Returned when a schema contains the same name twice.
    #[error("duplicate feature name '{name}'")]
    DuplicateFeature {
        /// The repeated name.
        name: String,
    },

    /// Returned when a row does not have one value per schema field.
    #[error("row {index} has {found} feature values, schema has {expected}")]
    RowWidth {
        /// Row index.
        index: usize,
        /// Number of schema fields.
        expected: usize,
        /// Number of values in the row.
        found: usize,
    },

    /// Returned when dates are not strictly increasing.
    #[error("date {date} at row {index} does not follow {previous}")]
    UnorderedDates {
        /// Row index of the offending date.
        index: usize,
        /// Date of the previous row.
        previous: NaiveDate,
        /// Offending date.
        date: NaiveDate,
    },

    /// Returned when a target or feature value is NaN or infinite.
    #[error("non-finite {field} value {value} at row {index}")]
    NonFinite {
        /// Row index.
        index: usize,
        /// `target` or the feature name.
        field: String,
        /// Offending value.
        value: f64,
    },

    /// Returned when a binary feature holds something other than 0 or 1.
    #[error("binary feature '{field}' has value {value} at row {index}, expected 0 or 1")]
    NonBinary {
        /// Row index.
        index: usize,
        /// Feature name.
        field: String,
        /// Offending value.
        value: f64,
    },

    /// Returned when parallel columns have different lengths.
    #[error("{what} has length {found}, expected {expected}")]
    LengthMismatch {
        /// Name of the offending column.
        what: String,
        /// Expected length.
        expected: usize,
        /// Actual length.
        found: usize,
    },

    /// Returned when a named feature is not present.
    #[error("feature '{name}' is not present")]
    MissingFeature {
        /// Requested feature name.
        name: String,
    },

    /// Returned when two date sequences do not line up.
    #[error("dates are not aligned at position {index}: expected {expected}, found {found}")]
    Alignment {
        /// First position where the sequences differ.
        index: usize,
        /// Date expected at that position (`end` if the sequence is shorter).
        expected: String,
        /// Date found at that position (`end` if the sequence is shorter).
        found: String,
    },

    /// Wraps a split failure from tandem-calendar.
    #[error(transparent)]
    Split(#[from] CalendarError),
}
