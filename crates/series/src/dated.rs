//! Date-aligned value sequences.

use chrono::NaiveDate;

use crate::error::SeriesError;
use crate::frame::check_increasing;

/// A sequence of values, one per strictly increasing date.
///
/// Used for predictions and residuals. May be empty.
#[derive(Debug, Clone, PartialEq)]
pub struct DatedValues {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl DatedValues {
    /// Creates a dated sequence.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`SeriesError::LengthMismatch`] | `values.len() != dates.len()` |
    /// | [`SeriesError::UnorderedDates`] | dates not strictly increasing |
    /// | [`SeriesError::NonFinite`] | NaN or infinite value |
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self, SeriesError> {
        if values.len() != dates.len() {
            return Err(SeriesError::LengthMismatch {
                what: "values".to_string(),
                expected: dates.len(),
                found: values.len(),
            });
        }
        check_increasing(&dates)?;
        if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(SeriesError::NonFinite {
                index,
                field: "value".to_string(),
                value,
            });
        }
        Ok(Self { dates, values })
    }

    /// Returns the dates.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Returns the values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates `(date, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    /// Consumes `self` and returns `(dates, values)`.
    pub fn into_parts(self) -> (Vec<NaiveDate>, Vec<f64>) {
        (self.dates, self.values)
    }

    /// Checks that `self` has exactly the dates in `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::Alignment`] describing the first mismatch.
    pub fn check_aligned(&self, expected: &[NaiveDate]) -> Result<(), SeriesError> {
        check_dates_aligned(expected, &self.dates)
    }
}

/// Checks that `found` holds the same dates as `expected`, position by position.
///
/// # Errors
///
/// Returns [`SeriesError::Alignment`] at the first differing position; a
/// shorter sequence reports `end`.
pub fn check_dates_aligned(expected: &[NaiveDate], found: &[NaiveDate]) -> Result<(), SeriesError> {
    let n = expected.len().max(found.len());
    for index in 0..n {
        let e = expected.get(index);
        let f = found.get(index);
        if e != f {
            let show =
                |d: Option<&NaiveDate>| d.map_or_else(|| "end".to_string(), ToString::to_string);
            return Err(SeriesError::Alignment {
                index,
                expected: show(e),
                found: show(f),
            });
        }
    }
    Ok(())
}
