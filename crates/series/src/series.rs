//! The validated training/evaluation series.

use chrono::NaiveDate;
use tandem_calendar::{SplitBoundary, days_between};

use crate::error::SeriesError;
use crate::frame::FeatureFrame;
use crate::schema::{FeatureSchema, Observation};

/// Chronologically ordered observations sharing one schema, stored by column.
///
/// Invariants: non-empty, strictly increasing dates, finite targets and
/// features, binary features in {0, 1}.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    frame: FeatureFrame,
    targets: Vec<f64>,
}

impl Series {
    /// Builds a series from row observations.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`SeriesError::Empty`] | no observations |
    /// | [`SeriesError::RowWidth`] | an observation has the wrong number of features |
    /// | [`SeriesError::UnorderedDates`] | dates not strictly increasing |
    /// | [`SeriesError::NonFinite`] | NaN or infinite target or feature |
    /// | [`SeriesError::NonBinary`] | binary feature outside {0, 1} |
    pub fn new(schema: FeatureSchema, observations: Vec<Observation>) -> Result<Self, SeriesError> {
        let mut dates = Vec::with_capacity(observations.len());
        let mut targets = Vec::with_capacity(observations.len());
        let mut rows = Vec::with_capacity(observations.len());
        for obs in observations {
            dates.push(obs.date());
            targets.push(obs.target());
            rows.push(obs.features().to_vec());
        }
        let frame = FeatureFrame::new(schema, dates, rows)?;
        Self::from_parts(frame, targets)
    }

    /// Attaches targets to an existing frame.
    ///
    /// # Errors
    ///
    /// [`SeriesError::LengthMismatch`] if lengths differ, [`SeriesError::NonFinite`]
    /// for a NaN or infinite target.
    pub fn from_parts(frame: FeatureFrame, targets: Vec<f64>) -> Result<Self, SeriesError> {
        if targets.len() != frame.len() {
            return Err(SeriesError::LengthMismatch {
                what: "target".to_string(),
                expected: frame.len(),
                found: targets.len(),
            });
        }
        if let Some((index, &value)) = targets.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(SeriesError::NonFinite {
                index,
                field: "target".to_string(),
                value,
            });
        }
        Ok(Self { frame, targets })
    }

    /// Returns the feature frame (dates and covariates).
    pub fn frame(&self) -> &FeatureFrame {
        &self.frame
    }

    /// Returns the schema.
    pub fn schema(&self) -> &FeatureSchema {
        self.frame.schema()
    }

    /// Returns the dates.
    pub fn dates(&self) -> &[NaiveDate] {
        self.frame.dates()
    }

    /// Returns the targets.
    pub fn targets(&self) -> &[f64] {
        &self.targets
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Always `false` for a constructed series.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Days from the first to the last observation.
    pub fn span_days(&self) -> i64 {
        match (self.dates().first(), self.dates().last()) {
            (Some(&first), Some(&last)) => days_between(first, last),
            _ => 0,
        }
    }

    /// Returns observation `index` as a row.
    pub fn observation(&self, index: usize) -> Option<Observation> {
        let date = *self.dates().get(index)?;
        let features = self
            .schema()
            .names()
            .into_iter()
            .map(|name| self.frame.column(name).map(|c| c[index]))
            .collect::<Result<Vec<_>, _>>()
            .ok()?;
        Some(Observation::new(date, self.targets[index], features))
    }

    /// Splits at `boundary` into (training, evaluation).
    ///
    /// Both halves are non-empty, disjoint and together cover `self`.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::Split`] if either side would be empty.
    pub fn split(&self, boundary: &SplitBoundary) -> Result<(Series, Series), SeriesError> {
        let idx = boundary.partition(self.dates())?;
        let train = Series {
            frame: self.frame.slice(0..idx),
            targets: self.targets[..idx].to_vec(),
        };
        let eval = Series {
            frame: self.frame.slice(idx..self.len()),
            targets: self.targets[idx..].to_vec(),
        };
        Ok((train, eval))
    }
}
