//! Column-wise feature storage without targets.

use std::ops::Range;

use chrono::NaiveDate;

use crate::error::SeriesError;
use crate::schema::{FeatureKind, FeatureSchema};

/// Dates plus one column per schema field.
///
/// This is the target-free part of a [`Series`](crate::Series) and the input
/// for out-of-sample prediction. Invariants (checked at construction):
/// non-empty, strictly increasing dates, one finite value per field and row,
/// binary fields restricted to 0/1.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureFrame {
    schema: FeatureSchema,
    dates: Vec<NaiveDate>,
    columns: Vec<Vec<f64>>,
}

impl FeatureFrame {
    /// Builds a frame from row-major values.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`SeriesError::Empty`] | `dates` is empty |
    /// | [`SeriesError::LengthMismatch`] | `rows.len() != dates.len()` |
    /// | [`SeriesError::RowWidth`] | a row has the wrong number of values |
    /// | [`SeriesError::UnorderedDates`] | dates not strictly increasing |
    /// | [`SeriesError::NonFinite`] | NaN or infinite value |
    /// | [`SeriesError::NonBinary`] | binary field outside {0, 1} |
    pub fn new(
        schema: FeatureSchema,
        dates: Vec<NaiveDate>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self, SeriesError> {
        if rows.len() != dates.len() {
            return Err(SeriesError::LengthMismatch {
                what: "rows".to_string(),
                expected: dates.len(),
                found: rows.len(),
            });
        }
        let width = schema.len();
        let mut columns = vec![Vec::with_capacity(rows.len()); width];
        for (index, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(SeriesError::RowWidth {
                    index,
                    expected: width,
                    found: row.len(),
                });
            }
            for (column, &value) in columns.iter_mut().zip(row) {
                column.push(value);
            }
        }
        Self::from_columns(schema, dates, columns)
    }

    /// Builds a frame from one vector per schema field.
    ///
    /// # Errors
    ///
    /// Same as [`FeatureFrame::new`], with [`SeriesError::LengthMismatch`]
    /// reported per column.
    pub fn from_columns(
        schema: FeatureSchema,
        dates: Vec<NaiveDate>,
        columns: Vec<Vec<f64>>,
    ) -> Result<Self, SeriesError> {
        if dates.is_empty() {
            return Err(SeriesError::Empty);
        }
        check_increasing(&dates)?;
        if columns.len() != schema.len() {
            return Err(SeriesError::LengthMismatch {
                what: "columns".to_string(),
                expected: schema.len(),
                found: columns.len(),
            });
        }
        for (field, column) in schema.fields().iter().zip(&columns) {
            if column.len() != dates.len() {
                return Err(SeriesError::LengthMismatch {
                    what: field.name().to_string(),
                    expected: dates.len(),
                    found: column.len(),
                });
            }
            for (index, &value) in column.iter().enumerate() {
                if !value.is_finite() {
                    return Err(SeriesError::NonFinite {
                        index,
                        field: field.name().to_string(),
                        value,
                    });
                }
                if field.kind() == FeatureKind::Binary && value != 0.0 && value != 1.0 {
                    return Err(SeriesError::NonBinary {
                        index,
                        field: field.name().to_string(),
                        value,
                    });
                }
            }
        }
        Ok(Self {
            schema,
            dates,
            columns,
        })
    }

    /// Returns the schema.
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Returns the dates.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Returns the column for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::MissingFeature`] if the schema has no such field.
    pub fn column(&self, name: &str) -> Result<&[f64], SeriesError> {
        self.schema
            .index_of(name)
            .map(|idx| self.columns[idx].as_slice())
            .ok_or_else(|| SeriesError::MissingFeature {
                name: name.to_string(),
            })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Always `false` for a constructed frame.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Row subset; `range` must be non-empty and in bounds.
    pub(crate) fn slice(&self, range: Range<usize>) -> Self {
        Self {
            schema: self.schema.clone(),
            dates: self.dates[range.clone()].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|c| c[range.clone()].to_vec())
                .collect(),
        }
    }
}

/// Checks that `dates` is strictly increasing.
pub(crate) fn check_increasing(dates: &[NaiveDate]) -> Result<(), SeriesError> {
    for (index, pair) in dates.windows(2).enumerate() {
        if pair[1] <= pair[0] {
            return Err(SeriesError::UnorderedDates {
                index: index + 1,
                previous: pair[0],
                date: pair[1],
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FeatureField;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn schema() -> FeatureSchema {
        FeatureSchema::new(vec![
            FeatureField::continuous("temp"),
            FeatureField::binary("promo"),
        ])
        .unwrap()
    }

    #[test]
    fn rows_become_columns() {
        let frame = FeatureFrame::new(
            schema(),
            vec![date(1), date(2)],
            vec![vec![10.0, 0.0], vec![12.5, 1.0]],
        )
        .unwrap();
        assert_eq!(frame.column("temp").unwrap(), &[10.0, 12.5]);
        assert_eq!(frame.column("promo").unwrap(), &[0.0, 1.0]);
        assert_eq!(frame.len(), 2);
    }

    #[test]
    fn missing_column() {
        let frame = FeatureFrame::new(schema(), vec![date(1)], vec![vec![1.0, 0.0]]).unwrap();
        assert_eq!(
            frame.column("wind").unwrap_err(),
            SeriesError::MissingFeature {
                name: "wind".to_string()
            }
        );
    }

    #[test]
    fn rejects_non_binary() {
        let err = FeatureFrame::new(schema(), vec![date(1)], vec![vec![1.0, 0.5]]).unwrap_err();
        assert!(matches!(err, SeriesError::NonBinary { index: 0, .. }));
    }

    #[test]
    fn rejects_short_row() {
        let err = FeatureFrame::new(schema(), vec![date(1)], vec![vec![1.0]]).unwrap_err();
        assert_eq!(
            err,
            SeriesError::RowWidth {
                index: 0,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn rejects_duplicate_dates() {
        let err = FeatureFrame::new(
            schema(),
            vec![date(1), date(1)],
            vec![vec![1.0, 0.0], vec![1.0, 0.0]],
        )
        .unwrap_err();
        assert!(matches!(err, SeriesError::UnorderedDates { index: 1, .. }));
    }

    #[test]
    fn rejects_empty() {
        let err = FeatureFrame::new(schema(), vec![], vec![]).unwrap_err();
        assert_eq!(err, SeriesError::Empty);
    }

    #[test]
    fn slice_keeps_schema() {
        let frame = FeatureFrame::new(
            schema(),
            vec![date(1), date(2), date(3)],
            vec![vec![1.0, 0.0], vec![2.0, 1.0], vec![3.0, 0.0]],
        )
        .unwrap();
        let tail = frame.slice(1..3);
        assert_eq!(tail.dates(), &[date(2), date(3)]);
        assert_eq!(tail.column("temp").unwrap(), &[2.0, 3.0]);
        assert_eq!(tail.schema(), frame.schema());
    }
}
