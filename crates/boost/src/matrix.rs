//! Named feature matrix.

use ndarray::{Array2, ArrayView2};

use crate::error::BoostError;

/// Row-per-observation feature matrix with one name per column.
///
/// Values are finite and names unique, checked once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    names: Vec<String>,
    data: Array2<f64>,
}

impl FeatureMatrix {
    /// Wraps `data` (rows × columns) with column `names`.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`BoostError::ShapeMismatch`] | `names.len() != data.ncols()` |
    /// | [`BoostError::DuplicateFeature`] | a name appears twice |
    /// | [`BoostError::NonFinite`] | NaN or infinite value |
    pub fn new(names: Vec<String>, data: Array2<f64>) -> Result<Self, BoostError> {
        if names.len() != data.ncols() {
            return Err(BoostError::ShapeMismatch {
                names: names.len(),
                columns: data.ncols(),
            });
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(BoostError::DuplicateFeature { name: name.clone() });
            }
        }
        for ((row, col), value) in data.indexed_iter() {
            if !value.is_finite() {
                return Err(BoostError::NonFinite {
                    row,
                    column: names[col].clone(),
                });
            }
        }
        Ok(Self { names, data })
    }

    /// Builds a matrix from row-major values.
    ///
    /// # Errors
    ///
    /// [`BoostError::ShapeMismatch`] if a row's width differs from
    /// `names.len()`, otherwise as [`FeatureMatrix::new`].
    pub fn from_rows(names: Vec<String>, rows: &[Vec<f64>]) -> Result<Self, BoostError> {
        let width = names.len();
        if let Some(row) = rows.iter().find(|r| r.len() != width) {
            return Err(BoostError::ShapeMismatch {
                names: width,
                columns: row.len(),
            });
        }
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        let data = Array2::from_shape_vec((rows.len(), width), flat).map_err(|_| {
            BoostError::ShapeMismatch {
                names: width,
                columns: 0,
            }
        })?;
        Self::new(names, data)
    }

    /// Returns the column names.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.data.ncols()
    }

    /// Returns the column index of `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Returns a view of the values.
    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    /// Resolves `names` to column indices of `self`.
    ///
    /// # Errors
    ///
    /// Returns [`BoostError::MissingFeature`] for the first absent name.
    pub fn resolve(&self, names: &[String]) -> Result<Vec<usize>, BoostError> {
        names
            .iter()
            .map(|name| {
                self.column_index(name)
                    .ok_or_else(|| BoostError::MissingFeature { name: name.clone() })
            })
            .collect()
    }
}
