//! High-level Parquet reader configuration and orchestration.

use std::path::Path;

use arrow::datatypes::{DataType, SchemaRef};
use tandem_series::{FeatureField, FeatureFrame, FeatureSchema, Series};
use tracing::{debug, info};

use crate::error::IoError;
use crate::parquet_read;

/// Column layout of observation and future-frame files.
///
/// By default the date column is `date`, the target is `target`, and every
/// other Float64 or Boolean column is a feature (Boolean columns become
/// binary features).
#[derive(Debug, Clone, PartialEq)]
pub struct ReaderConfig {
    date_column: String,
    target_column: String,
    /// Explicit feature columns; `None` reads all remaining columns.
    features: Option<Vec<String>>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            date_column: "date".into(),
            target_column: "target".into(),
            features: None,
        }
    }
}

impl ReaderConfig {
    /// Set the date column name.
    pub fn with_date_column(mut self, name: impl Into<String>) -> Self {
        self.date_column = name.into();
        self
    }

    /// Set the target column name.
    pub fn with_target_column(mut self, name: impl Into<String>) -> Self {
        self.target_column = name.into();
        self
    }

    /// Read only these feature columns, in this order.
    pub fn with_features<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Validate that the configuration is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] listing every empty or clashing
    /// column name.
    pub fn validate(&self) -> Result<(), IoError> {
        let mut problems = Vec::new();
        if self.date_column.is_empty() {
            problems.push("date column name is empty".to_string());
        }
        if self.target_column.is_empty() {
            problems.push("target column name is empty".to_string());
        }
        if self.date_column == self.target_column {
            problems.push(format!(
                "date and target both use column '{}'",
                self.date_column
            ));
        }
        for name in self.features.iter().flatten() {
            if name == &self.date_column || name == &self.target_column {
                problems.push(format!("feature '{name}' clashes with the date or target column"));
            }
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(IoError::Validation {
                count: problems.len(),
                details: problems.join("; "),
            })
        }
    }

    /// Feature columns of `schema`: the explicit list, or every column except
    /// date and target.
    fn feature_columns(&self, schema: &SchemaRef) -> Vec<String> {
        match &self.features {
            Some(names) => names.clone(),
            None => schema
                .fields()
                .iter()
                .map(|f| f.name().clone())
                .filter(|n| n != &self.date_column && n != &self.target_column)
                .collect(),
        }
    }
}

/// Read a training series: dates, targets and features.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`IoError::FileNotFound`] | `path` does not exist |
/// | [`IoError::MissingColumn`] | date, target or a listed feature column is absent |
/// | [`IoError::UnsupportedType`] | date is not Date32, or a value column is not Float64/Boolean |
/// | [`IoError::NullValue`] | any required value is null |
/// | [`IoError::Series`] | empty file, unsorted dates or non-finite values |
pub fn read_series(path: &Path, config: &ReaderConfig) -> Result<Series, IoError> {
    config.validate()?;
    let (schema, batches) = parquet_read::read_batches(path)?;
    let target_idx = parquet_read::column_index(&schema, &config.target_column, path)?;
    let targets = parquet_read::value_column(&schema, &batches, target_idx)?;
    let frame = build_frame(path, config, &schema, &batches)?;
    let series = Series::from_parts(frame, targets)?;
    info!(
        path = %path.display(),
        rows = series.len(),
        features = series.schema().len(),
        "read series"
    );
    Ok(series)
}

/// Read a future feature frame. A target column, if present, is ignored.
///
/// # Errors
///
/// Same as [`read_series`], except that no target column is required.
pub fn read_frame(path: &Path, config: &ReaderConfig) -> Result<FeatureFrame, IoError> {
    config.validate()?;
    let (schema, batches) = parquet_read::read_batches(path)?;
    let frame = build_frame(path, config, &schema, &batches)?;
    info!(path = %path.display(), rows = frame.len(), "read frame");
    Ok(frame)
}

fn build_frame(
    path: &Path,
    config: &ReaderConfig,
    schema: &SchemaRef,
    batches: &[arrow::array::RecordBatch],
) -> Result<FeatureFrame, IoError> {
    let date_idx = parquet_read::column_index(schema, &config.date_column, path)?;
    let dates = parquet_read::date_column(schema, batches, date_idx)?;

    let mut fields = Vec::new();
    let mut columns = Vec::new();
    for name in config.feature_columns(schema) {
        let idx = parquet_read::column_index(schema, &name, path)?;
        let field = match schema.field(idx).data_type() {
            DataType::Boolean => FeatureField::binary(&name),
            _ => FeatureField::continuous(&name),
        };
        columns.push(parquet_read::value_column(schema, batches, idx)?);
        debug!(column = %name, kind = ?field.kind(), "feature column");
        fields.push(field);
    }

    Ok(FeatureFrame::from_columns(
        FeatureSchema::new(fields)?,
        dates,
        columns,
    )?)
}
