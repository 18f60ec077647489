//! Low-level Parquet column building.

use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Date32Array, Float64Array, RecordBatch};
use arrow::datatypes::{DataType, Field, Schema};
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use tandem_hybrid::ForecastRecord;
use tandem_series::{FeatureKind, Series};

use crate::error::IoError;
use crate::parquet_read::days_from_date;

/// Builds the Arrow schema for forecast output.
///
/// `date`, `stage1`, `stage2` and `hybrid` are required; `actual` is
/// nullable and empty for future dates.
pub(crate) fn forecast_schema() -> Schema {
    Schema::new(vec![
        Field::new("date", DataType::Date32, false),
        Field::new("stage1", DataType::Float64, false),
        Field::new("stage2", DataType::Float64, false),
        Field::new("hybrid", DataType::Float64, false),
        Field::new("actual", DataType::Float64, true),
    ])
}

/// Converts forecast records into one [`RecordBatch`].
pub(crate) fn forecast_to_record_batch(
    records: &[ForecastRecord],
    schema: &Schema,
) -> Result<RecordBatch, IoError> {
    let dates: Vec<i32> = records.iter().map(|r| days_from_date(r.date)).collect();
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Date32Array::from(dates)),
        Arc::new(Float64Array::from_iter_values(records.iter().map(|r| r.stage1))),
        Arc::new(Float64Array::from_iter_values(records.iter().map(|r| r.stage2))),
        Arc::new(Float64Array::from_iter_values(records.iter().map(|r| r.hybrid))),
        Arc::new(Float64Array::from(
            records.iter().map(|r| r.actual).collect::<Vec<_>>(),
        )),
    ];
    Ok(RecordBatch::try_new(Arc::new(schema.clone()), columns)?)
}

/// Builds the Arrow schema for an observation file: `date`, `target`, then
/// one column per feature (Boolean for binary features).
pub(crate) fn series_schema(series: &Series) -> Schema {
    let mut fields = vec![
        Field::new("date", DataType::Date32, false),
        Field::new("target", DataType::Float64, false),
    ];
    for field in series.schema().fields() {
        let data_type = match field.kind() {
            FeatureKind::Continuous => DataType::Float64,
            FeatureKind::Binary => DataType::Boolean,
        };
        fields.push(Field::new(field.name(), data_type, false));
    }
    Schema::new(fields)
}

/// Converts a series into one [`RecordBatch`] matching [`series_schema`].
pub(crate) fn series_to_record_batch(
    series: &Series,
    schema: &Schema,
) -> Result<RecordBatch, IoError> {
    let dates: Vec<i32> = series.dates().iter().map(|&d| days_from_date(d)).collect();
    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(Date32Array::from(dates)),
        Arc::new(Float64Array::from(series.targets().to_vec())),
    ];
    for field in series.schema().fields() {
        let values = series.frame().column(field.name())?;
        let column: ArrayRef = match field.kind() {
            FeatureKind::Continuous => Arc::new(Float64Array::from(values.to_vec())),
            FeatureKind::Binary => Arc::new(BooleanArray::from(
                values.iter().map(|&v| v != 0.0).collect::<Vec<_>>(),
            )),
        };
        columns.push(column);
    }
    Ok(RecordBatch::try_new(Arc::new(schema.clone()), columns)?)
}

/// Writes a sequence of [`RecordBatch`]es to a Parquet file at `path`.
///
/// # Errors
///
/// Returns [`IoError::Parquet`] if file creation, batch writing, or file
/// finalisation fails.
pub(crate) fn write_batches(
    path: &Path,
    batches: &[RecordBatch],
    schema: &Schema,
    props: WriterProperties,
) -> Result<(), IoError> {
    let file = std::fs::File::create(path).map_err(|e| IoError::Parquet {
        reason: e.to_string(),
    })?;
    let mut writer = ArrowWriter::try_new(file, Arc::new(schema.clone()), Some(props))?;

    for batch in batches {
        writer.write(batch)?;
    }

    writer.close()?;
    Ok(())
}
