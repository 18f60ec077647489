//! Low-level Parquet reading and column extraction.

use std::path::Path;

use arrow::array::{Array, AsArray, RecordBatch};
use arrow::datatypes::{DataType, Date32Type, Float64Type, SchemaRef};
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::IoError;

/// Days from 0001-01-01 (CE day 1) to 1970-01-01.
const UNIX_EPOCH_FROM_CE: i32 = 719_163;

/// Converts a Date32 value (days since the Unix epoch) to a date.
pub(crate) fn date_from_days(days: i32) -> Result<NaiveDate, IoError> {
    days.checked_add(UNIX_EPOCH_FROM_CE)
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .ok_or(IoError::InvalidDate { days })
}

/// Converts a date to a Date32 value.
pub(crate) fn days_from_date(date: NaiveDate) -> i32 {
    chrono::Datelike::num_days_from_ce(&date) - UNIX_EPOCH_FROM_CE
}

/// Reads the schema and all record batches from a Parquet file.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if the file does not exist, or
/// [`IoError::Parquet`] if the file cannot be opened or read.
pub(crate) fn read_batches(path: &Path) -> Result<(SchemaRef, Vec<RecordBatch>), IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = std::fs::File::open(path).map_err(|e| IoError::Parquet {
        reason: e.to_string(),
    })?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    let reader = builder.build()?;

    let batches: Vec<RecordBatch> = reader.collect::<Result<Vec<_>, _>>()?;
    Ok((schema, batches))
}

/// Position of `name` in `schema`, or [`IoError::MissingColumn`].
pub(crate) fn column_index(schema: &SchemaRef, name: &str, path: &Path) -> Result<usize, IoError> {
    schema.index_of(name).map_err(|_| IoError::MissingColumn {
        name: name.to_string(),
        path: path.to_path_buf(),
    })
}

/// Extracts a non-null Date32 column.
pub(crate) fn date_column(
    schema: &SchemaRef,
    batches: &[RecordBatch],
    index: usize,
) -> Result<Vec<NaiveDate>, IoError> {
    let field = schema.field(index);
    if field.data_type() != &DataType::Date32 {
        return Err(unsupported(field.name(), field.data_type(), "Date32"));
    }
    let mut out = Vec::new();
    for batch in batches {
        let col = batch.column(index).as_primitive::<Date32Type>();
        for row in 0..col.len() {
            if col.is_null(row) {
                return Err(IoError::NullValue {
                    column: field.name().clone(),
                    row: out.len(),
                });
            }
            out.push(date_from_days(col.value(row))?);
        }
    }
    Ok(out)
}

/// Extracts a non-null Float64 column, or a Boolean column as 0/1.
pub(crate) fn value_column(
    schema: &SchemaRef,
    batches: &[RecordBatch],
    index: usize,
) -> Result<Vec<f64>, IoError> {
    let field = schema.field(index);
    let boolean = match field.data_type() {
        DataType::Float64 => false,
        DataType::Boolean => true,
        other => return Err(unsupported(field.name(), other, "Float64 or Boolean")),
    };
    let mut out = Vec::new();
    for batch in batches {
        let array = batch.column(index);
        for row in 0..array.len() {
            if array.is_null(row) {
                return Err(IoError::NullValue {
                    column: field.name().clone(),
                    row: out.len(),
                });
            }
            let value = if boolean {
                if array.as_boolean().value(row) { 1.0 } else { 0.0 }
            } else {
                array.as_primitive::<Float64Type>().value(row)
            };
            out.push(value);
        }
    }
    Ok(out)
}

fn unsupported(name: &str, data_type: &DataType, expected: &'static str) -> IoError {
    IoError::UnsupportedType {
        name: name.to_string(),
        data_type: data_type.to_string(),
        expected,
    }
}
