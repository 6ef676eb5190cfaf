//! Conversion between [`Frame`] and Arrow `RecordBatch`es.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, Float64Array, UInt64Array};
use arrow::datatypes::{DataType, Field, Float64Type, Schema};
use arrow::record_batch::RecordBatch;

use crate::data::{DataError, Frame};

/// Name of the row-index column. Empty, like an unnamed pandas index.
pub(super) const INDEX_COLUMN: &str = "";

/// Schema with a leading `UInt64` index column followed by the frame's columns.
pub(super) fn frame_schema(frame: &Frame) -> Arc<Schema> {
    let mut fields = Vec::with_capacity(frame.n_columns() + 1);
    fields.push(Field::new(INDEX_COLUMN, DataType::UInt64, false));
    fields.extend(
        frame
            .column_names()
            .iter()
            .map(|name| Field::new(name, DataType::Float64, false)),
    );
    Arc::new(Schema::new(fields))
}

/// Single batch holding the row index and every column of the frame.
pub(super) fn frame_to_batch(frame: &Frame) -> Result<RecordBatch, DataError> {
    let schema = frame_schema(frame);
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(frame.n_columns() + 1);
    columns.push(Arc::new(UInt64Array::from_iter_values(0..frame.n_rows() as u64)));
    for column in frame.values().columns() {
        columns.push(Arc::new(Float64Array::from_iter_values(column.iter().copied())));
    }
    Ok(RecordBatch::try_new(schema, columns)?)
}

/// Rebuild a frame from batches, dropping the index column at position 0.
pub(super) fn batches_to_frame(schema: &Schema, batches: &[RecordBatch]) -> Result<Frame, DataError> {
    let fields = schema.fields();
    if fields.is_empty() {
        return Err(DataError::Malformed("table has no columns".into()));
    }

    let mut columns: Vec<(String, Vec<f64>)> = fields
        .iter()
        .skip(1)
        .map(|f| (f.name().clone(), Vec::new()))
        .collect();

    for batch in batches {
        for (offset, (name, values)) in columns.iter_mut().enumerate() {
            let array = batch.column(offset + 1);
            let floats = array.as_primitive_opt::<Float64Type>().ok_or_else(|| {
                DataError::UnsupportedType {
                    column: name.clone(),
                    data_type: array.data_type().to_string(),
                }
            })?;
            if floats.null_count() > 0 {
                return Err(DataError::Malformed(format!("column '{name}' contains nulls")));
            }
            values.extend(floats.values().iter().copied());
        }
    }

    Frame::from_columns(columns)
}
