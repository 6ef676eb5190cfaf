//! CSV reading and writing over Arrow's CSV codec.

use std::fs::File;
use std::io::Seek;
use std::path::Path;
use std::sync::Arc;

use arrow::csv::reader::Format;
use arrow::csv::{ReaderBuilder, WriterBuilder};
use arrow::datatypes::{DataType, Field, Schema};

use super::record_batches::{INDEX_COLUMN, batches_to_frame, frame_to_batch};
use crate::data::{DataError, Frame};

/// Write a frame as CSV with a leading unnamed row-index column.
///
/// The header for columns `x1, x2` reads `,x1,x2`. An existing file is
/// overwritten. The parent directory is not created: a missing directory
/// surfaces as [`DataError::Io`].
pub fn write_csv(frame: &Frame, path: impl AsRef<Path>) -> Result<(), DataError> {
    let path = path.as_ref();
    let batch = frame_to_batch(frame)?;
    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().with_header(true).build(file);
    writer.write(&batch)?;
    tracing::debug!(path = %path.display(), rows = frame.n_rows(), "wrote csv");
    Ok(())
}

/// Read a CSV written by [`write_csv`] (or pandas `to_csv` with default index).
///
/// The first column is treated as the row index and dropped. All remaining
/// columns must parse as `f64`.
pub fn read_csv(path: impl AsRef<Path>) -> Result<Frame, DataError> {
    let mut file = File::open(path.as_ref())?;
    let (header, _) = Format::default().with_header(true).infer_schema(&mut file, Some(0))?;
    if header.fields().is_empty() {
        return Err(DataError::Malformed("missing header row".into()));
    }
    file.rewind()?;

    let mut fields = Vec::with_capacity(header.fields().len());
    fields.push(Field::new(INDEX_COLUMN, DataType::Float64, false));
    fields.extend(
        header
            .fields()
            .iter()
            .skip(1)
            .map(|field| Field::new(field.name(), DataType::Float64, false)),
    );
    let schema = Arc::new(Schema::new(fields));

    let reader = ReaderBuilder::new(schema.clone()).with_header(true).build(file)?;
    let batches = reader.collect::<Result<Vec<_>, _>>()?;

    batches_to_frame(&schema, &batches)
}
