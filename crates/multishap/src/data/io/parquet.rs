//! Parquet reading and writing. Reuses the CSV record-batch layout.

use std::fs::File;
use std::path::Path;

use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::record_batches::{batches_to_frame, frame_to_batch};
use crate::data::{DataError, Frame};

/// Write a frame to Parquet, including the leading row-index column.
pub fn write_parquet(frame: &Frame, path: impl AsRef<Path>) -> Result<(), DataError> {
    let batch = frame_to_batch(frame)?;
    let file = File::create(path.as_ref())?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

/// Read a Parquet file written by [`write_parquet`].
pub fn read_parquet(path: impl AsRef<Path>) -> Result<Frame, DataError> {
    let file = File::open(path.as_ref())?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    let reader = builder.build()?;
    let batches = reader.collect::<Result<Vec<_>, _>>()?;
    batches_to_frame(&schema, &batches)
}
