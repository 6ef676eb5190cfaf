//! Tabular file IO for [`Frame`](crate::data::Frame).
//!
//! CSV is always available; it uses the pandas layout with a leading,
//! unnamed row-index column. Parquet sits behind a feature gate.
//!
//! # Feature gates
//!
//! - `io-parquet`: Parquet reading and writing

mod csv;
mod record_batches;

#[cfg(feature = "io-parquet")]
mod parquet;

pub use csv::{read_csv, write_csv};

#[cfg(feature = "io-parquet")]
pub use parquet::{read_parquet, write_parquet};
