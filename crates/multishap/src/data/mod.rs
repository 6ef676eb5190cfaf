//! Tabular data: named-column frames, binning and file IO.

pub mod binned;
mod error;
mod frame;
pub mod io;

pub use binned::{BinMapper, BinnedDataset};
pub use error::DataError;
pub use frame::Frame;
pub use io::{read_csv, write_csv};
