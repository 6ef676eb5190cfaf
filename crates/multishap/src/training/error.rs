use thiserror::Error;

use crate::data::DataError;
use crate::model::ConfigError;

/// Errors raised before or during training.
#[derive(Debug, Error)]
pub enum TrainError {
    #[error("cannot train on an empty dataset")]
    EmptyDataset,

    #[error("target length {got} does not match {expected} rows")]
    TargetLengthMismatch { expected: usize, got: usize },

    #[error("weight length {got} does not match {expected} rows")]
    WeightLengthMismatch { expected: usize, got: usize },

    #[error("non-finite target at row {row}")]
    NonFiniteTarget { row: usize },

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Data(#[from] DataError),
}
