//! The two end-to-end procedures: the synthetic data generator and the
//! multiplicative SHAP probe.

mod decomposition;
mod generator;
mod probe;

pub use decomposition::product_rule_decomposition;
pub use generator::{GeneratorConfig, GeneratorSummary, run_generator};
pub use probe::{
    InspectedRow, KernelSummary, ModelSummary, ProbeConfig, ProbeReport, ProductComparison, run_probe,
};

use thiserror::Error;

use crate::data::DataError;
use crate::explainability::ExplainError;
use crate::training::TrainError;

/// Anything that can stop the probe.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Train(#[from] TrainError),

    #[error(transparent)]
    Explain(#[from] ExplainError),

    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}
