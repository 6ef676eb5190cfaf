//! Dataset A to CSV.

use std::path::PathBuf;

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::data::{DataError, write_csv};
use crate::datagen::additive_dataset;

/// Where and how much to generate.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[builder(default = 16)]
    pub seed: u64,
    #[builder(default = 10_000)]
    pub n_samples: usize,
    /// Output CSV. The parent directory must exist.
    #[builder(default = PathBuf::from("Multiplicative SHAP/data1.csv"), into)]
    pub output: PathBuf,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// What was written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratorSummary {
    pub output: PathBuf,
    pub n_rows: usize,
    pub columns: Vec<String>,
}

/// Generate Dataset A and write it as CSV, overwriting any existing file.
pub fn run_generator(config: &GeneratorConfig) -> Result<GeneratorSummary, DataError> {
    match std::env::current_dir() {
        Ok(cwd) => tracing::info!(cwd = %cwd.display(), "working directory"),
        Err(err) => tracing::warn!(%err, "working directory unavailable"),
    }

    let frame = additive_dataset(config.seed, config.n_samples)?;
    write_csv(&frame, &config.output)?;
    tracing::info!(
        path = %config.output.display(),
        rows = frame.n_rows(),
        seed = config.seed,
        "dataset written"
    );

    Ok(GeneratorSummary {
        output: config.output.clone(),
        n_rows: frame.n_rows(),
        columns: frame.column_names().to_vec(),
    })
}
