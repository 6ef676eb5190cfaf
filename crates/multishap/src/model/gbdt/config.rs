//! High-level GBDT configuration with builder pattern.
//!
//! [`GBDTConfig`] is built with `bon` and validated when the builder
//! finishes, so a config that exists is a config that can train.
//!
//! ```
//! use multishap::model::{GBDTConfig, RegularizationParams};
//! use multishap::training::Objective;
//!
//! let config = GBDTConfig::builder()
//!     .objective(Objective::squared())
//!     .n_trees(200)
//!     .regularization(RegularizationParams { min_samples_leaf: 2, ..Default::default() })
//!     .build()
//!     .unwrap();
//! assert_eq!(config.max_depth, 3);
//! ```

use std::num::NonZeroUsize;

use bon::Builder;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::RegularizationParams;
use crate::data::binned::MAX_BINS_LIMIT;
use crate::training::{GBDTParams, Metric, Objective, Verbosity};

// =============================================================================
// ConfigError
// =============================================================================

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("learning_rate must be positive, got {0}")]
    InvalidLearningRate(f64),

    #[error("n_trees must be at least 1")]
    InvalidNTrees,

    #[error("max_depth must be at least 1")]
    InvalidMaxDepth,

    #[error("min_samples_leaf must be at least 1")]
    InvalidMinSamplesLeaf,

    #[error("{field} must be non-negative, got {value}")]
    InvalidRegularization { field: &'static str, value: f64 },

    #[error("max_bins must be in 2..={max}, got {got}")]
    InvalidMaxBins { got: usize, max: usize },
}

// =============================================================================
// GBDTConfig
// =============================================================================

/// Configuration for GBDT training.
///
/// Defaults mirror a classic gradient boosting regressor: squared loss,
/// 100 trees, learning rate 0.1, depth 3 and no L2 shrinkage.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(derive(Clone, Debug), finish_fn(vis = "", name = __build_internal))]
pub struct GBDTConfig {
    /// Loss function. Default: squared loss.
    #[builder(default)]
    pub objective: Objective,

    /// Metric logged per round at `Debug` verbosity. Default: RMSE.
    pub metric: Option<Metric>,

    /// Number of boosting rounds. Default: 100.
    #[builder(default = 100)]
    pub n_trees: u32,

    /// Shrinkage. Default: 0.1.
    #[builder(default = 0.1)]
    pub learning_rate: f64,

    /// Maximum tree depth. Default: 3.
    #[builder(default = 3)]
    pub max_depth: u32,

    #[builder(default)]
    pub regularization: RegularizationParams,

    /// Quantile bins per feature. Default: 256.
    #[builder(default = 256)]
    pub max_bins: usize,

    /// Number of threads. `None` uses all available cores.
    pub n_threads: Option<NonZeroUsize>,

    #[builder(default)]
    pub verbosity: Verbosity,
}

impl<S: g_b_d_t_config_builder::IsComplete> GBDTConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] for a non-positive learning rate, zero trees or depth,
    /// zero `min_samples_leaf`, negative regularization, or `max_bins`
    /// outside `2..=65536`.
    pub fn build(self) -> Result<GBDTConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl GBDTConfig {
    /// Validate the configuration. Deserialized configs skip the builder,
    /// so training re-runs this.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.learning_rate > 0.0) || !self.learning_rate.is_finite() {
            return Err(ConfigError::InvalidLearningRate(self.learning_rate));
        }
        if self.n_trees == 0 {
            return Err(ConfigError::InvalidNTrees);
        }
        if self.max_depth == 0 {
            return Err(ConfigError::InvalidMaxDepth);
        }
        if !(2..=MAX_BINS_LIMIT).contains(&self.max_bins) {
            return Err(ConfigError::InvalidMaxBins { got: self.max_bins, max: MAX_BINS_LIMIT });
        }
        self.regularization.validate()
    }

    /// Thread count in [`run_with_threads`](crate::run_with_threads) terms (0 = auto).
    pub fn thread_count(&self) -> usize {
        self.n_threads.map_or(0, NonZeroUsize::get)
    }

    pub(crate) fn to_trainer_params(&self) -> GBDTParams {
        GBDTParams {
            n_trees: self.n_trees,
            learning_rate: self.learning_rate,
            max_depth: self.max_depth,
            gain: self.regularization.to_gain_params(),
            verbosity: self.verbosity,
        }
    }
}

impl Default for GBDTConfig {
    fn default() -> Self {
        Self {
            objective: Objective::default(),
            metric: None,
            n_trees: 100,
            learning_rate: 0.1,
            max_depth: 3,
            regularization: RegularizationParams::default(),
            max_bins: 256,
            n_threads: None,
            verbosity: Verbosity::default(),
        }
    }
}
