//! Evaluation metrics for model quality.
//!
//! Metrics are separate from losses: a model trained with one loss can be
//! evaluated with any metric. All metrics take optional sample weights and
//! apply `Σ w·err / Σ w` when given.
//!
//! - [`Mse`]: mean squared error
//! - [`Rmse`]: root mean squared error
//! - [`Mae`]: mean absolute error

mod regression;

pub use regression::{Mae, Mse, Rmse};

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// A scalar evaluation metric over predictions and targets.
pub trait MetricFn: Send + Sync {
    fn compute(
        &self,
        predictions: ArrayView1<'_, f64>,
        targets: ArrayView1<'_, f64>,
        weights: Option<ArrayView1<'_, f64>>,
    ) -> f64;

    fn higher_is_better(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str;
}

/// Metric enum for configuration; delegates to the wrapped metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Mse(Mse),
    Rmse(Rmse),
    Mae(Mae),
}

impl Metric {
    pub fn mse() -> Self {
        Self::Mse(Mse)
    }

    pub fn rmse() -> Self {
        Self::Rmse(Rmse)
    }

    pub fn mae() -> Self {
        Self::Mae(Mae)
    }
}

impl Default for Metric {
    fn default() -> Self {
        Self::rmse()
    }
}

impl MetricFn for Metric {
    fn compute(
        &self,
        predictions: ArrayView1<'_, f64>,
        targets: ArrayView1<'_, f64>,
        weights: Option<ArrayView1<'_, f64>>,
    ) -> f64 {
        match self {
            Self::Mse(inner) => inner.compute(predictions, targets, weights),
            Self::Rmse(inner) => inner.compute(predictions, targets, weights),
            Self::Mae(inner) => inner.compute(predictions, targets, weights),
        }
    }

    fn higher_is_better(&self) -> bool {
        match self {
            Self::Mse(inner) => inner.higher_is_better(),
            Self::Rmse(inner) => inner.higher_is_better(),
            Self::Mae(inner) => inner.higher_is_better(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Mse(inner) => inner.name(),
            Self::Rmse(inner) => inner.name(),
            Self::Mae(inner) => inner.name(),
        }
    }
}
