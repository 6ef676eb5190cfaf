//! Training infrastructure for gradient boosting.
//!
//! - [`GradsTuple`] / [`Gradients`]: per-sample gradient and hessian
//! - [`ObjectiveFn`] / [`Objective`]: losses that produce gradients
//! - [`MetricFn`] / [`Metric`]: evaluation metrics
//! - [`GBDTTrainer`]: histogram-based tree boosting
//! - [`TrainingLogger`] / [`Verbosity`]: progress reporting over `tracing`

mod error;
pub mod gbdt;
mod gradients;
mod logger;
pub mod metrics;
pub mod objectives;

pub use error::TrainError;
pub use gbdt::{GBDTParams, GBDTTrainer, GainParams};
pub use gradients::{GradsTuple, Gradients};
pub use logger::{TrainingLogger, Verbosity};
pub use metrics::{Mae, Metric, MetricFn, Mse, Rmse};
pub use objectives::{AbsoluteLoss, Objective, ObjectiveFn, SquaredLoss};

use ndarray::ArrayView1;

/// Iterate weights, yielding 1.0 per row when unweighted.
pub(crate) fn weight_iter<'a>(
    weights: Option<ArrayView1<'a, f64>>,
    n_rows: usize,
) -> impl Iterator<Item = f64> + 'a {
    let (weighted, uniform) = match weights {
        Some(w) => (Some(w.into_iter().copied()), None),
        None => (None, Some(std::iter::repeat_n(1.0, n_rows))),
    };
    weighted.into_iter().flatten().chain(uniform.into_iter().flatten())
}
