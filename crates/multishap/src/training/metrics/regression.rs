//! Regression metrics.

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use super::MetricFn;
use crate::training::weight_iter;

/// Weighted mean of `err(pred, target)`. Zero for empty input or zero total weight.
fn weighted_error(
    predictions: ArrayView1<'_, f64>,
    targets: ArrayView1<'_, f64>,
    weights: Option<ArrayView1<'_, f64>>,
    err: impl Fn(f64) -> f64,
) -> f64 {
    let n_rows = predictions.len();
    let (sum, sum_w) = predictions
        .iter()
        .zip(targets.iter())
        .zip(weight_iter(weights, n_rows))
        .fold((0.0, 0.0), |(s, sw), ((&p, &t), w)| (s + w * err(p - t), sw + w));
    if sum_w > 0.0 { sum / sum_w } else { 0.0 }
}

// =============================================================================
// MSE (Mean Squared Error)
// =============================================================================

/// Mean Squared Error: mean((pred - label)²). Lower is better.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Mse;

impl MetricFn for Mse {
    fn compute(
        &self,
        predictions: ArrayView1<'_, f64>,
        targets: ArrayView1<'_, f64>,
        weights: Option<ArrayView1<'_, f64>>,
    ) -> f64 {
        weighted_error(predictions, targets, weights, |d| d * d)
    }

    fn name(&self) -> &'static str {
        "mse"
    }
}

// =============================================================================
// RMSE (Root Mean Squared Error)
// =============================================================================

/// Root Mean Squared Error: sqrt(mean((pred - label)²)). Lower is better.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rmse;

impl MetricFn for Rmse {
    fn compute(
        &self,
        predictions: ArrayView1<'_, f64>,
        targets: ArrayView1<'_, f64>,
        weights: Option<ArrayView1<'_, f64>>,
    ) -> f64 {
        Mse.compute(predictions, targets, weights).sqrt()
    }

    fn name(&self) -> &'static str {
        "rmse"
    }
}

// =============================================================================
// MAE (Mean Absolute Error)
// =============================================================================

/// Mean Absolute Error: mean(|pred - label|). Lower is better.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Mae;

impl MetricFn for Mae {
    fn compute(
        &self,
        predictions: ArrayView1<'_, f64>,
        targets: ArrayView1<'_, f64>,
        weights: Option<ArrayView1<'_, f64>>,
    ) -> f64 {
        weighted_error(predictions, targets, weights, f64::abs)
    }

    fn name(&self) -> &'static str {
        "mae"
    }
}
