//! Objective (loss) functions for gradient boosting.
//!
//! Objectives turn current predictions into per-sample gradients and
//! hessians, and supply the constant base score the ensemble starts from.
//!
//! # Weighted Training
//!
//! Pass `None` for `weights` for unweighted computation. When `Some`, the
//! view must have one weight per row.
//!
//! # Available Objectives
//!
//! - [`SquaredLoss`]: squared error, mean base score
//! - [`AbsoluteLoss`]: absolute error, median base score

mod regression;

pub use regression::{AbsoluteLoss, SquaredLoss};

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::training::GradsTuple;

// =============================================================================
// Objective Trait
// =============================================================================

/// An objective (loss) function for training gradient boosted models.
pub trait ObjectiveFn: Send + Sync {
    /// Write `(grad, hess)` for every row into `grad_hess`.
    fn compute_gradients_into(
        &self,
        predictions: ArrayView1<'_, f64>,
        targets: ArrayView1<'_, f64>,
        weights: Option<ArrayView1<'_, f64>>,
        grad_hess: &mut [GradsTuple],
    );

    /// Optimal constant prediction before any trees are added.
    fn compute_base_score(&self, targets: ArrayView1<'_, f64>, weights: Option<ArrayView1<'_, f64>>) -> f64;

    /// Name of the objective (for logging).
    fn name(&self) -> &'static str;
}

// =============================================================================
// Objective Enum
// =============================================================================

/// Objective function enum for configuration.
///
/// Implements [`ObjectiveFn`] by delegating to the wrapped loss.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    /// Squared error loss (L2) for regression.
    SquaredLoss(SquaredLoss),
    /// Absolute error loss (L1) for robust regression.
    AbsoluteLoss(AbsoluteLoss),
}

impl Objective {
    pub fn squared() -> Self {
        Self::SquaredLoss(SquaredLoss)
    }

    pub fn absolute() -> Self {
        Self::AbsoluteLoss(AbsoluteLoss)
    }
}

impl Default for Objective {
    fn default() -> Self {
        Self::squared()
    }
}

impl ObjectiveFn for Objective {
    fn compute_gradients_into(
        &self,
        predictions: ArrayView1<'_, f64>,
        targets: ArrayView1<'_, f64>,
        weights: Option<ArrayView1<'_, f64>>,
        grad_hess: &mut [GradsTuple],
    ) {
        match self {
            Self::SquaredLoss(inner) => inner.compute_gradients_into(predictions, targets, weights, grad_hess),
            Self::AbsoluteLoss(inner) => inner.compute_gradients_into(predictions, targets, weights, grad_hess),
        }
    }

    fn compute_base_score(&self, targets: ArrayView1<'_, f64>, weights: Option<ArrayView1<'_, f64>>) -> f64 {
        match self {
            Self::SquaredLoss(inner) => inner.compute_base_score(targets, weights),
            Self::AbsoluteLoss(inner) => inner.compute_base_score(targets, weights),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::SquaredLoss(inner) => inner.name(),
            Self::AbsoluteLoss(inner) => inner.name(),
        }
    }
}
