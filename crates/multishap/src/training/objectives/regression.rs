//! Regression objectives.

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use super::ObjectiveFn;
use crate::training::{GradsTuple, weight_iter};
use crate::utils::{weighted_mean, weighted_quantile};

// =============================================================================
// Squared Loss (L2)
// =============================================================================

/// Squared error `½(pred - y)²`: gradient `pred - y`, hessian 1.
///
/// With unit hessians the hessian sum of a node is its sample count, which
/// is what TreeSHAP uses as cover.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SquaredLoss;

impl ObjectiveFn for SquaredLoss {
    fn compute_gradients_into(
        &self,
        predictions: ArrayView1<'_, f64>,
        targets: ArrayView1<'_, f64>,
        weights: Option<ArrayView1<'_, f64>>,
        grad_hess: &mut [GradsTuple],
    ) {
        let n_rows = predictions.len();
        for (gh, ((&pred, &target), w)) in grad_hess
            .iter_mut()
            .zip(predictions.iter().zip(targets.iter()).zip(weight_iter(weights, n_rows)))
        {
            gh.grad = w * (pred - target);
            gh.hess = w;
        }
    }

    fn compute_base_score(&self, targets: ArrayView1<'_, f64>, weights: Option<ArrayView1<'_, f64>>) -> f64 {
        let targets = targets.to_vec();
        let weights = weights.map(|w| w.to_vec());
        let base = weighted_mean(&targets, weights.as_deref());
        if base.is_finite() { base } else { 0.0 }
    }

    fn name(&self) -> &'static str {
        "squared"
    }
}

// =============================================================================
// Absolute Loss (L1)
// =============================================================================

/// Absolute error `|pred - y|`: gradient `sign(pred - y)`, hessian 1.
///
/// Leaves take the Newton step on sign gradients. The base score is the
/// weighted median.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AbsoluteLoss;

impl ObjectiveFn for AbsoluteLoss {
    fn compute_gradients_into(
        &self,
        predictions: ArrayView1<'_, f64>,
        targets: ArrayView1<'_, f64>,
        weights: Option<ArrayView1<'_, f64>>,
        grad_hess: &mut [GradsTuple],
    ) {
        let n_rows = predictions.len();
        for (gh, ((&pred, &target), w)) in grad_hess
            .iter_mut()
            .zip(predictions.iter().zip(targets.iter()).zip(weight_iter(weights, n_rows)))
        {
            let diff = pred - target;
            let sign = if diff > 0.0 {
                1.0
            } else if diff < 0.0 {
                -1.0
            } else {
                0.0
            };
            gh.grad = w * sign;
            gh.hess = w;
        }
    }

    fn compute_base_score(&self, targets: ArrayView1<'_, f64>, weights: Option<ArrayView1<'_, f64>>) -> f64 {
        let targets = targets.to_vec();
        let weights = weights.map(|w| w.to_vec());
        let base = weighted_quantile(&targets, weights.as_deref(), 0.5);
        if base.is_finite() { base } else { 0.0 }
    }

    fn name(&self) -> &'static str {
        "absolute"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn squared_gradients() {
        let preds = array![1.0, 2.0, 3.0];
        let targets = array![0.5, 2.0, 4.0];
        let mut gh = vec![GradsTuple::default(); 3];
        SquaredLoss.compute_gradients_into(preds.view(), targets.view(), None, &mut gh);
        assert_eq!(gh[0], GradsTuple { grad: 0.5, hess: 1.0 });
        assert_eq!(gh[1], GradsTuple { grad: 0.0, hess: 1.0 });
        assert_eq!(gh[2], GradsTuple { grad: -1.0, hess: 1.0 });
    }

    #[test]
    fn squared_weighted_gradients() {
        let preds = array![1.0, 1.0];
        let targets = array![0.0, 0.0];
        let weights = array![2.0, 0.5];
        let mut gh = vec![GradsTuple::default(); 2];
        SquaredLoss.compute_gradients_into(preds.view(), targets.view(), Some(weights.view()), &mut gh);
        assert_eq!(gh[0], GradsTuple { grad: 2.0, hess: 2.0 });
        assert_eq!(gh[1], GradsTuple { grad: 0.5, hess: 0.5 });
    }

    #[test]
    fn squared_base_score_is_mean() {
        let targets = array![1.0, 2.0, 6.0];
        assert_abs_diff_eq!(SquaredLoss.compute_base_score(targets.view(), None), 3.0);
        let weights = array![0.0, 1.0, 1.0];
        assert_abs_diff_eq!(SquaredLoss.compute_base_score(targets.view(), Some(weights.view())), 4.0);
    }

    #[test]
    fn empty_targets_give_zero_base_score() {
        let targets = ndarray::Array1::<f64>::zeros(0);
        assert_eq!(SquaredLoss.compute_base_score(targets.view(), None), 0.0);
        assert_eq!(AbsoluteLoss.compute_base_score(targets.view(), None), 0.0);
    }

    #[test]
    fn absolute_gradients_are_signs() {
        let preds = array![1.0, 2.0, 3.0];
        let targets = array![2.0, 2.0, 1.0];
        let mut gh = vec![GradsTuple::default(); 3];
        AbsoluteLoss.compute_gradients_into(preds.view(), targets.view(), None, &mut gh);
        let grads: Vec<f64> = gh.iter().map(|g| g.grad).collect();
        assert_eq!(grads, vec![-1.0, 0.0, 1.0]);
    }

    #[test]
    fn absolute_base_score_is_median() {
        let targets = array![10.0, 1.0, 3.0, 2.0, 100.0];
        assert_abs_diff_eq!(AbsoluteLoss.compute_base_score(targets.view(), None), 3.0);
    }
}
