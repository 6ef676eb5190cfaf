//! Gain computation, regularization parameters and split search.

use serde::{Deserialize, Serialize};

use super::histogram::{HistogramBin, NodeHistogram};
use crate::data::BinMapper;
use crate::utils::Parallelism;

/// Smallest loss reduction accepted as a split.
const MIN_SPLIT_GAIN: f64 = 1e-6;

// =============================================================================
// Gain Parameters
// =============================================================================

/// Parameters for split gain computation and leaf weight calculation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GainParams {
    /// L2 regularization (lambda).
    pub reg_lambda: f64,
    /// L1 regularization (alpha).
    pub reg_alpha: f64,
    /// Minimum split gain (gamma).
    pub min_gain: f64,
    /// Minimum sum of hessians per child.
    pub min_child_weight: f64,
    /// Minimum samples per child.
    pub min_samples_leaf: u32,
}

impl Default for GainParams {
    fn default() -> Self {
        Self {
            reg_lambda: 0.0,
            reg_alpha: 0.0,
            min_gain: 0.0,
            min_child_weight: 0.0,
            min_samples_leaf: 1,
        }
    }
}

impl GainParams {
    /// Compute the split gain using XGBoost formula.
    ///
    /// ```text
    /// gain = 0.5 * [G_L²/(H_L + λ) + G_R²/(H_R + λ) - G_P²/(H_P + λ)] - γ
    /// ```
    #[inline]
    pub fn compute_gain(&self, left: NodeStats, right: NodeStats, parent: NodeStats) -> f64 {
        0.5 * (self.score(left) + self.score(right) - self.score(parent)) - self.min_gain
    }

    #[inline]
    fn score(&self, stats: NodeStats) -> f64 {
        let denom = stats.hess + self.reg_lambda;
        if denom <= 0.0 {
            return 0.0;
        }
        let g = self.soft_threshold(stats.grad);
        g * g / denom
    }

    #[inline]
    fn soft_threshold(&self, grad: f64) -> f64 {
        if self.reg_alpha == 0.0 {
            grad
        } else if grad > self.reg_alpha {
            grad - self.reg_alpha
        } else if grad < -self.reg_alpha {
            grad + self.reg_alpha
        } else {
            0.0
        }
    }

    /// Check if a split satisfies minimum constraints.
    #[inline]
    pub fn is_valid_split(&self, left: NodeStats, right: NodeStats) -> bool {
        left.hess >= self.min_child_weight
            && right.hess >= self.min_child_weight
            && left.count >= self.min_samples_leaf
            && right.count >= self.min_samples_leaf
    }

    /// Leaf weight with L1 and L2 regularization.
    ///
    /// ```text
    /// weight = -sign(G) × max(0, |G| - α) / (H + λ)
    /// ```
    #[inline]
    pub fn compute_leaf_weight(&self, grad_sum: f64, hess_sum: f64) -> f64 {
        let denom = hess_sum + self.reg_lambda;
        if denom <= 0.0 {
            return 0.0;
        }
        -self.soft_threshold(grad_sum) / denom
    }
}

// =============================================================================
// Split search
// =============================================================================

/// Gradient statistics of the samples in a node.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodeStats {
    pub grad: f64,
    pub hess: f64,
    pub count: u32,
}

impl NodeStats {
    #[inline]
    fn add_bin(&mut self, bin: &HistogramBin) {
        self.grad += bin.grad;
        self.hess += bin.hess;
        self.count += bin.count;
    }

    #[inline]
    fn minus(self, other: NodeStats) -> NodeStats {
        NodeStats {
            grad: self.grad - other.grad,
            hess: self.hess - other.hess,
            count: self.count - other.count,
        }
    }
}

/// Best numeric split of a node.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitInfo {
    pub feature: usize,
    /// Bins `0..=bin` go left.
    pub bin: u16,
    /// Raw-value threshold: `value < threshold` goes left.
    pub threshold: f64,
    pub gain: f64,
    pub left: NodeStats,
    pub right: NodeStats,
}

/// Scan every feature's histogram for the split with the largest gain.
///
/// Ties keep the lowest feature, then the lowest bin, so results do not
/// depend on `parallelism`.
pub fn find_best_split(
    histogram: &NodeHistogram,
    mappers: &[BinMapper],
    parent: NodeStats,
    params: &GainParams,
    parallelism: Parallelism,
) -> Option<SplitInfo> {
    let per_feature = parallelism.maybe_par_map(0..mappers.len(), |feature| {
        best_split_for_feature(histogram.feature(feature), &mappers[feature], feature, parent, params)
    });

    per_feature.into_iter().flatten().fold(None, |best: Option<SplitInfo>, candidate| match best {
        Some(b) if b.gain >= candidate.gain => Some(b),
        _ => Some(candidate),
    })
}

fn best_split_for_feature(
    bins: &[HistogramBin],
    mapper: &BinMapper,
    feature: usize,
    parent: NodeStats,
    params: &GainParams,
) -> Option<SplitInfo> {
    let mut best: Option<SplitInfo> = None;
    let mut left = NodeStats::default();

    for (bin, hist_bin) in bins.iter().enumerate().take(bins.len().saturating_sub(1)) {
        left.add_bin(hist_bin);
        let right = parent.minus(left);
        if left.count == 0 || right.count == 0 || !params.is_valid_split(left, right) {
            continue;
        }

        let gain = params.compute_gain(left, right, parent);
        if gain <= MIN_SPLIT_GAIN || best.as_ref().is_some_and(|b| gain <= b.gain) {
            continue;
        }
        let Some(threshold) = mapper.threshold(bin) else {
            continue;
        };
        best = Some(SplitInfo {
            feature,
            bin: bin as u16,
            threshold,
            gain,
            left,
            right,
        });
    }

    best
}
