//! Tree grower for gradient boosting.
//!
//! Grows one depth-wise tree from gradients using histogram split finding,
//! row partitioning, and the subtraction trick: only the smaller child's
//! histogram is built, the larger one is `parent - smaller`.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::histogram::NodeHistogram;
use super::partition::RowPartitioner;
use super::split::{GainParams, NodeStats, find_best_split};
use crate::data::BinnedDataset;
use crate::repr::gbdt::{MutableTree, NodeId, Tree};
use crate::training::GradsTuple;
use crate::utils::Parallelism;

/// Parameters for tree growth.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GrowerParams {
    /// Gain computation and constraint parameters.
    pub gain: GainParams,
    /// Shrinkage applied to every leaf.
    pub learning_rate: f64,
    /// Maximum number of splits on any root-to-leaf path.
    pub max_depth: u32,
}

impl Default for GrowerParams {
    fn default() -> Self {
        Self {
            gain: GainParams::default(),
            learning_rate: 0.1,
            max_depth: 3,
        }
    }
}

struct NodeCandidate {
    node: NodeId,
    partition: usize,
    depth: u32,
    histogram: NodeHistogram,
    stats: NodeStats,
}

/// Grows single trees; reuses its buffers across boosting rounds.
pub struct TreeGrower {
    params: GrowerParams,
    partitioner: RowPartitioner,
    tree: MutableTree,
    /// `(partition, shrunk leaf value)` of the last grown tree.
    leaves: Vec<(usize, f64)>,
}

impl TreeGrower {
    pub fn new(params: GrowerParams) -> Self {
        Self {
            params,
            partitioner: RowPartitioner::new(),
            tree: MutableTree::new(),
            leaves: Vec::new(),
        }
    }

    pub fn params(&self) -> &GrowerParams {
        &self.params
    }

    /// Grow a tree. Leaves are already scaled by the learning rate.
    pub fn grow(&mut self, dataset: &BinnedDataset, gradients: &[GradsTuple], parallelism: Parallelism) -> Tree {
        let n_rows = dataset.n_rows();
        debug_assert_eq!(gradients.len(), n_rows);

        self.partitioner.reset(n_rows);
        self.leaves.clear();
        let root = self.tree.init_root();

        let root_stats = gradients.iter().fold(NodeStats::default(), |acc, gh| NodeStats {
            grad: acc.grad + gh.grad,
            hess: acc.hess + gh.hess,
            count: acc.count + 1,
        });
        let mut root_hist = NodeHistogram::for_dataset(dataset);
        root_hist.build(dataset, gradients, self.partitioner.rows(0), parallelism);

        let mut queue = VecDeque::new();
        queue.push_back(NodeCandidate {
            node: root,
            partition: 0,
            depth: 0,
            histogram: root_hist,
            stats: root_stats,
        });

        let learning_rate = self.params.learning_rate;
        while let Some(candidate) = queue.pop_front() {
            self.tree.set_cover(candidate.node, candidate.stats.hess);

            let split = if candidate.depth < self.params.max_depth {
                find_best_split(
                    &candidate.histogram,
                    dataset.mappers(),
                    candidate.stats,
                    &self.params.gain,
                    parallelism,
                )
            } else {
                None
            };

            let Some(split) = split else {
                let weight = self
                    .params
                    .gain
                    .compute_leaf_weight(candidate.stats.grad, candidate.stats.hess);
                self.tree.make_leaf(candidate.node, weight);
                self.leaves.push((candidate.partition, weight * learning_rate));
                continue;
            };

            let (left, right) =
                self.tree
                    .apply_numeric_split(candidate.node, split.feature as u32, split.threshold, true);
            self.tree.set_gain(candidate.node, split.gain);

            let (left_part, right_part) =
                self.partitioner
                    .split(candidate.partition, dataset.feature_bins(split.feature), split.bin);

            let small_is_left = split.left.count <= split.right.count;
            let small_part = if small_is_left { left_part } else { right_part };
            let mut small = NodeHistogram::for_dataset(dataset);
            small.build(dataset, gradients, self.partitioner.rows(small_part), parallelism);
            let mut large = candidate.histogram;
            large.subtract(&small);
            let (left_hist, right_hist) = if small_is_left { (small, large) } else { (large, small) };

            let depth = candidate.depth + 1;
            queue.push_back(NodeCandidate {
                node: left,
                partition: left_part,
                depth,
                histogram: left_hist,
                stats: split.left,
            });
            queue.push_back(NodeCandidate {
                node: right,
                partition: right_part,
                depth,
                histogram: right_hist,
                stats: split.right,
            });
        }

        self.tree.apply_learning_rate(learning_rate);
        self.tree.freeze()
    }

    /// Add the last grown tree's output to training predictions.
    pub fn update_predictions(&self, predictions: &mut [f64]) {
        for &(partition, value) in &self.leaves {
            self.partitioner.add_to_predictions(partition, value, predictions);
        }
    }
}
