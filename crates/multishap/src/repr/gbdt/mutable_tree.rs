//! Mutable tree used while growing.

use super::tree::{Tree, TreeView};
use super::NodeId;

#[derive(Clone, Debug, Default)]
struct MutableNode {
    is_leaf: bool,
    feature: u32,
    threshold: f64,
    default_left: bool,
    left: NodeId,
    right: NodeId,
    value: f64,
    gain: f64,
    cover: f64,
}

/// Tree under construction.
///
/// Nodes are allocated as placeholders and later turned into splits or
/// leaves. Covers and gains are recorded per node and carried into the
/// frozen [`Tree`].
#[derive(Clone, Debug, Default)]
pub struct MutableTree {
    nodes: Vec<MutableNode>,
}

impl MutableTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset and allocate the root placeholder. Returns the root id (always 0).
    pub fn init_root(&mut self) -> NodeId {
        self.nodes.clear();
        self.nodes.push(MutableNode::default());
        0
    }

    /// Turn `node` into a numeric split and allocate its two children.
    ///
    /// Returns `(left_id, right_id)`.
    pub fn apply_numeric_split(
        &mut self,
        node: NodeId,
        feature: u32,
        threshold: f64,
        default_left: bool,
    ) -> (NodeId, NodeId) {
        let left = self.nodes.len() as NodeId;
        let right = left + 1;
        self.nodes.push(MutableNode::default());
        self.nodes.push(MutableNode::default());

        let n = &mut self.nodes[node as usize];
        n.is_leaf = false;
        n.feature = feature;
        n.threshold = threshold;
        n.default_left = default_left;
        n.left = left;
        n.right = right;

        (left, right)
    }

    pub fn make_leaf(&mut self, node: NodeId, value: f64) {
        let n = &mut self.nodes[node as usize];
        n.is_leaf = true;
        n.value = value;
        n.gain = 0.0;
    }

    pub fn set_cover(&mut self, node: NodeId, cover: f64) {
        self.nodes[node as usize].cover = cover;
    }

    pub fn set_gain(&mut self, node: NodeId, gain: f64) {
        self.nodes[node as usize].gain = gain;
    }

    /// Multiply every leaf value by `learning_rate`.
    pub fn apply_learning_rate(&mut self, learning_rate: f64) {
        for node in self.nodes.iter_mut().filter(|n| n.is_leaf) {
            node.value *= learning_rate;
        }
    }

    /// Freeze into an immutable [`Tree`] with gains and covers attached.
    pub fn freeze(&self) -> Tree {
        let n = self.nodes.len();
        let mut split_indices = Vec::with_capacity(n);
        let mut thresholds = Vec::with_capacity(n);
        let mut left = Vec::with_capacity(n);
        let mut right = Vec::with_capacity(n);
        let mut default_left = Vec::with_capacity(n);
        let mut is_leaf = Vec::with_capacity(n);
        let mut values = Vec::with_capacity(n);
        let mut gains = Vec::with_capacity(n);
        let mut covers = Vec::with_capacity(n);

        for node in &self.nodes {
            split_indices.push(node.feature);
            thresholds.push(node.threshold);
            left.push(node.left);
            right.push(node.right);
            default_left.push(node.default_left);
            is_leaf.push(node.is_leaf);
            values.push(node.value);
            gains.push(node.gain);
            covers.push(node.cover);
        }

        Tree::new(split_indices, thresholds, left, right, default_left, is_leaf, values)
            .with_stats(gains, covers)
    }
}

impl TreeView for MutableTree {
    fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    fn is_leaf(&self, node: NodeId) -> bool {
        self.nodes[node as usize].is_leaf
    }

    fn split_index(&self, node: NodeId) -> u32 {
        self.nodes[node as usize].feature
    }

    fn split_threshold(&self, node: NodeId) -> f64 {
        self.nodes[node as usize].threshold
    }

    fn left_child(&self, node: NodeId) -> NodeId {
        self.nodes[node as usize].left
    }

    fn right_child(&self, node: NodeId) -> NodeId {
        self.nodes[node as usize].right
    }

    fn default_left(&self, node: NodeId) -> bool {
        self.nodes[node as usize].default_left
    }

    fn leaf_value(&self, node: NodeId) -> f64 {
        self.nodes[node as usize].value
    }
}
