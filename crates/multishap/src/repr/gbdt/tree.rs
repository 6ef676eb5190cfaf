//! Canonical tree representation (SoA) and read-only tree interface.
//!
//! This module provides:
//! - [`Tree`]: Immutable SoA tree storage for efficient traversal
//! - [`TreeView`]: Read-only trait for unified tree access
//! - [`TreeValidationError`]: Structural validation errors
//!
//! For mutable tree construction during training, see [`super::MutableTree`].

use ndarray::ArrayView1;

use super::NodeId;

// ============================================================================
// SampleAccessor
// ============================================================================

/// Random access to the feature values of one sample.
pub trait SampleAccessor {
    fn feature(&self, index: usize) -> f64;
}

impl SampleAccessor for [f64] {
    #[inline]
    fn feature(&self, index: usize) -> f64 {
        self[index]
    }
}

impl SampleAccessor for &[f64] {
    #[inline]
    fn feature(&self, index: usize) -> f64 {
        self[index]
    }
}

impl SampleAccessor for ArrayView1<'_, f64> {
    #[inline]
    fn feature(&self, index: usize) -> f64 {
        self[index]
    }
}

// ============================================================================
// TreeView Trait
// ============================================================================

/// Read-only view of a tree for traversal.
///
/// Implemented for both [`Tree`] and [`MutableTree`](super::MutableTree), so
/// traversal code works on trees that are still being grown.
pub trait TreeView {
    /// Number of nodes in the tree.
    fn n_nodes(&self) -> usize;

    fn is_leaf(&self, node: NodeId) -> bool;

    /// Feature index for a split node.
    fn split_index(&self, node: NodeId) -> u32;

    /// Threshold for a split node. Samples with `value < threshold` go left.
    fn split_threshold(&self, node: NodeId) -> f64;

    fn left_child(&self, node: NodeId) -> NodeId;

    fn right_child(&self, node: NodeId) -> NodeId;

    /// Direction for missing (NaN) values.
    fn default_left(&self, node: NodeId) -> bool;

    fn leaf_value(&self, node: NodeId) -> f64;

    /// Child a sample takes at a split node.
    #[inline]
    fn next_node<S: SampleAccessor + ?Sized>(&self, node: NodeId, sample: &S) -> NodeId {
        let fvalue = sample.feature(self.split_index(node) as usize);
        let go_left = if fvalue.is_nan() {
            self.default_left(node)
        } else {
            fvalue < self.split_threshold(node)
        };
        if go_left { self.left_child(node) } else { self.right_child(node) }
    }

    /// Traverse the tree to find the leaf node for a sample.
    #[inline]
    fn traverse_to_leaf<S: SampleAccessor + ?Sized>(&self, sample: &S) -> NodeId {
        let mut node = 0;
        while !self.is_leaf(node) {
            node = self.next_node(node, sample);
        }
        node
    }

    /// Length of the longest root-to-leaf path, in edges.
    fn depth(&self) -> usize {
        fn walk<T: TreeView + ?Sized>(tree: &T, node: NodeId) -> usize {
            if tree.is_leaf(node) {
                0
            } else {
                1 + walk(tree, tree.left_child(node)).max(walk(tree, tree.right_child(node)))
            }
        }
        if self.n_nodes() == 0 { 0 } else { walk(self, 0) }
    }
}

// ============================================================================
// TreeValidationError
// ============================================================================

/// Structural validation errors for [`Tree`].
#[derive(Debug, Clone, PartialEq)]
pub enum TreeValidationError {
    /// Tree has no nodes.
    EmptyTree,
    /// A child pointer references an out-of-bounds node.
    ChildOutOfBounds {
        node: NodeId,
        side: &'static str,
        child: NodeId,
        n_nodes: usize,
    },
    /// A node references itself as a child.
    SelfLoop { node: NodeId },
    /// A node was reached by more than one path, or through a cycle.
    DuplicateVisit { node: NodeId },
    /// A node exists in storage but is unreachable from the root.
    UnreachableNode { node: NodeId },
    /// Covers are not usable for attribution: a split's cover differs from
    /// the sum of its children, or a cover is not positive.
    InconsistentCover { node: NodeId, cover: f64, children: f64 },
}

impl std::fmt::Display for TreeValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTree => write!(f, "tree has no nodes"),
            Self::ChildOutOfBounds { node, side, child, n_nodes } => write!(
                f,
                "node {node}: {side} child {child} out of bounds ({n_nodes} nodes)"
            ),
            Self::SelfLoop { node } => write!(f, "node {node} references itself"),
            Self::DuplicateVisit { node } => write!(f, "node {node} reached twice"),
            Self::UnreachableNode { node } => write!(f, "node {node} is unreachable"),
            Self::InconsistentCover { node, cover, children } => write!(
                f,
                "node {node}: cover {cover} inconsistent with children ({children})"
            ),
        }
    }
}

impl std::error::Error for TreeValidationError {}

// ============================================================================
// Tree
// ============================================================================

/// Structure-of-Arrays tree storage for efficient traversal.
///
/// Stores tree nodes in flat arrays for cache-friendly traversal.
/// Child indices are local to this tree (0 = root).
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    split_indices: Box<[u32]>,
    split_thresholds: Box<[f64]>,
    left_children: Box<[u32]>,
    right_children: Box<[u32]>,
    default_left: Box<[bool]>,
    is_leaf: Box<[bool]>,
    leaf_values: Box<[f64]>,
    /// Gain of each split (0 for leaves).
    gains: Option<Box<[f64]>>,
    /// Hessian sum of the training samples reaching each node.
    covers: Option<Box<[f64]>>,
}

impl Tree {
    /// Create a tree from parallel arrays of equal length.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        split_indices: Vec<u32>,
        split_thresholds: Vec<f64>,
        left_children: Vec<u32>,
        right_children: Vec<u32>,
        default_left: Vec<bool>,
        is_leaf: Vec<bool>,
        leaf_values: Vec<f64>,
    ) -> Self {
        let n_nodes = split_indices.len();
        debug_assert_eq!(n_nodes, split_thresholds.len());
        debug_assert_eq!(n_nodes, left_children.len());
        debug_assert_eq!(n_nodes, right_children.len());
        debug_assert_eq!(n_nodes, default_left.len());
        debug_assert_eq!(n_nodes, is_leaf.len());
        debug_assert_eq!(n_nodes, leaf_values.len());

        Self {
            split_indices: split_indices.into_boxed_slice(),
            split_thresholds: split_thresholds.into_boxed_slice(),
            left_children: left_children.into_boxed_slice(),
            right_children: right_children.into_boxed_slice(),
            default_left: default_left.into_boxed_slice(),
            is_leaf: is_leaf.into_boxed_slice(),
            leaf_values: leaf_values.into_boxed_slice(),
            gains: None,
            covers: None,
        }
    }

    /// A single-leaf tree.
    pub fn leaf(value: f64) -> Self {
        Self::new(vec![0], vec![0.0], vec![0], vec![0], vec![false], vec![true], vec![value])
    }

    /// Build a tree from node specifications listed in any order.
    ///
    /// Node ids must cover `0..n` exactly. Used by [`scalar_tree!`](crate::scalar_tree).
    pub fn from_node_specs(mut specs: Vec<NodeSpec>) -> Self {
        specs.sort_by_key(NodeSpec::id);
        let n = specs.len();
        let mut split_indices = vec![0; n];
        let mut thresholds = vec![0.0; n];
        let mut left = vec![0; n];
        let mut right = vec![0; n];
        let mut default_left = vec![false; n];
        let mut is_leaf = vec![false; n];
        let mut values = vec![0.0; n];

        for spec in specs {
            match spec {
                NodeSpec::Split { id, feature, threshold, default_left: dl, left: l, right: r } => {
                    let i = id as usize;
                    split_indices[i] = feature;
                    thresholds[i] = threshold;
                    left[i] = l;
                    right[i] = r;
                    default_left[i] = dl;
                }
                NodeSpec::Leaf { id, value } => {
                    let i = id as usize;
                    is_leaf[i] = true;
                    values[i] = value;
                }
            }
        }

        Self::new(split_indices, thresholds, left, right, default_left, is_leaf, values)
    }

    // =========================================================================
    // Explainability: Gains and Covers
    // =========================================================================

    #[inline]
    pub fn has_gains(&self) -> bool {
        self.gains.is_some()
    }

    #[inline]
    pub fn has_covers(&self) -> bool {
        self.covers.is_some()
    }

    /// Set the gains for this tree (builder pattern).
    pub fn with_gains(mut self, gains: Vec<f64>) -> Self {
        debug_assert_eq!(gains.len(), self.n_nodes());
        self.gains = Some(gains.into_boxed_slice());
        self
    }

    /// Set the covers for this tree (builder pattern).
    pub fn with_covers(mut self, covers: Vec<f64>) -> Self {
        debug_assert_eq!(covers.len(), self.n_nodes());
        self.covers = Some(covers.into_boxed_slice());
        self
    }

    /// Set both gains and covers.
    pub fn with_stats(self, gains: Vec<f64>, covers: Vec<f64>) -> Self {
        self.with_gains(gains).with_covers(covers)
    }

    /// Leaf nodes have gain 0, split nodes the gain of their split.
    pub fn gains(&self) -> Option<&[f64]> {
        self.gains.as_deref()
    }

    /// Cover is the sum of hessians for samples reaching each node.
    pub fn covers(&self) -> Option<&[f64]> {
        self.covers.as_deref()
    }

    /// Cover-weighted mean of the leaf values: the tree's mean output over
    /// its training distribution. `None` without covers.
    pub fn mean_leaf_value(&self) -> Option<f64> {
        let covers = self.covers()?;
        let root = covers[0];
        if root <= 0.0 {
            return Some(0.0);
        }
        let total = (0..self.n_nodes())
            .filter(|&i| self.is_leaf[i])
            .map(|i| covers[i] * self.leaf_values[i])
            .sum::<f64>();
        Some(total / root)
    }

    /// Leaf indices in node order.
    pub fn leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.n_nodes() as NodeId).filter(|&n| self.is_leaf[n as usize])
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Validate structural invariants, and cover consistency if covers are present.
    pub fn validate(&self) -> Result<(), TreeValidationError> {
        let n_nodes = self.n_nodes();
        if n_nodes == 0 {
            return Err(TreeValidationError::EmptyTree);
        }

        let mut visited = vec![false; n_nodes];
        let mut stack: Vec<NodeId> = vec![0];
        while let Some(node) = stack.pop() {
            let idx = node as usize;
            if visited[idx] {
                return Err(TreeValidationError::DuplicateVisit { node });
            }
            visited[idx] = true;

            if self.is_leaf(node) {
                continue;
            }
            for (side, child) in [("left", self.left_child(node)), ("right", self.right_child(node))] {
                if child == node {
                    return Err(TreeValidationError::SelfLoop { node });
                }
                if child as usize >= n_nodes {
                    return Err(TreeValidationError::ChildOutOfBounds { node, side, child, n_nodes });
                }
                stack.push(child);
            }
        }

        if let Some(i) = visited.iter().position(|&v| !v) {
            return Err(TreeValidationError::UnreachableNode { node: i as NodeId });
        }

        if let Some(covers) = self.covers() {
            for node in 0..n_nodes as NodeId {
                let cover = covers[node as usize];
                if self.is_leaf(node) {
                    if cover <= 0.0 {
                        return Err(TreeValidationError::InconsistentCover { node, cover, children: 0.0 });
                    }
                    continue;
                }
                let children = covers[self.left_child(node) as usize] + covers[self.right_child(node) as usize];
                if cover <= 0.0 || (cover - children).abs() > 1e-9 * cover.max(1.0) {
                    return Err(TreeValidationError::InconsistentCover { node, cover, children });
                }
            }
        }

        Ok(())
    }

    // =========================================================================
    // Prediction
    // =========================================================================

    /// Leaf value reached by a single row of features.
    #[inline]
    pub fn predict_row<S: SampleAccessor + ?Sized>(&self, features: &S) -> f64 {
        self.leaf_value(self.traverse_to_leaf(features))
    }
}

impl TreeView for Tree {
    #[inline]
    fn n_nodes(&self) -> usize {
        self.split_indices.len()
    }

    #[inline]
    fn is_leaf(&self, node: NodeId) -> bool {
        self.is_leaf[node as usize]
    }

    #[inline]
    fn split_index(&self, node: NodeId) -> u32 {
        self.split_indices[node as usize]
    }

    #[inline]
    fn split_threshold(&self, node: NodeId) -> f64 {
        self.split_thresholds[node as usize]
    }

    #[inline]
    fn left_child(&self, node: NodeId) -> NodeId {
        self.left_children[node as usize]
    }

    #[inline]
    fn right_child(&self, node: NodeId) -> NodeId {
        self.right_children[node as usize]
    }

    #[inline]
    fn default_left(&self, node: NodeId) -> bool {
        self.default_left[node as usize]
    }

    #[inline]
    fn leaf_value(&self, node: NodeId) -> f64 {
        self.leaf_values[node as usize]
    }
}

// ============================================================================
// NodeSpec + scalar_tree!
// ============================================================================

/// One node of a hand-written tree, see [`scalar_tree!`](crate::scalar_tree).
#[derive(Debug, Clone, PartialEq)]
pub enum NodeSpec {
    Split {
        id: NodeId,
        feature: u32,
        threshold: f64,
        default_left: bool,
        left: NodeId,
        right: NodeId,
    },
    Leaf { id: NodeId, value: f64 },
}

impl NodeSpec {
    pub fn id(&self) -> NodeId {
        match self {
            Self::Split { id, .. } | Self::Leaf { id, .. } => *id,
        }
    }
}

/// Build a [`Tree`] from a compact node listing.
///
/// `num(feature, threshold, L|R)` declares a numeric split whose missing
/// values go left (`L`) or right (`R`), followed by `-> left, right`.
///
/// ```
/// use multishap::repr::gbdt::TreeView;
///
/// let tree = multishap::scalar_tree! {
///     0 => num(0, 0.5, L) -> 1, 2,
///     1 => leaf(-1.0),
///     2 => leaf(1.0),
/// };
/// assert_eq!(tree.n_nodes(), 3);
/// assert_eq!(tree.predict_row(&[0.3][..]), -1.0);
/// ```
#[macro_export]
macro_rules! scalar_tree {
    ($($body:tt)*) => {{
        let mut nodes: ::std::vec::Vec<$crate::repr::gbdt::NodeSpec> = ::std::vec::Vec::new();
        $crate::__scalar_tree_nodes!(nodes; $($body)*);
        $crate::repr::gbdt::Tree::from_node_specs(nodes)
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __scalar_tree_nodes {
    ($nodes:ident;) => {};
    ($nodes:ident; $id:literal => num($feat:expr, $thr:expr, L) -> $left:literal, $right:literal $(, $($rest:tt)*)?) => {
        $nodes.push($crate::repr::gbdt::NodeSpec::Split {
            id: $id, feature: $feat, threshold: $thr, default_left: true, left: $left, right: $right,
        });
        $crate::__scalar_tree_nodes!($nodes; $($($rest)*)?);
    };
    ($nodes:ident; $id:literal => num($feat:expr, $thr:expr, R) -> $left:literal, $right:literal $(, $($rest:tt)*)?) => {
        $nodes.push($crate::repr::gbdt::NodeSpec::Split {
            id: $id, feature: $feat, threshold: $thr, default_left: false, left: $left, right: $right,
        });
        $crate::__scalar_tree_nodes!($nodes; $($($rest)*)?);
    };
    ($nodes:ident; $id:literal => leaf($value:expr) $(, $($rest:tt)*)?) => {
        $nodes.push($crate::repr::gbdt::NodeSpec::Leaf { id: $id, value: $value });
        $crate::__scalar_tree_nodes!($nodes; $($($rest)*)?);
    };
}
