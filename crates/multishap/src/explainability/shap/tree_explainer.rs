//! TreeSHAP explainer for tree ensembles.
//!
//! Implements path-dependent TreeSHAP from Lundberg et al. (2020):
//! "From local explanations to global understanding with explainable AI for trees".
//! Attributions are exact for the model, with the expectation taken over
//! the training distribution recorded in the node covers.

use ndarray::{ArrayView1, ArrayView2};

use super::ShapValues;
use super::path::{PathElement, extend, unwind, unwound_sum};
use crate::explainability::ExplainError;
use crate::repr::gbdt::{Forest, NodeId, Tree, TreeView};
use crate::utils::Parallelism;

/// TreeSHAP explainer for a [`Forest`].
pub struct TreeExplainer<'a> {
    forest: &'a Forest,
    expected_value: f64,
    /// Path buffer length that fits the deepest tree.
    path_capacity: usize,
}

impl<'a> TreeExplainer<'a> {
    /// Create an explainer.
    ///
    /// # Errors
    ///
    /// [`ExplainError::MissingNodeStats`] if any tree lacks covers.
    pub fn new(forest: &'a Forest) -> Result<Self, ExplainError> {
        let mut expected_value = forest.base_score();
        for (tree, t) in forest.trees().enumerate() {
            expected_value += t.mean_leaf_value().ok_or(ExplainError::MissingNodeStats { tree })?;
        }

        let depth = forest.max_depth();
        let path_capacity = (depth + 3) * (depth + 3);
        tracing::debug!(n_trees = forest.n_trees(), depth, expected_value, "tree explainer ready");

        Ok(Self { forest, expected_value, path_capacity })
    }

    /// Mean model output over the training distribution.
    pub fn expected_value(&self) -> f64 {
        self.expected_value
    }

    /// SHAP values for every row of a sample-major `[n_samples, n_features]` matrix.
    ///
    /// # Errors
    ///
    /// [`ExplainError::FeatureMismatch`] if a tree splits on a column the
    /// matrix doesn't have.
    pub fn shap_values(&self, features: ArrayView2<'_, f64>) -> Result<ShapValues, ExplainError> {
        self.shap_values_with(features, Parallelism::Sequential)
    }

    /// [`shap_values`](Self::shap_values), optionally parallel over rows.
    pub fn shap_values_with(
        &self,
        features: ArrayView2<'_, f64>,
        parallelism: Parallelism,
    ) -> Result<ShapValues, ExplainError> {
        let (n_samples, n_features) = features.dim();
        if let Some(needed) = self.required_features()
            && needed > n_features
        {
            return Err(ExplainError::FeatureMismatch { expected: needed, got: n_features });
        }

        let rows: Vec<_> = features.rows().into_iter().collect();
        let phis = parallelism.maybe_par_map(rows, |row| {
            let mut phi = vec![0.0; n_features];
            let mut path = vec![PathElement::default(); self.path_capacity];
            for tree in self.forest.trees() {
                tree_shap(tree, row, &mut phi, &mut path);
            }
            phi
        });

        let mut shap = ShapValues::zeros(n_samples, n_features);
        for (sample, phi) in phis.into_iter().enumerate() {
            let out = shap.sample_mut(sample);
            out[..n_features].copy_from_slice(&phi);
            out[n_features] = self.expected_value;
        }
        Ok(shap)
    }

    /// One past the largest split feature index, if any tree splits.
    fn required_features(&self) -> Option<usize> {
        self.forest
            .trees()
            .flat_map(|tree| {
                (0..tree.n_nodes() as NodeId)
                    .filter(|&n| !tree.is_leaf(n))
                    .map(|n| tree.split_index(n) as usize + 1)
            })
            .max()
    }
}

/// Accumulate one tree's attributions for `row` into `phi`.
fn tree_shap(tree: &Tree, row: ArrayView1<'_, f64>, phi: &mut [f64], path: &mut [PathElement]) {
    // Checked in `TreeExplainer::new`.
    let Some(covers) = tree.covers() else { return };
    let ctx = Ctx { tree, covers, row };
    recurse(&ctx, phi, path, 0, 0, 1.0, 1.0, None, 0);
}

struct Ctx<'t, 'r> {
    tree: &'t Tree,
    covers: &'t [f64],
    row: ArrayView1<'r, f64>,
}

/// Recursive step. The node's path segment starts right after the parent's.
#[allow(clippy::too_many_arguments)]
fn recurse(
    ctx: &Ctx<'_, '_>,
    phi: &mut [f64],
    path: &mut [PathElement],
    parent_start: usize,
    mut unique_depth: usize,
    parent_zero: f64,
    parent_one: f64,
    parent_feature: Option<usize>,
    node: NodeId,
) {
    let start = parent_start + unique_depth + 1;
    path.copy_within(parent_start..parent_start + unique_depth + 1, start);
    let segment = &mut path[start..];
    extend(segment, unique_depth, parent_zero, parent_one, parent_feature);

    let tree = ctx.tree;
    if tree.is_leaf(node) {
        let leaf = tree.leaf_value(node);
        for i in 1..=unique_depth {
            let w = unwound_sum(segment, unique_depth, i);
            let el = segment[i];
            if let Some(f) = el.feature {
                phi[f] += w * (el.one_fraction - el.zero_fraction) * leaf;
            }
        }
        return;
    }

    let feature = tree.split_index(node) as usize;
    let hot = tree.next_node(node, &ctx.row);
    let cold = if hot == tree.left_child(node) { tree.right_child(node) } else { tree.left_child(node) };

    let cover = ctx.covers[node as usize];
    let (hot_zero, cold_zero) = if cover > 0.0 {
        (ctx.covers[hot as usize] / cover, ctx.covers[cold as usize] / cover)
    } else {
        (0.5, 0.5)
    };

    // A feature seen earlier on the path is undone so it is counted once.
    let mut incoming_zero = 1.0;
    let mut incoming_one = 1.0;
    if let Some(k) = (1..=unique_depth).find(|&k| segment[k].feature == Some(feature)) {
        incoming_zero = segment[k].zero_fraction;
        incoming_one = segment[k].one_fraction;
        unwind(segment, unique_depth, k);
        unique_depth -= 1;
    }

    recurse(ctx, phi, path, start, unique_depth + 1, hot_zero * incoming_zero, incoming_one, Some(feature), hot);
    recurse(ctx, phi, path, start, unique_depth + 1, cold_zero * incoming_zero, 0.0, Some(feature), cold);
}
