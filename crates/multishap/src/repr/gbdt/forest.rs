//! Canonical forest representation (collection of trees).

use ndarray::{Array1, ArrayView2};

use super::tree::{Tree, TreeValidationError, TreeView};
use crate::utils::Parallelism;

/// Structural validation errors for [`Forest`].
#[derive(Debug, Clone, PartialEq)]
pub enum ForestValidationError {
    InvalidTree { tree_idx: usize, error: TreeValidationError },
    NonFiniteBaseScore(f64),
}

impl std::fmt::Display for ForestValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTree { tree_idx, error } => write!(f, "tree {tree_idx}: {error}"),
            Self::NonFiniteBaseScore(v) => write!(f, "base score is not finite: {v}"),
        }
    }
}

impl std::error::Error for ForestValidationError {}

/// Additive ensemble of regression trees over a constant base score.
///
/// `prediction(x) = base_score + Σ tree(x)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Forest {
    trees: Vec<Tree>,
    base_score: f64,
}

impl Default for Forest {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Forest {
    pub fn new(base_score: f64) -> Self {
        Self { trees: Vec::new(), base_score }
    }

    pub fn with_base_score(mut self, base_score: f64) -> Self {
        self.base_score = base_score;
        self
    }

    pub fn push_tree(&mut self, tree: Tree) {
        self.trees.push(tree);
    }

    #[inline]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    #[inline]
    pub fn base_score(&self) -> f64 {
        self.base_score
    }

    #[inline]
    pub fn tree(&self, idx: usize) -> &Tree {
        &self.trees[idx]
    }

    pub fn trees(&self) -> impl Iterator<Item = &Tree> {
        self.trees.iter()
    }

    /// Deepest tree, in edges.
    pub fn max_depth(&self) -> usize {
        self.trees.iter().map(TreeView::depth).max().unwrap_or(0)
    }

    /// Validate every tree.
    pub fn validate(&self) -> Result<(), ForestValidationError> {
        if !self.base_score.is_finite() {
            return Err(ForestValidationError::NonFiniteBaseScore(self.base_score));
        }
        for (tree_idx, tree) in self.trees.iter().enumerate() {
            tree.validate()
                .map_err(|error| ForestValidationError::InvalidTree { tree_idx, error })?;
        }
        Ok(())
    }

    // =========================================================================
    // Prediction
    // =========================================================================

    /// Predict a single row of features.
    pub fn predict_row(&self, features: &[f64]) -> f64 {
        self.base_score + self.trees.iter().map(|t| t.predict_row(features)).sum::<f64>()
    }

    /// Predict every row of a sample-major `[n_samples, n_features]` matrix.
    pub fn predict(&self, features: ArrayView2<'_, f64>, parallelism: Parallelism) -> Array1<f64> {
        let rows: Vec<_> = features.rows().into_iter().collect();
        let predictions = parallelism.maybe_par_map(rows, |row| {
            self.base_score + self.trees.iter().map(|t| t.predict_row(&row)).sum::<f64>()
        });
        Array1::from(predictions)
    }
}
