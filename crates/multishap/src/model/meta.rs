//! Model metadata.

use serde::{Deserialize, Serialize};

/// Introspection data about a trained model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelMeta {
    /// Feature names (optional).
    pub feature_names: Option<Vec<String>>,
    /// Number of features the model was trained on.
    pub n_features: usize,
    /// Constant the forest starts from.
    pub base_score: f64,
    pub n_trees: usize,
}
