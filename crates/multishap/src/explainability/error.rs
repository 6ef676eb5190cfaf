use thiserror::Error;

/// Errors raised while building an explainer or computing attributions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExplainError {
    #[error("tree {tree} has no cover statistics; TreeSHAP needs them")]
    MissingNodeStats { tree: usize },

    #[error("expected {expected} features, got {got}")]
    FeatureMismatch { expected: usize, got: usize },

    #[error("background set is empty")]
    EmptyBackground,

    #[error("weighted least squares system is singular for record {record}")]
    SingularSystem { record: usize },

    #[error("attribution shapes differ: {expected:?} vs {got:?}")]
    ShapeMismatch { expected: (usize, usize), got: (usize, usize) },

    #[error("expected {expected} predictions, got {got}")]
    PredictionLength { expected: usize, got: usize },
}
