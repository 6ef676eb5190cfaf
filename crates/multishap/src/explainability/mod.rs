//! Explainability: SHAP attributions for trained models.
//!
//! - [`TreeExplainer`]: exact path-dependent TreeSHAP for a [`Forest`](crate::repr::gbdt::Forest)
//! - [`KernelExplainer`]: model-agnostic Kernel SHAP for any [`Predict`](crate::model::Predict)
//! - [`ShapValues`]: per-sample attributions with the base value in the last slot

mod error;
pub mod shap;

pub use error::ExplainError;
pub use shap::{KernelConfig, KernelExplainer, ShapValues, TreeExplainer};
