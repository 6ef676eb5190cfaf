//! SHAP (SHapley Additive exPlanations) value computation.

mod kernel_explainer;
mod path;
mod solver;
mod tree_explainer;
mod values;

pub use kernel_explainer::{KernelConfig, KernelExplainer};
pub use tree_explainer::TreeExplainer;
pub use values::ShapValues;
