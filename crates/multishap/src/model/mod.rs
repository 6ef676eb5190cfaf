//! High-level model API.
//!
//! - [`GBDTModel`]: trained forest plus metadata and the config it was built from
//! - [`GBDTConfig`]: validated training configuration
//! - [`Predict`]: batch prediction seam shared by models and composite functions

pub mod gbdt;
mod meta;
mod predict;

pub use gbdt::{ConfigError, FitReport, GBDTConfig, GBDTModel, RegularizationParams};
pub use meta::ModelMeta;
pub use predict::{FnPredictor, Predict, ProductPredictor};
