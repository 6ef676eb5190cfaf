//! GBDT model: configuration, parameter groups and the trained model.

mod config;
mod model;
mod params;

pub use config::{ConfigError, GBDTConfig};
pub use model::{FitReport, GBDTModel};
pub use params::RegularizationParams;
