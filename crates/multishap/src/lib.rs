//! multishap: gradient boosted regression trees and SHAP attributions.
//!
//! The crate is organised bottom-up:
//!
//! - [`data`]: named-column frames, quantile binning, CSV/Parquet IO
//! - [`datagen`]: seeded synthetic datasets
//! - [`repr`]: tree and forest representation
//! - [`training`]: objectives, metrics and the histogram GBDT trainer
//! - [`model`]: high-level [`GBDTModel`] with a validated [`GBDTConfig`]
//! - [`explainability`]: TreeSHAP, Kernel SHAP and [`ShapValues`]
//! - [`experiment`]: the data generator and multiplicative SHAP probe
//!
//! # Example
//!
//! ```no_run
//! use multishap::datagen::probe_dataset;
//! use multishap::explainability::TreeExplainer;
//! use multishap::{GBDTConfig, GBDTModel};
//!
//! let frame = probe_dataset(15, 1000).unwrap();
//! let features = frame.select(&["x1", "x2", "x3"]).unwrap();
//! let target = frame.column("y1").unwrap();
//!
//! let config = GBDTConfig::builder().build().unwrap();
//! let model = GBDTModel::train(features.view(), target, config).unwrap();
//!
//! let explainer = TreeExplainer::new(model.forest()).unwrap();
//! let shap = explainer.shap_values(features.view()).unwrap();
//! assert!(shap.verify(model.predict(features.view()).as_slice().unwrap(), 1e-6));
//! ```

pub mod data;
pub mod datagen;
pub mod experiment;
pub mod explainability;
pub mod model;
pub mod repr;
pub mod training;
pub mod utils;

#[doc(hidden)]
pub mod testing;

pub use explainability::{KernelExplainer, ShapValues, TreeExplainer};
pub use model::{GBDTConfig, GBDTModel, Predict};
pub use utils::{Parallelism, run_with_threads};
