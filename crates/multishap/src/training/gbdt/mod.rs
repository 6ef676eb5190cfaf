//! Histogram-based gradient boosted decision trees.
//!
//! Features are quantized once into a [`BinnedDataset`](crate::data::BinnedDataset);
//! every round builds gradient histograms per node and grows a depth-wise
//! tree with [`TreeGrower`].

mod grower;
mod histogram;
mod partition;
mod split;
mod trainer;

pub use grower::{GrowerParams, TreeGrower};
pub use histogram::{HistogramBin, NodeHistogram};
pub use partition::RowPartitioner;
pub use split::{GainParams, NodeStats, SplitInfo, find_best_split};
pub use trainer::{GBDTParams, GBDTTrainer};
