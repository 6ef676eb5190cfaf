//! GBDT trainer: the boosting loop.

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use super::grower::{GrowerParams, TreeGrower};
use super::split::GainParams;
use crate::data::BinnedDataset;
use crate::repr::gbdt::{Forest, TreeView};
use crate::training::{Gradients, MetricFn, ObjectiveFn, TrainError, TrainingLogger, Verbosity};
use crate::utils::Parallelism;

/// Mid-level parameters for [`GBDTTrainer`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GBDTParams {
    /// Number of boosting rounds (one tree per round).
    pub n_trees: u32,
    /// Shrinkage applied to every tree.
    pub learning_rate: f64,
    /// Maximum tree depth.
    pub max_depth: u32,
    /// Regularization and split constraints.
    pub gain: GainParams,
    pub verbosity: Verbosity,
}

impl Default for GBDTParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            learning_rate: 0.1,
            max_depth: 3,
            gain: GainParams::default(),
            verbosity: Verbosity::default(),
        }
    }
}

impl GBDTParams {
    fn to_grower_params(&self) -> GrowerParams {
        GrowerParams {
            gain: self.gain.clone(),
            learning_rate: self.learning_rate,
            max_depth: self.max_depth,
        }
    }
}

/// Gradient boosted tree trainer.
///
/// Starts from the objective's base score and adds one tree per round,
/// each fitted to the current gradients.
pub struct GBDTTrainer<O: ObjectiveFn, M: MetricFn> {
    objective: O,
    metric: M,
    params: GBDTParams,
}

impl<O: ObjectiveFn, M: MetricFn> GBDTTrainer<O, M> {
    pub fn new(objective: O, metric: M, params: GBDTParams) -> Self {
        Self { objective, metric, params }
    }

    pub fn params(&self) -> &GBDTParams {
        &self.params
    }

    /// Train a forest on a binned dataset.
    ///
    /// # Errors
    ///
    /// [`TrainError`] on an empty dataset, mismatched target or weight
    /// lengths, or non-finite targets.
    pub fn train(
        &self,
        dataset: &BinnedDataset,
        targets: ArrayView1<'_, f64>,
        weights: Option<ArrayView1<'_, f64>>,
        parallelism: Parallelism,
    ) -> Result<Forest, TrainError> {
        let n_rows = dataset.n_rows();
        if n_rows == 0 {
            return Err(TrainError::EmptyDataset);
        }
        if targets.len() != n_rows {
            return Err(TrainError::TargetLengthMismatch { expected: n_rows, got: targets.len() });
        }
        if let Some(w) = weights
            && w.len() != n_rows
        {
            return Err(TrainError::WeightLengthMismatch { expected: n_rows, got: w.len() });
        }
        if let Some(row) = targets.iter().position(|t| !t.is_finite()) {
            return Err(TrainError::NonFiniteTarget { row });
        }

        let mut logger = TrainingLogger::new(self.params.verbosity);
        logger.start_training(self.params.n_trees, n_rows, dataset.n_features());

        let base_score = self.objective.compute_base_score(targets, weights);
        let mut forest = Forest::new(base_score);
        let mut predictions = vec![base_score; n_rows];
        let mut gradients = Gradients::new(n_rows);
        let mut grower = TreeGrower::new(self.params.to_grower_params());

        for round in 0..self.params.n_trees {
            self.objective.compute_gradients_into(
                ArrayView1::from(predictions.as_slice()),
                targets,
                weights,
                gradients.as_mut_slice(),
            );

            let tree = grower.grow(dataset, gradients.as_slice(), parallelism);
            grower.update_predictions(&mut predictions);
            if round == 0 && tree.n_nodes() == 1 {
                logger.warn("first tree has no split; features carry no usable signal");
            }
            forest.push_tree(tree);

            if logger.wants_rounds() {
                let value = self.metric.compute(ArrayView1::from(predictions.as_slice()), targets, weights);
                logger.log_round(round, self.metric.name(), value);
            }
        }

        logger.finish_training(forest.n_trees());
        Ok(forest)
    }
}
