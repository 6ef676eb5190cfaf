//! GBDT model implementation.
//!
//! High-level wrapper around [`Forest`] with training, prediction and
//! evaluation. Access components via [`forest()`](GBDTModel::forest),
//! [`meta()`](GBDTModel::meta) and [`config()`](GBDTModel::config).

use ndarray::{Array1, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use super::GBDTConfig;
use crate::data::BinnedDataset;
use crate::model::{ModelMeta, Predict};
use crate::repr::gbdt::Forest;
use crate::training::{GBDTTrainer, Mae, MetricFn, Mse, TrainError};
use crate::utils::{Parallelism, run_with_threads};

/// Fit quality of a model on one dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitReport {
    pub mse: f64,
    pub mae: f64,
}

/// A trained gradient boosted regression model.
#[derive(Debug, Clone)]
pub struct GBDTModel {
    forest: Forest,
    meta: ModelMeta,
    config: GBDTConfig,
}

impl GBDTModel {
    /// Assemble a model from an existing forest.
    pub fn from_parts(forest: Forest, meta: ModelMeta, config: GBDTConfig) -> Self {
        Self { forest, meta, config }
    }

    // =========================================================================
    // Training
    // =========================================================================

    /// Train on a sample-major `[n_samples, n_features]` matrix.
    ///
    /// The config is re-validated (it may have been deserialized), features
    /// are binned, and boosting runs inside a pool of `config.n_threads`.
    ///
    /// # Errors
    ///
    /// [`TrainError`] for an invalid config, non-finite features or targets,
    /// mismatched lengths, or an empty dataset.
    pub fn train(
        features: ArrayView2<'_, f64>,
        targets: ArrayView1<'_, f64>,
        config: GBDTConfig,
    ) -> Result<Self, TrainError> {
        config.validate()?;
        if features.nrows() == 0 {
            return Err(TrainError::EmptyDataset);
        }

        let forest = run_with_threads(config.thread_count(), |parallelism| -> Result<Forest, TrainError> {
            let dataset = BinnedDataset::from_features(features, config.max_bins, parallelism)?;
            let trainer = GBDTTrainer::new(
                config.objective,
                config.metric.unwrap_or_default(),
                config.to_trainer_params(),
            );
            trainer.train(&dataset, targets, None, parallelism)
        })?;

        let meta = ModelMeta {
            feature_names: None,
            n_features: features.ncols(),
            base_score: forest.base_score(),
            n_trees: forest.n_trees(),
        };
        Ok(Self { forest, meta, config })
    }

    pub fn with_feature_names(mut self, names: Vec<String>) -> Self {
        self.meta.feature_names = Some(names);
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn meta(&self) -> &ModelMeta {
        &self.meta
    }

    pub fn config(&self) -> &GBDTConfig {
        &self.config
    }

    // =========================================================================
    // Prediction
    // =========================================================================

    /// Predict every row, using the config's thread count.
    pub fn predict(&self, features: ArrayView2<'_, f64>) -> Array1<f64> {
        run_with_threads(self.config.thread_count(), |parallelism| {
            self.forest.predict(features, parallelism)
        })
    }

    /// MSE and MAE of the predictions against `targets`.
    pub fn evaluate(&self, features: ArrayView2<'_, f64>, targets: ArrayView1<'_, f64>) -> FitReport {
        let predictions = self.predict(features);
        FitReport {
            mse: Mse.compute(predictions.view(), targets, None),
            mae: Mae.compute(predictions.view(), targets, None),
        }
    }
}

impl Predict for GBDTModel {
    fn predict(&self, features: ArrayView2<'_, f64>) -> Array1<f64> {
        self.forest.predict(features, Parallelism::Sequential)
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.meta.n_features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RegularizationParams;
    use crate::training::Verbosity;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array2, array};

    fn grid(n: usize) -> (Array2<f64>, Array1<f64>) {
        let x = Array2::from_shape_fn((n, 2), |(i, j)| if j == 0 { (i % 10) as f64 } else { (i / 10) as f64 });
        let y = x.rows().into_iter().map(|r| r[0] + 2.0 * r[1]).collect();
        (x, y)
    }

    #[test]
    fn train_predict_evaluate() {
        let (x, y) = grid(100);
        let config = GBDTConfig::builder().n_trees(50).learning_rate(0.3).build().unwrap();
        let model = GBDTModel::train(x.view(), y.view(), config).unwrap();

        assert_eq!(model.meta().n_features, 2);
        assert_eq!(model.meta().n_trees, 50);
        assert_abs_diff_eq!(model.meta().base_score, y.mean().unwrap(), epsilon = 1e-12);

        let report = model.evaluate(x.view(), y.view());
        assert!(report.mse >= 0.0);
        assert!(report.mse < 0.05 * y.var(0.0), "mse {}", report.mse);
        assert!(report.mae <= report.mse.sqrt() + 1e-12);
    }

    #[test]
    fn trait_and_inherent_predictions_agree() {
        let (x, y) = grid(40);
        let config = GBDTConfig::builder().n_trees(10).verbosity(Verbosity::Debug).build().unwrap();
        let model = GBDTModel::train(x.view(), y.view(), config).unwrap();

        let inherent = model.predict(x.view());
        let via_trait = Predict::predict(&model, x.view());
        assert_eq!(inherent, via_trait);
        assert_eq!(Predict::n_features(&model), Some(2));
    }

    #[test]
    fn deserialized_invalid_config_is_rejected() {
        let (x, y) = grid(10);
        let config = GBDTConfig {
            regularization: RegularizationParams { lambda: -1.0, ..Default::default() },
            ..Default::default()
        };
        assert!(matches!(
            GBDTModel::train(x.view(), y.view(), config),
            Err(TrainError::Config(_))
        ));
    }

    #[test]
    fn non_finite_feature_is_a_data_error() {
        let x = array![[0.0], [f64::INFINITY]];
        let y = array![0.0, 1.0];
        assert!(matches!(
            GBDTModel::train(x.view(), y.view(), GBDTConfig::default()),
            Err(TrainError::Data(_))
        ));
    }

    #[test]
    fn feature_names_are_kept() {
        let (x, y) = grid(10);
        let config = GBDTConfig::builder().n_trees(1).build().unwrap();
        let model = GBDTModel::train(x.view(), y.view(), config)
            .unwrap()
            .with_feature_names(vec!["a".into(), "b".into()]);
        assert_eq!(model.meta().feature_names.as_deref(), Some(&["a".to_string(), "b".to_string()][..]));
    }
}
