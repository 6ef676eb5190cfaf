//! The multiplicative SHAP probe.
//!
//! Fits one model per response of Dataset B, explains each with TreeSHAP,
//! then explains the product `model_y1 · model_y2` with Kernel SHAP and
//! reports how those attributions relate to the per-factor ones. Nothing
//! here asserts a multiplicative law; the numbers are the output.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use bon::Builder;
use ndarray::{Array1, Array2, ArrayView2, Zip};
use serde::{Deserialize, Serialize};

use super::{ProbeError, product_rule_decomposition};
use crate::data::Frame;
use crate::datagen::probe_dataset;
use crate::explainability::{KernelConfig, KernelExplainer, ShapValues, TreeExplainer};
use crate::model::{FitReport, GBDTConfig, GBDTModel, ProductPredictor, RegularizationParams};
use crate::training::{Mae, MetricFn, Mse};
use crate::utils::run_with_threads;

const FEATURES: [&str; 3] = ["x1", "x2", "x3"];
const RESPONSES: [&str; 3] = ["y1", "y2", "y3"];

/// Probe settings. Defaults reproduce the fixed run: seed 15, 1000 rows,
/// `min_samples_leaf = 2`.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct ProbeConfig {
    #[builder(default = 15)]
    pub seed: u64,
    #[builder(default = 1000)]
    pub n_samples: usize,
    /// Shared by all three models. Its thread count also drives the explainers.
    #[builder(default = default_model_config())]
    pub model: GBDTConfig,
    #[builder(default)]
    pub kernel: KernelConfig,
    /// Leading records whose additivity is reported row by row.
    #[builder(default = 2)]
    pub inspect_rows: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

fn default_model_config() -> GBDTConfig {
    GBDTConfig {
        regularization: RegularizationParams { min_samples_leaf: 2, ..Default::default() },
        ..Default::default()
    }
}

// =============================================================================
// Report
// =============================================================================

/// One record's additivity check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectedRow {
    pub record: usize,
    pub prediction: f64,
    /// `expected_value + Σφ`.
    pub reconstructed: f64,
    pub attributions: Vec<f64>,
}

/// Fit and TreeSHAP results for one response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSummary {
    pub response: String,
    pub fit: FitReport,
    pub expected_value: f64,
    pub max_additivity_residual: f64,
    pub inspected: Vec<InspectedRow>,
}

/// `pred(y1) · pred(y2)` against `pred(y3)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductComparison {
    pub mse: f64,
    pub mae: f64,
}

/// Kernel SHAP of the product predictor and how it relates to the factors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KernelSummary {
    pub n_records: usize,
    pub n_features: usize,
    pub background_rows: usize,
    /// `E[p1·p2]` over the background.
    pub expected_value: f64,
    /// `E1·E2` from the two tree explainers.
    pub product_of_expected: f64,
    pub base_value_gap: f64,
    /// `|Σφ - (p1·p2 - E[p1·p2])|`, worst and mean over records.
    pub max_efficiency_gap: f64,
    pub mean_efficiency_gap: f64,
    /// Mean absolute difference to the product-rule decomposition of the
    /// two TreeSHAP matrices.
    pub decomposition_mean_abs_diff: f64,
    /// Mean absolute difference to TreeSHAP of the directly fitted `y3` model.
    pub tree_y3_mean_abs_diff: f64,
}

/// Everything the probe measured.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeReport {
    pub seed: u64,
    pub n_samples: usize,
    pub models: Vec<ModelSummary>,
    pub product: ProductComparison,
    pub kernel: KernelSummary,
}

impl ProbeReport {
    /// Write the report as pretty-printed JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ProbeError> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

// =============================================================================
// Run
// =============================================================================

struct Explained {
    model: GBDTModel,
    predictions: Array1<f64>,
    shap: ShapValues,
    summary: ModelSummary,
}

/// Run the probe end to end.
///
/// # Errors
///
/// Any data, training or explanation failure, as [`ProbeError`].
pub fn run_probe(config: &ProbeConfig) -> Result<ProbeReport, ProbeError> {
    let frame = probe_dataset(config.seed, config.n_samples)?;
    let x = frame.select(&FEATURES)?;
    tracing::info!(seed = config.seed, rows = frame.n_rows(), "probe dataset ready");

    let [r1, r2, r3] = RESPONSES;
    let y1 = fit_and_explain(config, x.view(), &frame, r1)?;
    let y2 = fit_and_explain(config, x.view(), &frame, r2)?;
    let y3 = fit_and_explain(config, x.view(), &frame, r3)?;

    let preds3_real = &y1.predictions * &y2.predictions;
    let product = ProductComparison {
        mse: Mse.compute(preds3_real.view(), y3.predictions.view(), None),
        mae: Mae.compute(preds3_real.view(), y3.predictions.view(), None),
    };
    tracing::info!(mse = product.mse, mae = product.mae, "product of models vs direct model");

    let predictor = ProductPredictor::new(&y1.model, &y2.model);
    let explainer = KernelExplainer::new(predictor, x.view(), config.kernel.clone())?;
    let kernel_shap = run_with_threads(config.model.thread_count(), |parallelism| {
        explainer.shap_values_with(x.view(), parallelism)
    })?;

    let gaps: Vec<f64> = (0..kernel_shap.n_samples())
        .map(|s| {
            let claimed: f64 = kernel_shap.row(s).iter().sum();
            (claimed - (preds3_real[s] - explainer.expected_value())).abs()
        })
        .collect();

    let decomposition = product_rule_decomposition(&y1.shap, &y2.shap)?;
    let kernel_matrix = kernel_shap.feature_matrix();
    let product_of_expected = y1.summary.expected_value * y2.summary.expected_value;
    let kernel = KernelSummary {
        n_records: kernel_shap.n_samples(),
        n_features: kernel_shap.n_features(),
        background_rows: explainer.background().nrows(),
        expected_value: explainer.expected_value(),
        product_of_expected,
        base_value_gap: explainer.expected_value() - product_of_expected,
        max_efficiency_gap: gaps.iter().copied().fold(0.0, f64::max),
        mean_efficiency_gap: mean(&gaps),
        decomposition_mean_abs_diff: mean_abs_diff(&kernel_matrix, &decomposition.feature_matrix()),
        tree_y3_mean_abs_diff: mean_abs_diff(&kernel_matrix, &y3.shap.feature_matrix()),
    };
    tracing::info!(
        efficiency_gap = kernel.max_efficiency_gap,
        decomposition_diff = kernel.decomposition_mean_abs_diff,
        base_value_gap = kernel.base_value_gap,
        "kernel attributions of the product"
    );

    Ok(ProbeReport {
        seed: config.seed,
        n_samples: config.n_samples,
        models: vec![y1.summary, y2.summary, y3.summary],
        product,
        kernel,
    })
}

fn fit_and_explain(
    config: &ProbeConfig,
    x: ArrayView2<'_, f64>,
    frame: &Frame,
    response: &str,
) -> Result<Explained, ProbeError> {
    let target = frame.column(response)?;
    let model = GBDTModel::train(x, target, config.model.clone())?
        .with_feature_names(FEATURES.iter().map(|f| f.to_string()).collect());
    let fit = model.evaluate(x, target);
    tracing::info!(response, mse = fit.mse, mae = fit.mae, "model fitted");

    let explainer = TreeExplainer::new(model.forest())?;
    let shap = run_with_threads(config.model.thread_count(), |parallelism| {
        explainer.shap_values_with(x, parallelism)
    })?;
    let predictions = model.predict(x);
    let max_additivity_residual = shap.max_abs_residual(predictions.view())?;

    let sums = shap.sums();
    let inspected = (0..config.inspect_rows.min(shap.n_samples()))
        .map(|record| InspectedRow {
            record,
            prediction: predictions[record],
            reconstructed: sums[record],
            attributions: shap.row(record).to_vec(),
        })
        .collect();
    tracing::debug!(response, max_additivity_residual, "tree attributions");

    let summary = ModelSummary {
        response: response.to_string(),
        fit,
        expected_value: explainer.expected_value(),
        max_additivity_residual,
        inspected,
    };
    Ok(Explained { model, predictions, shap, summary })
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() { 0.0 } else { values.iter().sum::<f64>() / values.len() as f64 }
}

fn mean_abs_diff(a: &Array2<f64>, b: &Array2<f64>) -> f64 {
    if a.is_empty() {
        return 0.0;
    }
    Zip::from(a).and(b).fold(0.0, |acc, x, y| acc + (x - y).abs()) / a.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;

    fn small_config() -> ProbeConfig {
        ProbeConfig::builder()
            .n_samples(120)
            .model(GBDTConfig {
                n_trees: 20,
                n_threads: NonZeroUsize::new(1),
                ..default_model_config()
            })
            .kernel(KernelConfig::builder().max_background(20).build())
            .build()
    }

    #[test]
    fn defaults_match_fixed_run() {
        let config = ProbeConfig::default();
        assert_eq!(config.seed, 15);
        assert_eq!(config.n_samples, 1000);
        assert_eq!(config.inspect_rows, 2);
        assert_eq!(config.model.regularization.min_samples_leaf, 2);
        assert_eq!(config.kernel.max_background, None);
    }

    #[test]
    fn small_probe_reports_every_section() {
        let report = run_probe(&small_config()).unwrap();

        assert_eq!(report.models.len(), 3);
        for (model, name) in report.models.iter().zip(RESPONSES) {
            assert_eq!(model.response, name);
            assert!(model.fit.mse >= 0.0);
            assert_eq!(model.inspected.len(), 2);
            let scale = model.inspected.iter().map(|r| r.prediction.abs()).fold(1.0, f64::max);
            assert!(model.max_additivity_residual <= 1e-6 * scale.max(1e3));
        }
        assert_eq!(report.kernel.n_records, 120);
        assert_eq!(report.kernel.n_features, 3);
        assert_eq!(report.kernel.background_rows, 20);
        assert!(report.kernel.max_efficiency_gap < 1e-6);
        assert!(report.kernel.decomposition_mean_abs_diff.is_finite());
    }

    #[test]
    fn default_kernel_explains_against_every_row() {
        let config = ProbeConfig::builder()
            .n_samples(80)
            .model(GBDTConfig { n_trees: 10, n_threads: NonZeroUsize::new(1), ..default_model_config() })
            .build();
        let report = run_probe(&config).unwrap();
        assert_eq!(report.kernel.background_rows, config.n_samples);
        assert_eq!(report.kernel.n_records, config.n_samples);
    }

    #[test]
    fn report_serializes_to_json() {
        let report = run_probe(&small_config()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        report.write_json(&path).unwrap();

        let value: serde_json::Value = serde_json::from_reader(File::open(&path).unwrap()).unwrap();
        assert_eq!(value["seed"], 15);
        assert_eq!(value["models"][2]["response"], "y3");
    }

    #[test]
    fn empty_probe_fails_in_training() {
        let config = ProbeConfig::builder().n_samples(0).build();
        assert!(matches!(run_probe(&config), Err(ProbeError::Train(_))));
    }

    #[test]
    fn mean_abs_diff_of_matrices() {
        let a = ndarray::array![[1.0, 2.0], [3.0, 4.0]];
        let b = ndarray::array![[1.5, 2.0], [2.0, 4.0]];
        assert_eq!(mean_abs_diff(&a, &b), 0.375);
        assert_eq!(mean(&[]), 0.0);
    }
}
