//! SHAP values container.
//!
//! Stores attributions for a batch of samples with the base value next to
//! each row, plus additivity checks.

use ndarray::{Array1, Array2, ArrayView1};
use serde::Serialize;

use crate::explainability::ExplainError;

/// Container for SHAP values.
///
/// Layout is `[samples × (features + 1)]`; the last slot of every row holds
/// the base value.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShapValues {
    values: Vec<f64>,
    n_samples: usize,
    n_features: usize,
}

impl ShapValues {
    /// Create a container initialized to zeros.
    pub fn zeros(n_samples: usize, n_features: usize) -> Self {
        Self {
            values: vec![0.0; n_samples * (n_features + 1)],
            n_samples,
            n_features,
        }
    }

    #[inline]
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Number of features (not including base value).
    #[inline]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    #[inline]
    fn index(&self, sample: usize, feature: usize) -> usize {
        sample * (self.n_features + 1) + feature
    }

    #[inline]
    pub fn get(&self, sample: usize, feature: usize) -> f64 {
        self.values[self.index(sample, feature)]
    }

    #[inline]
    pub fn set(&mut self, sample: usize, feature: usize, value: f64) {
        let idx = self.index(sample, feature);
        self.values[idx] = value;
    }

    #[inline]
    pub fn add(&mut self, sample: usize, feature: usize, delta: f64) {
        let idx = self.index(sample, feature);
        self.values[idx] += delta;
    }

    /// Base value (expected model output) stored with a sample.
    #[inline]
    pub fn base_value(&self, sample: usize) -> f64 {
        self.get(sample, self.n_features)
    }

    #[inline]
    pub fn set_base_value(&mut self, sample: usize, value: f64) {
        self.set(sample, self.n_features, value);
    }

    /// Feature attributions of one sample, without the base value.
    pub fn row(&self, sample: usize) -> &[f64] {
        let start = self.index(sample, 0);
        &self.values[start..start + self.n_features]
    }

    /// Attributions of one sample followed by its base value.
    pub(crate) fn sample_mut(&mut self, sample: usize) -> &mut [f64] {
        let start = self.index(sample, 0);
        let width = self.n_features + 1;
        &mut self.values[start..start + width]
    }

    /// Attributions as a `[n_samples, n_features]` matrix.
    pub fn feature_matrix(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.n_samples, self.n_features), |(s, f)| self.get(s, f))
    }

    /// `base + Σ φ` per sample: what the attributions claim the model predicted.
    pub fn sums(&self) -> Array1<f64> {
        (0..self.n_samples)
            .map(|s| self.base_value(s) + self.row(s).iter().sum::<f64>())
            .collect()
    }

    /// `prediction - (base + Σ φ)` per sample.
    pub fn additivity_residuals(&self, predictions: ArrayView1<'_, f64>) -> Result<Array1<f64>, ExplainError> {
        if predictions.len() != self.n_samples {
            return Err(ExplainError::PredictionLength {
                expected: self.n_samples,
                got: predictions.len(),
            });
        }
        Ok(&predictions - &self.sums())
    }

    /// Largest absolute additivity residual; 0 for an empty batch.
    pub fn max_abs_residual(&self, predictions: ArrayView1<'_, f64>) -> Result<f64, ExplainError> {
        let residuals = self.additivity_residuals(predictions)?;
        Ok(residuals.iter().fold(0.0, |acc, r| acc.max(r.abs())))
    }

    /// Check `base + Σ φ ≈ prediction` for every sample.
    ///
    /// The tolerance is relative to `max(1, |prediction|)`.
    pub fn verify(&self, predictions: &[f64], tolerance: f64) -> bool {
        if predictions.len() != self.n_samples {
            return false;
        }
        self.sums()
            .iter()
            .zip(predictions)
            .all(|(sum, pred)| (sum - pred).abs() <= tolerance * pred.abs().max(1.0))
    }

    /// Get the raw values slice.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}
