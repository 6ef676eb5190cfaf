//! Kernel SHAP: model-agnostic Shapley value estimation.
//!
//! Each record's attributions solve a weighted linear regression of
//! coalition values on coalition membership, weighted by the Shapley
//! kernel `(M-1) / (C(M,s)·s·(M-s))`. The efficiency constraint
//! `Σφ = f(x) - E[f]` is enforced exactly by eliminating the last feature.

use bon::Builder;
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

use super::ShapValues;
use super::solver::WeightedLeastSquares;
use crate::explainability::ExplainError;
use crate::model::Predict;
use crate::utils::Parallelism;

/// Kernel SHAP settings.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct KernelConfig {
    /// Coalitions evaluated per record. `None` means `2M + 2048`. When all
    /// `2^M - 2` proper coalitions fit, they are enumerated instead.
    pub n_coalitions: Option<usize>,
    /// Background rows kept after seeded subsampling. `None` (the default)
    /// keeps the whole background.
    pub max_background: Option<usize>,
    /// Seed for background subsampling and coalition sampling. Default: 0.
    #[builder(default)]
    pub seed: u64,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self { n_coalitions: None, max_background: None, seed: 0 }
    }
}

impl KernelConfig {
    fn budget(&self, n_features: usize) -> usize {
        self.n_coalitions.unwrap_or(2 * n_features + 2048)
    }
}

#[derive(Debug, Clone)]
struct Coalition {
    mask: Vec<bool>,
    weight: f64,
}

/// Kernel SHAP explainer over any [`Predict`].
pub struct KernelExplainer<P> {
    predictor: P,
    background: Array2<f64>,
    expected_value: f64,
    config: KernelConfig,
}

impl<P: Predict> KernelExplainer<P> {
    /// Create an explainer. The background is subsampled to
    /// `config.max_background` rows when that limit is set.
    ///
    /// # Errors
    ///
    /// [`ExplainError::EmptyBackground`] for an empty background and
    /// [`ExplainError::FeatureMismatch`] if the predictor expects a different
    /// number of columns.
    pub fn new(predictor: P, background: ArrayView2<'_, f64>, config: KernelConfig) -> Result<Self, ExplainError> {
        let (n_rows, n_features) = background.dim();
        if n_rows == 0 {
            return Err(ExplainError::EmptyBackground);
        }
        if let Some(expected) = predictor.n_features()
            && expected != n_features
        {
            return Err(ExplainError::FeatureMismatch { expected, got: n_features });
        }

        let keep = config.max_background.map_or(n_rows, |limit| limit.max(1));
        let background = if n_rows > keep {
            let mut rng = StdRng::seed_from_u64(config.seed);
            let mut rows = index::sample(&mut rng, n_rows, keep).into_vec();
            rows.sort_unstable();
            background.select(Axis(0), &rows)
        } else {
            background.to_owned()
        };

        let expected_value = predictor.predict(background.view()).mean().unwrap_or(0.0);
        tracing::debug!(
            background_rows = background.nrows(),
            n_features,
            expected_value,
            "kernel explainer ready"
        );

        Ok(Self { predictor, background, expected_value, config })
    }

    /// Mean prediction over the (subsampled) background.
    pub fn expected_value(&self) -> f64 {
        self.expected_value
    }

    pub fn background(&self) -> ArrayView2<'_, f64> {
        self.background.view()
    }

    pub fn predictor(&self) -> &P {
        &self.predictor
    }

    /// SHAP values for every row of `features`, one record at a time.
    pub fn shap_values(&self, features: ArrayView2<'_, f64>) -> Result<ShapValues, ExplainError> {
        self.shap_values_with(features, Parallelism::Sequential)
    }

    /// [`shap_values`](Self::shap_values), optionally parallel over records.
    /// Results don't depend on `parallelism`.
    pub fn shap_values_with(
        &self,
        features: ArrayView2<'_, f64>,
        parallelism: Parallelism,
    ) -> Result<ShapValues, ExplainError> {
        let (n_samples, n_features) = features.dim();
        if n_features != self.background.ncols() {
            return Err(ExplainError::FeatureMismatch { expected: self.background.ncols(), got: n_features });
        }

        let predictions = self.predictor.predict(features);
        let enumerated = enumerate_coalitions(n_features, self.config.budget(n_features));

        let phis = parallelism.maybe_par_try_map(0..n_samples, |record| {
            let x = features.row(record);
            let delta = predictions[record] - self.expected_value;
            match n_features {
                0 => Ok(Vec::new()),
                1 => Ok(vec![delta]),
                _ => {
                    let sampled;
                    let coalitions = match &enumerated {
                        Some(all) => all.as_slice(),
                        None => {
                            sampled = self.sample_coalitions(n_features, record);
                            sampled.as_slice()
                        }
                    };
                    self.explain_record(x, delta, coalitions)
                        .ok_or(ExplainError::SingularSystem { record })
                }
            }
        })?;

        let mut shap = ShapValues::zeros(n_samples, n_features);
        for (record, phi) in phis.into_iter().enumerate() {
            let out = shap.sample_mut(record);
            out[..n_features].copy_from_slice(&phi);
            out[n_features] = self.expected_value;
        }
        Ok(shap)
    }

    /// Solve one record. `None` if the regression is singular.
    fn explain_record(&self, x: ArrayView1<'_, f64>, delta: f64, coalitions: &[Coalition]) -> Option<Vec<f64>> {
        let m = x.len();
        let values = self.coalition_values(x, coalitions);

        // Eliminate φ_M: y - z_M·Δ = Σ_{j<M} φ_j (z_j - z_M).
        let mut wls = WeightedLeastSquares::new(m - 1);
        let mut row = vec![0.0; m - 1];
        for (coalition, value) in coalitions.iter().zip(values) {
            let z_last = if coalition.mask[m - 1] { 1.0 } else { 0.0 };
            for (r, &inside) in row.iter_mut().zip(&coalition.mask[..m - 1]) {
                *r = if inside { 1.0 } else { 0.0 } - z_last;
            }
            let y = value - self.expected_value - z_last * delta;
            wls.add(&row, y, coalition.weight);
        }

        let mut phi = wls.solve()?;
        let last = delta - phi.iter().sum::<f64>();
        phi.push(last);
        Some(phi)
    }

    /// Mean prediction over the background with out-of-coalition features
    /// taken from the background, in one batch.
    fn coalition_values(&self, x: ArrayView1<'_, f64>, coalitions: &[Coalition]) -> Vec<f64> {
        let n_bg = self.background.nrows();
        let m = x.len();
        let mut batch = Array2::zeros((coalitions.len() * n_bg, m));
        for (c, coalition) in coalitions.iter().enumerate() {
            for (b, bg) in self.background.rows().into_iter().enumerate() {
                let mut out = batch.row_mut(c * n_bg + b);
                for j in 0..m {
                    out[j] = if coalition.mask[j] { x[j] } else { bg[j] };
                }
            }
        }

        let predictions = self.predictor.predict(batch.view());
        predictions
            .as_slice()
            .map(|p| p.chunks(n_bg).map(|chunk| chunk.iter().sum::<f64>() / n_bg as f64).collect())
            .unwrap_or_else(|| {
                (0..coalitions.len())
                    .map(|c| (0..n_bg).map(|b| predictions[c * n_bg + b]).sum::<f64>() / n_bg as f64)
                    .collect()
            })
    }

    /// Paired sampling: a subset and its complement, sizes drawn in
    /// proportion to the kernel mass of each size.
    fn sample_coalitions(&self, m: usize, record: usize) -> Vec<Coalition> {
        let mut rng = record_rng(self.config.seed, record);
        let sizes: Vec<f64> = (1..m).map(|s| (m - 1) as f64 / (s * (m - s)) as f64).collect();
        let total: f64 = sizes.iter().sum();

        let n_pairs = (self.config.budget(m) / 2).max(1);
        let mut coalitions = Vec::with_capacity(2 * n_pairs);
        for _ in 0..n_pairs {
            let u = rng.r#gen::<f64>() * total;
            let mut acc = 0.0;
            let mut size = m - 1;
            for (i, w) in sizes.iter().enumerate() {
                acc += w;
                if u < acc {
                    size = i + 1;
                    break;
                }
            }

            let mut mask = vec![false; m];
            for j in index::sample(&mut rng, m, size) {
                mask[j] = true;
            }
            let complement = mask.iter().map(|&z| !z).collect();
            coalitions.push(Coalition { mask, weight: 1.0 });
            coalitions.push(Coalition { mask: complement, weight: 1.0 });
        }
        coalitions
    }
}

/// Per-record RNG, independent of evaluation order.
fn record_rng(seed: u64, record: usize) -> Xoshiro256PlusPlus {
    Xoshiro256PlusPlus::seed_from_u64(seed ^ (record as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Every proper, non-empty coalition with its Shapley kernel weight, or
/// `None` if there are more than `budget` of them.
fn enumerate_coalitions(m: usize, budget: usize) -> Option<Vec<Coalition>> {
    if m < 2 || m >= usize::BITS as usize - 1 {
        return None;
    }
    let count = (1usize << m) - 2;
    if count > budget {
        return None;
    }
    let coalitions = (1..=count)
        .map(|bits| {
            let mask: Vec<bool> = (0..m).map(|j| (bits >> j) & 1 == 1).collect();
            let size = mask.iter().filter(|&&z| z).count();
            Coalition { mask, weight: shapley_kernel_weight(m, size) }
        })
        .collect();
    Some(coalitions)
}

fn shapley_kernel_weight(m: usize, size: usize) -> f64 {
    (m - 1) as f64 / (binomial(m, size) * size as f64 * (m - size) as f64)
}

fn binomial(n: usize, k: usize) -> f64 {
    let k = k.min(n - k);
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}
