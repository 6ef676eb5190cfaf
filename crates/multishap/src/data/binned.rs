//! Quantile binning of numeric features for histogram split finding.
//!
//! Each feature gets a [`BinMapper`] holding sorted cut points. A value `v`
//! falls in bin `b` = number of cut points `<= v`, so a split after bin `b`
//! sends a sample left exactly when `v < cuts[b]`. Trees store the raw cut
//! value as their threshold and never need the mapper at prediction time.

use ndarray::{Array2, ArrayView2};

use super::DataError;
use crate::utils::Parallelism;

/// Upper bound on bins per feature (bin indices are stored as `u16`).
pub const MAX_BINS_LIMIT: usize = u16::MAX as usize + 1;

// =============================================================================
// BinMapper
// =============================================================================

/// Value-to-bin mapping for one numeric feature.
#[derive(Debug, Clone, PartialEq)]
pub struct BinMapper {
    cuts: Vec<f64>,
}

impl BinMapper {
    /// Build a mapper from a column of finite values.
    ///
    /// With at most `max_bins` distinct values every distinct value gets its
    /// own bin (cuts at midpoints). Otherwise cuts are placed at midpoints
    /// around evenly spaced quantiles of the sorted column.
    pub fn from_values(values: &[f64], max_bins: usize) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mut distinct = sorted.clone();
        distinct.dedup();

        let cuts = if distinct.len() <= max_bins {
            distinct.windows(2).map(|w| midpoint(w[0], w[1])).collect()
        } else {
            let n = sorted.len();
            let mut cuts: Vec<f64> = Vec::with_capacity(max_bins - 1);
            for q in 1..max_bins {
                let idx = q * n / max_bins;
                if idx == 0 || idx >= n {
                    continue;
                }
                let (lo, hi) = (sorted[idx - 1], sorted[idx]);
                if lo < hi {
                    let cut = midpoint(lo, hi);
                    if cuts.last().is_none_or(|&last| last < cut) {
                        cuts.push(cut);
                    }
                }
            }
            cuts
        };

        Self { cuts }
    }

    /// Number of bins (cuts + 1).
    #[inline]
    pub fn n_bins(&self) -> usize {
        self.cuts.len() + 1
    }

    #[inline]
    pub fn cuts(&self) -> &[f64] {
        &self.cuts
    }

    /// Bin index for a value.
    #[inline]
    pub fn bin(&self, value: f64) -> u16 {
        self.cuts.partition_point(|&c| c <= value) as u16
    }

    /// Threshold for a split placing bins `0..=bin` on the left.
    ///
    /// Returns `None` for the last bin, which has no upper cut.
    #[inline]
    pub fn threshold(&self, bin: usize) -> Option<f64> {
        self.cuts.get(bin).copied()
    }
}

#[inline]
fn midpoint(lo: f64, hi: f64) -> f64 {
    let mid = lo + (hi - lo) / 2.0;
    // Adjacent floats: the midpoint can round back down to `lo`.
    if mid > lo { mid } else { hi }
}

// =============================================================================
// BinnedDataset
// =============================================================================

/// Binned feature matrix, feature-major (`[n_features, n_rows]`).
#[derive(Debug, Clone)]
pub struct BinnedDataset {
    mappers: Vec<BinMapper>,
    bins: Array2<u16>,
}

impl BinnedDataset {
    /// Bin a sample-major `[n_rows, n_features]` matrix.
    pub fn from_features(
        features: ArrayView2<'_, f64>,
        max_bins: usize,
        parallelism: Parallelism,
    ) -> Result<Self, DataError> {
        let (n_rows, n_features) = features.dim();
        for ((row, feature), &value) in features.indexed_iter() {
            if !value.is_finite() {
                return Err(DataError::NonFinite { feature, row });
            }
        }

        let max_bins = max_bins.clamp(2, MAX_BINS_LIMIT);
        let columns: Vec<(BinMapper, Vec<u16>)> = parallelism.maybe_par_map(0..n_features, |f| {
            let column = features.column(f).to_vec();
            let mapper = BinMapper::from_values(&column, max_bins);
            let bins = column.iter().map(|&v| mapper.bin(v)).collect();
            (mapper, bins)
        });

        let mut bins = Array2::zeros((n_features, n_rows));
        let mut mappers = Vec::with_capacity(n_features);
        for (f, (mapper, column)) in columns.into_iter().enumerate() {
            for (dst, src) in bins.row_mut(f).iter_mut().zip(column) {
                *dst = src;
            }
            mappers.push(mapper);
        }

        Ok(Self { mappers, bins })
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.bins.ncols()
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.bins.nrows()
    }

    pub fn mapper(&self, feature: usize) -> &BinMapper {
        &self.mappers[feature]
    }

    pub fn mappers(&self) -> &[BinMapper] {
        &self.mappers
    }

    /// Bin of `row` for `feature`.
    #[inline]
    pub fn bin(&self, feature: usize, row: usize) -> u16 {
        self.bins[[feature, row]]
    }

    /// All bins of one feature, indexed by row.
    #[inline]
    pub fn feature_bins(&self, feature: usize) -> ndarray::ArrayView1<'_, u16> {
        self.bins.row(feature)
    }

    /// Total number of bins over all features.
    pub fn total_bins(&self) -> usize {
        self.mappers.iter().map(BinMapper::n_bins).sum()
    }
}
