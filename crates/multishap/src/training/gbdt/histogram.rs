//! Gradient histograms over binned features.

use std::ops::Range;

use super::super::GradsTuple;
use crate::data::BinnedDataset;
use crate::utils::Parallelism;

/// Accumulated gradient statistics of one bin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HistogramBin {
    pub grad: f64,
    pub hess: f64,
    pub count: u32,
}

/// Histograms of every feature for one tree node, stored back to back.
#[derive(Clone, Debug)]
pub struct NodeHistogram {
    bins: Vec<HistogramBin>,
    offsets: Vec<usize>,
}

impl NodeHistogram {
    /// Zeroed histogram with `bins_per_feature[f]` bins for feature `f`.
    pub fn zeros(bins_per_feature: &[usize]) -> Self {
        let mut offsets = Vec::with_capacity(bins_per_feature.len() + 1);
        offsets.push(0);
        for &n in bins_per_feature {
            offsets.push(offsets.last().copied().unwrap_or(0) + n);
        }
        let total = offsets.last().copied().unwrap_or(0);
        Self { bins: vec![HistogramBin::default(); total], offsets }
    }

    /// Zeroed histogram shaped for `dataset`.
    pub fn for_dataset(dataset: &BinnedDataset) -> Self {
        let layout: Vec<usize> = dataset.mappers().iter().map(|m| m.n_bins()).collect();
        Self::zeros(&layout)
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.offsets.len() - 1
    }

    #[inline]
    fn range(&self, feature: usize) -> Range<usize> {
        self.offsets[feature]..self.offsets[feature + 1]
    }

    #[inline]
    pub fn feature(&self, feature: usize) -> &[HistogramBin] {
        &self.bins[self.range(feature)]
    }

    #[inline]
    pub fn feature_mut(&mut self, feature: usize) -> &mut [HistogramBin] {
        let range = self.range(feature);
        &mut self.bins[range]
    }

    /// Accumulate `rows` into the histogram. Features are filled independently.
    pub fn build(
        &mut self,
        dataset: &BinnedDataset,
        gradients: &[GradsTuple],
        rows: &[u32],
        parallelism: Parallelism,
    ) {
        let mut slices: Vec<(usize, &mut [HistogramBin])> = Vec::with_capacity(self.n_features());
        let mut rest: &mut [HistogramBin] = &mut self.bins;
        for feature in 0..self.offsets.len() - 1 {
            let len = self.offsets[feature + 1] - self.offsets[feature];
            let (head, tail) = std::mem::take(&mut rest).split_at_mut(len);
            slices.push((feature, head));
            rest = tail;
        }

        parallelism.maybe_par_for_each(slices, |(feature, hist)| {
            let bins = dataset.feature_bins(feature);
            for &row in rows {
                let row = row as usize;
                let slot = &mut hist[bins[row] as usize];
                let gh = gradients[row];
                slot.grad += gh.grad;
                slot.hess += gh.hess;
                slot.count += 1;
            }
        });
    }

    /// In-place `self = self - other`, turning a parent histogram into its
    /// sibling's given one child.
    pub fn subtract(&mut self, other: &NodeHistogram) {
        debug_assert_eq!(self.offsets, other.offsets);
        for (a, b) in self.bins.iter_mut().zip(&other.bins) {
            a.grad -= b.grad;
            a.hess -= b.hess;
            a.count -= b.count;
        }
    }
}
