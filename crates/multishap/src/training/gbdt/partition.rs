//! Row partitioning: which training rows sit in which tree node.

use std::ops::Range;

use ndarray::ArrayView1;

/// Rows grouped by node as contiguous ranges of one index buffer.
///
/// Splitting a node reorders its range in place (left rows first, stable)
/// and registers two new ranges.
#[derive(Debug, Clone, Default)]
pub struct RowPartitioner {
    indices: Vec<u32>,
    ranges: Vec<Range<usize>>,
    scratch: Vec<u32>,
}

impl RowPartitioner {
    pub fn new() -> Self {
        Self::default()
    }

    /// One partition (id 0) holding rows `0..n_rows`.
    pub fn reset(&mut self, n_rows: usize) {
        self.indices.clear();
        self.indices.extend(0..n_rows as u32);
        self.ranges.clear();
        self.ranges.push(0..n_rows);
    }

    #[inline]
    pub fn rows(&self, partition: usize) -> &[u32] {
        &self.indices[self.ranges[partition].clone()]
    }

    /// Split a partition by bin: rows with `bins[row] <= split_bin` go left.
    ///
    /// Returns the ids of the new `(left, right)` partitions.
    pub fn split(&mut self, partition: usize, bins: ArrayView1<'_, u16>, split_bin: u16) -> (usize, usize) {
        let range = self.ranges[partition].clone();
        let slice = &mut self.indices[range.clone()];

        self.scratch.clear();
        let mut n_left = 0;
        for i in 0..slice.len() {
            let row = slice[i];
            if bins[row as usize] <= split_bin {
                slice[n_left] = row;
                n_left += 1;
            } else {
                self.scratch.push(row);
            }
        }
        slice[n_left..].copy_from_slice(&self.scratch);

        let left = self.ranges.len();
        self.ranges.push(range.start..range.start + n_left);
        self.ranges.push(range.start + n_left..range.end);
        (left, left + 1)
    }

    /// Add `value` to the prediction of every row in `partition`.
    pub fn add_to_predictions(&self, partition: usize, value: f64, predictions: &mut [f64]) {
        for &row in self.rows(partition) {
            predictions[row as usize] += value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn split_is_stable() {
        let bins = array![3u16, 0, 2, 1, 0];
        let mut p = RowPartitioner::new();
        p.reset(5);
        let (l, r) = p.split(0, bins.view(), 1);
        assert_eq!(p.rows(l), &[1, 3, 4]);
        assert_eq!(p.rows(r), &[0, 2]);

        let (ll, lr) = p.split(l, bins.view(), 0);
        assert_eq!(p.rows(ll), &[1, 4]);
        assert_eq!(p.rows(lr), &[3]);
        // Untouched sibling keeps its rows.
        assert_eq!(p.rows(r), &[0, 2]);
    }

    #[test]
    fn add_to_predictions_touches_only_partition_rows() {
        let bins = array![0u16, 1, 0, 1];
        let mut p = RowPartitioner::new();
        p.reset(4);
        let (_, r) = p.split(0, bins.view(), 0);
        let mut preds = vec![0.0; 4];
        p.add_to_predictions(r, 2.5, &mut preds);
        assert_eq!(preds, vec![0.0, 2.5, 0.0, 2.5]);
    }
}
