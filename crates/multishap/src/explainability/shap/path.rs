//! Path bookkeeping for TreeSHAP (Lundberg et al. 2020, Algorithm 2).
//!
//! A path holds one element per unique feature split on the way from the
//! root to the current node. `pweight` tracks, for every subset size, the
//! proportion of permutations that reach this point.

/// One unique feature on the current root-to-node path.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct PathElement {
    /// `None` for the synthetic root element.
    pub feature: Option<usize>,
    /// Fraction of paths flowing through when the feature is absent.
    pub zero_fraction: f64,
    /// Fraction of paths flowing through when the feature is present (0 or 1).
    pub one_fraction: f64,
    pub pweight: f64,
}

/// EXTEND: append a feature at position `unique_depth` and update weights.
pub(crate) fn extend(
    path: &mut [PathElement],
    unique_depth: usize,
    zero_fraction: f64,
    one_fraction: f64,
    feature: Option<usize>,
) {
    path[unique_depth] = PathElement {
        feature,
        zero_fraction,
        one_fraction,
        pweight: if unique_depth == 0 { 1.0 } else { 0.0 },
    };
    let denom = (unique_depth + 1) as f64;
    for i in (0..unique_depth).rev() {
        path[i + 1].pweight += one_fraction * path[i].pweight * (i + 1) as f64 / denom;
        path[i].pweight = zero_fraction * path[i].pweight * (unique_depth - i) as f64 / denom;
    }
}

/// UNWIND: remove the element at `path_index`, inverting [`extend`].
pub(crate) fn unwind(path: &mut [PathElement], unique_depth: usize, path_index: usize) {
    let PathElement { one_fraction, zero_fraction, .. } = path[path_index];
    let denom = (unique_depth + 1) as f64;
    let mut next_one_portion = path[unique_depth].pweight;

    for i in (0..unique_depth).rev() {
        if one_fraction != 0.0 {
            let tmp = path[i].pweight;
            path[i].pweight = next_one_portion * denom / ((i + 1) as f64 * one_fraction);
            next_one_portion = tmp - path[i].pweight * zero_fraction * (unique_depth - i) as f64 / denom;
        } else {
            path[i].pweight = path[i].pweight * denom / (zero_fraction * (unique_depth - i) as f64);
        }
    }

    for i in path_index..unique_depth {
        path[i].feature = path[i + 1].feature;
        path[i].zero_fraction = path[i + 1].zero_fraction;
        path[i].one_fraction = path[i + 1].one_fraction;
    }
}

/// UNWOUND_SUM: total permutation weight of the path with `path_index`
/// removed, without modifying it.
pub(crate) fn unwound_sum(path: &[PathElement], unique_depth: usize, path_index: usize) -> f64 {
    let PathElement { one_fraction, zero_fraction, .. } = path[path_index];
    let denom = (unique_depth + 1) as f64;
    let mut next_one_portion = path[unique_depth].pweight;
    let mut total = 0.0;

    for i in (0..unique_depth).rev() {
        if one_fraction != 0.0 {
            let tmp = next_one_portion * denom / ((i + 1) as f64 * one_fraction);
            total += tmp;
            next_one_portion = path[i].pweight - tmp * zero_fraction * (unique_depth - i) as f64 / denom;
        } else if zero_fraction != 0.0 {
            total += path[i].pweight / zero_fraction / ((unique_depth - i) as f64 / denom);
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn root_path() -> Vec<PathElement> {
        let mut path = vec![PathElement::default(); 8];
        extend(&mut path, 0, 1.0, 1.0, None);
        path
    }

    #[test]
    fn extend_then_unwind_restores_weights() {
        let mut path = root_path();
        extend(&mut path, 1, 0.3, 1.0, Some(0));
        let before = path[..2].to_vec();

        extend(&mut path, 2, 0.6, 0.0, Some(1));
        unwind(&mut path, 2, 2);

        for (a, b) in before.iter().zip(&path[..2]) {
            assert_eq!(a.feature, b.feature);
            assert_abs_diff_eq!(a.pweight, b.pweight, epsilon = 1e-12);
        }
    }

    #[test]
    fn single_split_contribution() {
        // One split, hot side holds 30% of the cover, sample follows it.
        let mut path = root_path();
        extend(&mut path, 1, 0.3, 1.0, Some(0));
        // phi = w * (one - zero) * leaf; for a single feature w = 1.
        let w = unwound_sum(&path, 1, 1);
        assert_abs_diff_eq!(w, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn unwound_sum_matches_unwind_total() {
        let mut path = root_path();
        extend(&mut path, 1, 0.4, 1.0, Some(0));
        extend(&mut path, 2, 0.7, 0.0, Some(1));
        extend(&mut path, 3, 0.5, 1.0, Some(2));

        let expected = unwound_sum(&path, 3, 2);
        let mut copy = path.clone();
        unwind(&mut copy, 3, 2);
        let total: f64 = copy[..3].iter().map(|e| e.pweight).sum();
        assert_abs_diff_eq!(expected, total, epsilon = 1e-12);
    }
}
