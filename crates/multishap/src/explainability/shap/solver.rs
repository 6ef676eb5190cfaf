//! Weighted least squares through the normal equations.

/// Pivots below this (relative to the largest diagonal entry) count as singular.
const SINGULAR_EPS: f64 = 1e-12;

/// Accumulates `XᵀWX` and `XᵀWy` one observation at a time, then solves
/// `(XᵀWX) β = XᵀWy` by Gaussian elimination with partial pivoting.
#[derive(Debug, Clone)]
pub(crate) struct WeightedLeastSquares {
    n: usize,
    xtwx: Vec<f64>,
    xtwy: Vec<f64>,
}

impl WeightedLeastSquares {
    pub fn new(n: usize) -> Self {
        Self { n, xtwx: vec![0.0; n * n], xtwy: vec![0.0; n] }
    }

    /// Add one observation `y ≈ x·β` with weight `w`.
    pub fn add(&mut self, x: &[f64], y: f64, w: f64) {
        debug_assert_eq!(x.len(), self.n);
        for i in 0..self.n {
            let wxi = w * x[i];
            if wxi == 0.0 {
                continue;
            }
            self.xtwy[i] += wxi * y;
            let row = &mut self.xtwx[i * self.n..(i + 1) * self.n];
            for (a, &xj) in row.iter_mut().zip(x) {
                *a += wxi * xj;
            }
        }
    }

    /// Solve for `β`. `None` if the system is singular.
    pub fn solve(mut self) -> Option<Vec<f64>> {
        let n = self.n;
        let a = &mut self.xtwx;
        let b = &mut self.xtwy;
        let scale = (0..n).map(|i| a[i * n + i].abs()).fold(0.0, f64::max);
        if n > 0 && scale == 0.0 {
            return None;
        }

        for col in 0..n {
            let pivot = (col..n)
                .max_by(|&r, &s| a[r * n + col].abs().total_cmp(&a[s * n + col].abs()))
                .unwrap_or(col);
            if a[pivot * n + col].abs() <= SINGULAR_EPS * scale {
                return None;
            }
            if pivot != col {
                for j in 0..n {
                    a.swap(col * n + j, pivot * n + j);
                }
                b.swap(col, pivot);
            }

            let diag = a[col * n + col];
            for r in col + 1..n {
                let factor = a[r * n + col] / diag;
                if factor == 0.0 {
                    continue;
                }
                for j in col..n {
                    a[r * n + j] -= factor * a[col * n + j];
                }
                b[r] -= factor * b[col];
            }
        }

        let mut beta = vec![0.0; n];
        for i in (0..n).rev() {
            let tail: f64 = (i + 1..n).map(|j| a[i * n + j] * beta[j]).sum();
            beta[i] = (b[i] - tail) / a[i * n + i];
        }
        Some(beta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn recovers_exact_linear_fit() {
        // y = 2a - 3b
        let mut wls = WeightedLeastSquares::new(2);
        for (a, b, w) in [(1.0, 0.0, 1.0), (0.0, 1.0, 2.0), (1.0, 1.0, 0.5), (2.0, -1.0, 3.0)] {
            wls.add(&[a, b], 2.0 * a - 3.0 * b, w);
        }
        let beta = wls.solve().unwrap();
        assert_abs_diff_eq!(beta[0], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(beta[1], -3.0, epsilon = 1e-12);
    }

    #[test]
    fn weights_pull_towards_heavy_observations() {
        let mut wls = WeightedLeastSquares::new(1);
        wls.add(&[1.0], 0.0, 1.0);
        wls.add(&[1.0], 10.0, 9.0);
        assert_abs_diff_eq!(wls.solve().unwrap()[0], 9.0, epsilon = 1e-12);
    }

    #[test]
    fn pivoting_handles_zero_leading_entry() {
        let mut wls = WeightedLeastSquares::new(2);
        wls.add(&[0.0, 1.0], 1.0, 1.0);
        wls.add(&[1.0, 0.0], 4.0, 1.0);
        let beta = wls.solve().unwrap();
        assert_abs_diff_eq!(beta[0], 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(beta[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn collinear_columns_are_singular() {
        let mut wls = WeightedLeastSquares::new(2);
        wls.add(&[1.0, 1.0], 1.0, 1.0);
        wls.add(&[2.0, 2.0], 2.0, 1.0);
        assert!(wls.solve().is_none());

        assert!(WeightedLeastSquares::new(1).solve().is_none());
    }
}
