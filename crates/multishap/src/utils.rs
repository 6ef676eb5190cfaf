//! Common utilities used across the crate.
//!
//! Parallelism configuration, thread pool setup and a couple of small
//! statistical helpers shared by objectives and explainers.

use rayon::prelude::*;

// =============================================================================
// Statistical Utilities
// =============================================================================

/// Compute the weighted quantile of a slice using a step function.
///
/// No interpolation: returns the value at the point where the cumulative
/// weight first reaches `alpha * total_weight`. Returns `f64::NAN` for an
/// empty slice.
pub fn weighted_quantile(values: &[f64], weights: Option<&[f64]>, alpha: f64) -> f64 {
    let n = values.len();
    if n == 0 {
        return f64::NAN;
    }
    if n == 1 {
        return values[0];
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let total_weight: f64 = match weights {
        Some(w) => w.iter().sum(),
        None => n as f64,
    };
    let threshold = total_weight * alpha;

    let mut cumulative = 0.0;
    for &idx in &order {
        cumulative += weights.map_or(1.0, |w| w[idx]);
        if cumulative >= threshold {
            return values[idx];
        }
    }

    values[order[n - 1]]
}

/// Weighted arithmetic mean. Returns `f64::NAN` when the total weight is zero.
pub fn weighted_mean(values: &[f64], weights: Option<&[f64]>) -> f64 {
    match weights {
        Some(w) => {
            let total: f64 = w.iter().sum();
            if total == 0.0 {
                return f64::NAN;
            }
            values.iter().zip(w).map(|(v, w)| v * w).sum::<f64>() / total
        }
        None => {
            if values.is_empty() {
                return f64::NAN;
            }
            values.iter().sum::<f64>() / values.len() as f64
        }
    }
}

// =============================================================================
// Parallelism Configuration
// =============================================================================

/// Whether parallel execution is allowed.
///
/// Components receive this flag and pick rayon or sequential iteration.
/// The actual thread pool is set up at the API level via `n_threads`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parallelism {
    Sequential,
    Parallel,
}

impl Parallelism {
    /// Create from thread count semantics.
    ///
    /// - 0 = auto (parallel if rayon pool has multiple threads, sequential otherwise)
    /// - 1 = sequential
    /// - >1 = parallel
    #[inline]
    pub fn from_threads(n_threads: usize) -> Self {
        if n_threads == 1 || (n_threads == 0 && rayon::current_num_threads() == 1) {
            Parallelism::Sequential
        } else {
            Parallelism::Parallel
        }
    }

    #[inline]
    pub fn is_parallel(self) -> bool {
        matches!(self, Parallelism::Parallel)
    }

    #[inline]
    pub fn maybe_par_for_each<T, I, F>(self, iter: I, f: F)
    where
        T: Send,
        I: IntoIterator<Item = T> + IntoParallelIterator<Item = T>,
        F: Fn(T) + Sync + Send,
    {
        if self.is_parallel() {
            iter.into_par_iter().for_each(f);
        } else {
            iter.into_iter().for_each(f);
        }
    }

    /// Map over an iterator, collecting results in input order.
    #[inline]
    pub fn maybe_par_map<T, B, I, F>(self, iter: I, f: F) -> Vec<B>
    where
        T: Send,
        B: Send,
        I: IntoIterator<Item = T> + IntoParallelIterator<Item = T>,
        F: Fn(T) -> B + Sync + Send,
    {
        if self.is_parallel() {
            iter.into_par_iter().map(f).collect()
        } else {
            iter.into_iter().map(f).collect()
        }
    }

    /// Fallible map: the first error (in input order for sequential runs) wins.
    #[inline]
    pub fn maybe_par_try_map<T, B, E, I, F>(self, iter: I, f: F) -> Result<Vec<B>, E>
    where
        T: Send,
        B: Send,
        E: Send,
        I: IntoIterator<Item = T> + IntoParallelIterator<Item = T>,
        F: Fn(T) -> Result<B, E> + Sync + Send,
    {
        if self.is_parallel() {
            iter.into_par_iter().map(f).collect()
        } else {
            iter.into_iter().map(f).collect()
        }
    }
}

// =============================================================================
// Thread Pool Setup
// =============================================================================

/// Run a closure with the appropriate thread pool.
///
/// Thread count semantics:
/// - `0` = auto (use all available cores)
/// - `1` = sequential (no thread pool)
/// - `n > 1` = use exactly `n` threads
///
/// If a dedicated pool cannot be created the closure runs sequentially.
///
/// ```
/// use multishap::{run_with_threads, Parallelism};
///
/// let p = run_with_threads(1, |parallelism| parallelism);
/// assert_eq!(p, Parallelism::Sequential);
/// ```
pub fn run_with_threads<T: Send>(n_threads: usize, f: impl FnOnce(Parallelism) -> T + Send) -> T {
    match Parallelism::from_threads(n_threads) {
        Parallelism::Sequential => f(Parallelism::Sequential),
        Parallelism::Parallel => {
            match rayon::ThreadPoolBuilder::new().num_threads(n_threads).build() {
                Ok(pool) => pool.install(|| f(Parallelism::Parallel)),
                Err(err) => {
                    tracing::warn!(%err, "failed to build thread pool, running sequentially");
                    f(Parallelism::Sequential)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_weighted_quantile_empty() {
        assert!(weighted_quantile(&[], None, 0.5).is_nan());
    }

    #[test]
    fn test_weighted_quantile_unweighted_median() {
        let values = [5.0, 1.0, 3.0, 2.0, 4.0];
        assert_abs_diff_eq!(weighted_quantile(&values, None, 0.5), 3.0);
    }

    #[test]
    fn test_weighted_quantile_high_weight_pulls_quantile() {
        // Cumulative 1 < 5, then 10 >= 5
        let values = [1.0, 10.0];
        let weights = [1.0, 9.0];
        assert_abs_diff_eq!(weighted_quantile(&values, Some(&weights), 0.5), 10.0);
    }

    #[test]
    fn test_weighted_mean() {
        assert_abs_diff_eq!(weighted_mean(&[1.0, 2.0, 3.0], None), 2.0);
        assert_abs_diff_eq!(weighted_mean(&[1.0, 3.0], Some(&[3.0, 1.0])), 1.5);
        assert!(weighted_mean(&[], None).is_nan());
    }

    #[test]
    fn test_parallelism_from_threads() {
        assert_eq!(Parallelism::from_threads(1), Parallelism::Sequential);
        assert!(Parallelism::from_threads(4).is_parallel());
    }

    #[test]
    fn test_maybe_par_map_preserves_order() {
        for parallelism in [Parallelism::Sequential, Parallelism::Parallel] {
            let out = parallelism.maybe_par_map(0..100usize, |i| i * 2);
            assert_eq!(out, (0..100).map(|i| i * 2).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_maybe_par_try_map_propagates_error() {
        let out: Result<Vec<usize>, String> = Parallelism::Sequential
            .maybe_par_try_map(0..10usize, |i| if i == 3 { Err(format!("bad {i}")) } else { Ok(i) });
        assert_eq!(out.unwrap_err(), "bad 3");
    }

    #[test]
    fn test_run_with_threads_sequential() {
        let result = run_with_threads(1, |p| {
            assert_eq!(p, Parallelism::Sequential);
            42
        });
        assert_eq!(result, 42);
    }
}
