//! Gradient storage for boosting rounds.

/// Gradient and hessian of the loss for one sample.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GradsTuple {
    pub grad: f64,
    pub hess: f64,
}

/// Per-sample gradients for one boosting round.
#[derive(Debug, Clone, Default)]
pub struct Gradients {
    pairs: Vec<GradsTuple>,
}

impl Gradients {
    pub fn new(n_rows: usize) -> Self {
        Self { pairs: vec![GradsTuple::default(); n_rows] }
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.pairs.len()
    }

    #[inline]
    pub fn as_slice(&self) -> &[GradsTuple] {
        &self.pairs
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [GradsTuple] {
        &mut self.pairs
    }

    /// `(Σ grad, Σ hess)` over all rows.
    pub fn sum(&self) -> (f64, f64) {
        self.pairs
            .iter()
            .fold((0.0, 0.0), |(g, h), p| (g + p.grad, h + p.hess))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_accumulates_pairs() {
        let mut grads = Gradients::new(3);
        for (i, p) in grads.as_mut_slice().iter_mut().enumerate() {
            p.grad = i as f64;
            p.hess = 1.0;
        }
        assert_eq!(grads.sum(), (3.0, 3.0));
        assert_eq!(grads.n_rows(), 3);
    }
}
