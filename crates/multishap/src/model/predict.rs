//! Batch prediction seam.
//!
//! Explainers only need "features in, one output per row out". [`Predict`]
//! captures that so a [`GBDTModel`](super::GBDTModel), a bare [`Forest`], a
//! closure wrapped in [`FnPredictor`], or a [`ProductPredictor`] of two of
//! them can all be explained the same way.

use ndarray::{Array1, ArrayView2};

use crate::repr::gbdt::Forest;
use crate::utils::Parallelism;

/// Batch prediction over a sample-major `[n_samples, n_features]` matrix.
///
/// Implementations run on the calling thread; callers parallelise across
/// batches.
pub trait Predict: Sync {
    fn predict(&self, features: ArrayView2<'_, f64>) -> Array1<f64>;

    /// Expected number of input columns, if known.
    fn n_features(&self) -> Option<usize> {
        None
    }
}

impl<P: Predict + ?Sized> Predict for &P {
    fn predict(&self, features: ArrayView2<'_, f64>) -> Array1<f64> {
        (**self).predict(features)
    }

    fn n_features(&self) -> Option<usize> {
        (**self).n_features()
    }
}

impl Predict for Forest {
    fn predict(&self, features: ArrayView2<'_, f64>) -> Array1<f64> {
        Forest::predict(self, features, Parallelism::Sequential)
    }
}

/// Adapts a closure into a [`Predict`].
///
/// ```
/// use multishap::model::{FnPredictor, Predict};
/// use ndarray::array;
///
/// let sum = FnPredictor(|x: ndarray::ArrayView2<'_, f64>| x.sum_axis(ndarray::Axis(1)));
/// assert_eq!(sum.predict(array![[1.0, 2.0]].view()), array![3.0]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FnPredictor<F>(pub F);

impl<F> Predict for FnPredictor<F>
where
    F: Fn(ArrayView2<'_, f64>) -> Array1<f64> + Sync,
{
    fn predict(&self, features: ArrayView2<'_, f64>) -> Array1<f64> {
        (self.0)(features)
    }
}

/// Elementwise product of two predictors: `f(x) = a(x) · b(x)`.
#[derive(Debug, Clone)]
pub struct ProductPredictor<A, B> {
    left: A,
    right: B,
}

impl<A: Predict, B: Predict> ProductPredictor<A, B> {
    pub fn new(left: A, right: B) -> Self {
        Self { left, right }
    }

    pub fn left(&self) -> &A {
        &self.left
    }

    pub fn right(&self) -> &B {
        &self.right
    }
}

impl<A: Predict, B: Predict> Predict for ProductPredictor<A, B> {
    fn predict(&self, features: ArrayView2<'_, f64>) -> Array1<f64> {
        self.left.predict(features) * self.right.predict(features)
    }

    fn n_features(&self) -> Option<usize> {
        self.left.n_features().or_else(|| self.right.n_features())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repr::gbdt::Tree;
    use ndarray::{Axis, array};

    #[test]
    fn product_multiplies_rowwise() {
        let a = FnPredictor(|x: ArrayView2<'_, f64>| x.column(0).to_owned());
        let b = FnPredictor(|x: ArrayView2<'_, f64>| x.sum_axis(Axis(1)));
        let product = ProductPredictor::new(a, b);

        let x = array![[2.0, 1.0], [-1.0, 4.0]];
        assert_eq!(product.predict(x.view()), array![6.0, -3.0]);
        assert_eq!(product.n_features(), None);
    }

    #[test]
    fn forest_and_references_predict_alike() {
        let mut forest = Forest::new(1.0);
        forest.push_tree(Tree::leaf(0.5));
        let x = array![[0.0], [1.0]];

        let by_ref: &dyn Predict = &forest;
        assert_eq!(by_ref.predict(x.view()), array![1.5, 1.5]);
        assert_eq!(Predict::predict(&&forest, x.view()), forest.predict(x.view(), Parallelism::Sequential));
    }
}
