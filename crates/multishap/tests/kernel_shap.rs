//! Kernel SHAP on closures and on the product of two fitted models.

use std::num::NonZeroUsize;

use approx::assert_abs_diff_eq;
use ndarray::{Array1, ArrayView2, Axis};

use multishap::datagen::probe_dataset;
use multishap::explainability::{KernelConfig, KernelExplainer, TreeExplainer};
use multishap::experiment::product_rule_decomposition;
use multishap::model::{FnPredictor, GBDTConfig, GBDTModel, Predict, ProductPredictor};

fn linear(x: ArrayView2<'_, f64>) -> Array1<f64> {
    x.rows().into_iter().map(|r| 2.0 * r[0] - r[1] + 0.5 * r[2]).collect()
}

#[test]
fn additive_model_recovers_centred_coefficients() {
    let frame = probe_dataset(15, 150).unwrap();
    let x = frame.select(&["x1", "x2", "x3"]).unwrap();
    let config = KernelConfig::builder().max_background(30).seed(7).build();
    let explainer = KernelExplainer::new(FnPredictor(linear), x.view(), config).unwrap();

    let bg_mean = explainer.background().mean_axis(Axis(0)).unwrap();
    let shap = explainer.shap_values(x.view()).unwrap();
    assert_eq!((shap.n_samples(), shap.n_features()), (150, 3));
    for (s, row) in x.rows().into_iter().enumerate() {
        for (f, coef) in [2.0, -1.0, 0.5].into_iter().enumerate() {
            assert_abs_diff_eq!(shap.get(s, f), coef * (row[f] - bg_mean[f]), epsilon = 1e-8);
        }
    }
}

#[test]
fn product_of_models_is_explained_efficiently() {
    let frame = probe_dataset(15, 200).unwrap();
    let x = frame.select(&["x1", "x2", "x3"]).unwrap();
    let config = GBDTConfig { n_trees: 30, n_threads: NonZeroUsize::new(1), ..Default::default() };
    let m1 = GBDTModel::train(x.view(), frame.column("y1").unwrap(), config.clone()).unwrap();
    let m2 = GBDTModel::train(x.view(), frame.column("y2").unwrap(), config).unwrap();

    let product = ProductPredictor::new(&m1, &m2);
    let expected_predictions = &m1.predict(x.view()) * &m2.predict(x.view());
    assert_eq!(product.predict(x.view()), expected_predictions);

    let kernel = KernelConfig::builder().max_background(25).build();
    let explainer = KernelExplainer::new(product, x.view(), kernel).unwrap();
    let shap = explainer.shap_values(x.view()).unwrap();

    assert_eq!(explainer.background().nrows(), 25);
    assert!(shap.verify(expected_predictions.as_slice().unwrap(), 1e-8));
    for s in 0..shap.n_samples() {
        assert_eq!(shap.base_value(s), explainer.expected_value());
    }

    // The product-rule matrix explains the same product with the tree base values.
    let t1 = TreeExplainer::new(m1.forest()).unwrap();
    let t2 = TreeExplainer::new(m2.forest()).unwrap();
    let decomposition = product_rule_decomposition(
        &t1.shap_values(x.view()).unwrap(),
        &t2.shap_values(x.view()).unwrap(),
    )
    .unwrap();
    assert_abs_diff_eq!(
        decomposition.base_value(0),
        t1.expected_value() * t2.expected_value(),
        epsilon = 1e-9
    );
    assert!(decomposition.verify(expected_predictions.as_slice().unwrap(), 1e-8));
}

#[test]
fn same_seed_gives_identical_attributions() {
    let frame = probe_dataset(15, 60).unwrap();
    let x = frame.select(&["x1", "x2", "x3"]).unwrap();
    let square = FnPredictor(|x: ArrayView2<'_, f64>| linear(x).mapv(|v| v * v));
    let config = KernelConfig::builder().max_background(10).seed(3).build();

    let a = KernelExplainer::new(&square, x.view(), config.clone()).unwrap();
    let b = KernelExplainer::new(&square, x.view(), config).unwrap();
    assert_eq!(a.background(), b.background());
    assert_eq!(a.shap_values(x.view()).unwrap(), b.shap_values(x.view()).unwrap());
}
