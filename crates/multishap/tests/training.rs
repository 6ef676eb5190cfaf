//! End-to-end GBDT fits on the probe dataset.

use std::num::NonZeroUsize;

use multishap::datagen::probe_dataset;
use multishap::model::{GBDTConfig, GBDTModel, RegularizationParams};

fn config(min_samples_leaf: u32) -> GBDTConfig {
    GBDTConfig::builder()
        .regularization(RegularizationParams { min_samples_leaf, ..Default::default() })
        .n_threads(NonZeroUsize::new(2).unwrap())
        .build()
        .unwrap()
}

fn variance(values: ndarray::ArrayView1<'_, f64>) -> f64 {
    let mean = values.mean().unwrap();
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}

#[test]
fn linear_response_is_fitted_well() {
    let frame = probe_dataset(15, 1000).unwrap();
    let x = frame.select(&["x1", "x2", "x3"]).unwrap();
    let y1 = frame.column("y1").unwrap();

    let model = GBDTModel::train(x.view(), y1, config(2)).unwrap();
    let fit = model.evaluate(x.view(), y1);

    assert!(fit.mse >= 0.0 && fit.mae >= 0.0);
    assert!(fit.mae * fit.mae <= fit.mse + 1e-12);
    assert!(fit.mse < 0.1 * variance(y1), "mse {} vs var {}", fit.mse, variance(y1));
    assert_eq!(model.meta().n_trees, 100);
    assert_eq!(model.meta().n_features, 3);
}

#[test]
fn smaller_leaves_do_not_fit_worse() {
    let frame = probe_dataset(15, 1000).unwrap();
    let x = frame.select(&["x1", "x2", "x3"]).unwrap();
    let y3 = frame.column("y3").unwrap();

    let loose = GBDTModel::train(x.view(), y3, config(2)).unwrap().evaluate(x.view(), y3);
    let tight = GBDTModel::train(x.view(), y3, config(100)).unwrap().evaluate(x.view(), y3);
    assert!(loose.mse <= tight.mse, "{} vs {}", loose.mse, tight.mse);
}

#[test]
fn thread_count_does_not_change_the_model() {
    let frame = probe_dataset(15, 300).unwrap();
    let x = frame.select(&["x1", "x2", "x3"]).unwrap();
    let y2 = frame.column("y2").unwrap();

    let one = GBDTModel::train(x.view(), y2, GBDTConfig { n_threads: NonZeroUsize::new(1), ..config(2) }).unwrap();
    let four = GBDTModel::train(x.view(), y2, GBDTConfig { n_threads: NonZeroUsize::new(4), ..config(2) }).unwrap();
    assert_eq!(one.predict(x.view()), four.predict(x.view()));
}

#[test]
fn target_length_must_match() {
    let frame = probe_dataset(15, 10).unwrap();
    let x = frame.select(&["x1", "x2", "x3"]).unwrap();
    let short = frame.column("y1").unwrap().slice_move(ndarray::s![..5]);
    assert!(GBDTModel::train(x.view(), short, config(2)).is_err());
}
