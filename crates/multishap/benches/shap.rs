//! Explainer throughput: TreeSHAP per record and Kernel SHAP on the product
//! of two forests.

use std::hint::black_box;
use std::num::NonZeroUsize;
use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use multishap::datagen::probe_dataset;
use multishap::explainability::{KernelConfig, KernelExplainer, TreeExplainer};
use multishap::model::{GBDTConfig, GBDTModel, ProductPredictor};
use multishap::{Parallelism, Predict};

fn criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .warm_up_time(Duration::from_secs(1))
        .measurement_time(Duration::from_secs(5))
        .sample_size(10)
}

fn fit(response: &str, n_trees: u32) -> (GBDTModel, ndarray::Array2<f64>) {
    let frame = probe_dataset(15, 1000).unwrap();
    let x = frame.select(&["x1", "x2", "x3"]).unwrap();
    let config = GBDTConfig { n_trees, n_threads: NonZeroUsize::new(1), ..Default::default() };
    let model = GBDTModel::train(x.view(), frame.column(response).unwrap(), config).unwrap();
    (model, x)
}

fn bench_tree_shap(c: &mut Criterion) {
    let mut group = c.benchmark_group("shap/tree");

    for n_trees in [10u32, 100] {
        let (model, x) = fit("y1", n_trees);
        let explainer = TreeExplainer::new(model.forest()).unwrap();
        let batch = x.slice(ndarray::s![..256, ..]);

        group.throughput(Throughput::Elements(batch.nrows() as u64));
        group.bench_with_input(BenchmarkId::new("trees", n_trees), &batch, |b, batch| {
            b.iter(|| {
                let shap = explainer.shap_values_with(black_box(batch.view()), Parallelism::Sequential);
                black_box(shap)
            });
        });
    }

    group.finish();
}

fn bench_kernel_shap(c: &mut Criterion) {
    let (m1, x) = fit("y1", 50);
    let (m2, _) = fit("y2", 50);
    let predictor = ProductPredictor::new(&m1, &m2);
    let batch = x.slice(ndarray::s![..32, ..]);

    let mut group = c.benchmark_group("shap/kernel");
    for background in [10usize, 100] {
        let config = KernelConfig::builder().max_background(background).build();
        let explainer = KernelExplainer::new(&predictor, x.view(), config).unwrap();

        group.throughput(Throughput::Elements(batch.nrows() as u64));
        group.bench_with_input(BenchmarkId::new("background", background), &batch, |b, batch| {
            b.iter(|| {
                let shap = explainer.shap_values_with(black_box(batch.view()), Parallelism::Sequential);
                black_box(shap)
            });
        });
    }
    group.finish();

    let single = x.slice(ndarray::s![..1, ..]);
    c.bench_function("shap/kernel/predict_product_row", |b| {
        b.iter(|| black_box(predictor.predict(black_box(single))))
    });
}

criterion_group! {
    name = benches;
    config = criterion();
    targets = bench_tree_shap, bench_kernel_shap
}
criterion_main!(benches);
