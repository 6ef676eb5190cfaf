//! The multiplicative probe end to end, at reduced size.

use std::num::NonZeroUsize;

use multishap::experiment::{ProbeConfig, run_probe};
use multishap::explainability::KernelConfig;
use multishap::model::{GBDTConfig, RegularizationParams};

fn config() -> ProbeConfig {
    ProbeConfig::builder()
        .n_samples(200)
        .model(GBDTConfig {
            n_trees: 40,
            n_threads: NonZeroUsize::new(2),
            regularization: RegularizationParams { min_samples_leaf: 2, ..Default::default() },
            ..Default::default()
        })
        .kernel(KernelConfig::builder().max_background(30).build())
        .build()
}

#[test]
fn probe_reports_fits_and_attributions() {
    let report = run_probe(&config()).unwrap();

    assert_eq!(report.seed, 15);
    let names: Vec<_> = report.models.iter().map(|m| m.response.as_str()).collect();
    assert_eq!(names, ["y1", "y2", "y3"]);
    for model in &report.models {
        assert!(model.fit.mse.is_finite() && model.fit.mse >= 0.0);
        for row in &model.inspected {
            let tol = 1e-9 * row.prediction.abs().max(1.0);
            assert!((row.prediction - row.reconstructed).abs() <= tol);
            assert_eq!(row.attributions.len(), 3);
        }
    }

    assert!(report.product.mse >= 0.0);
    assert_eq!(report.kernel.n_records, 200);
    assert_eq!(report.kernel.background_rows, 30);
    assert!(report.kernel.max_efficiency_gap < 1e-6);
    let e1e2 = report.models[0].expected_value * report.models[1].expected_value;
    assert_eq!(report.kernel.product_of_expected, e1e2);
    assert_eq!(report.kernel.base_value_gap, report.kernel.expected_value - e1e2);
}

#[test]
fn probe_is_deterministic() {
    let a = run_probe(&config()).unwrap();
    let b = run_probe(&config()).unwrap();
    assert_eq!(a, b);
}
