//! Generated datasets and their CSV form.

use approx::assert_abs_diff_eq;
use multishap::data::{read_csv, write_csv};
use multishap::datagen::{additive_dataset, probe_dataset};
use multishap::experiment::{GeneratorConfig, run_generator};

#[test]
fn generator_output_reads_back_as_dataset_a() {
    let dir = tempfile::tempdir().unwrap();
    let config = GeneratorConfig::builder()
        .n_samples(200)
        .output(dir.path().join("data1.csv"))
        .build();
    run_generator(&config).unwrap();

    let read = read_csv(&config.output).unwrap();
    let expected = additive_dataset(16, 200).unwrap();
    assert_eq!(read.column_names(), expected.column_names());
    assert_eq!(read.n_rows(), 200);
    for (a, b) in read.values().iter().zip(expected.values().iter()) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-12);
    }
}

#[test]
fn csv_header_has_unnamed_index() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("probe.csv");
    write_csv(&probe_dataset(15, 3).unwrap(), &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some(",x1,x2,x3,y1,y2,y3"));
    assert!(lines.next().unwrap().starts_with("0,"));
    assert_eq!(text.lines().count(), 4);
}

#[test]
fn regenerating_overwrites_with_identical_content() {
    let dir = tempfile::tempdir().unwrap();
    let config = GeneratorConfig::builder()
        .n_samples(50)
        .output(dir.path().join("data1.csv"))
        .build();
    run_generator(&config).unwrap();
    let first = std::fs::read(&config.output).unwrap();
    run_generator(&config).unwrap();
    assert_eq!(first, std::fs::read(&config.output).unwrap());
}

#[test]
fn missing_output_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = GeneratorConfig::builder()
        .n_samples(5)
        .output(dir.path().join("absent").join("data1.csv"))
        .build();
    assert!(run_generator(&config).is_err());
}

#[test]
fn probe_responses_follow_their_formulas() {
    let frame = probe_dataset(15, 500).unwrap();
    let col = |name| frame.column(name).unwrap();
    let (x1, x2, x3) = (col("x1"), col("x2"), col("x3"));

    for i in 0..frame.n_rows() {
        assert!((-10.0..10.0).contains(&x1[i]));
        assert!((0.0..20.0).contains(&x2[i]));
        assert!((-5.0..-1.0).contains(&x3[i]));

        let y1 = x1[i] + x2[i] + x3[i];
        let y2 = 2.0 * x1[i] + 2.0 * x2[i] + 4.0 * x3[i];
        assert_abs_diff_eq!(col("y1")[i], y1, epsilon = 1e-12);
        assert_abs_diff_eq!(col("y2")[i], y2, epsilon = 1e-12);
        assert_eq!(col("y3")[i], col("y1")[i] * col("y2")[i]);
    }
}
