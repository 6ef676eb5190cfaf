//! Write Dataset A (two uniform covariates, two linear responses and their
//! product) to CSV.
//!
//! Usage:
//!   cargo run --bin generate_data
//!   cargo run --bin generate_data -- --seed 16 --rows 10000 --out "Multiplicative SHAP/data1.csv"

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use multishap::experiment::{GeneratorConfig, run_generator};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "generate_data", about = "Generate the additive/multiplicative toy dataset")]
struct Cli {
    /// Random seed
    #[arg(long, default_value_t = 16)]
    seed: u64,

    /// Number of rows
    #[arg(long, default_value_t = 10_000)]
    rows: usize,

    /// Output CSV (parent directory must exist)
    #[arg(long, default_value = "Multiplicative SHAP/data1.csv")]
    out: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = GeneratorConfig::builder().seed(cli.seed).n_samples(cli.rows).output(cli.out).build();

    match run_generator(&config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, path = %config.output.display(), "failed to generate data");
            ExitCode::FAILURE
        }
    }
}
