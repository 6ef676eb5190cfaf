//! Training progress reporting.

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// How much the trainer reports.
///
/// Levels are ordered: a logger at `Info` also emits warnings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Verbosity {
    #[default]
    Silent,
    Warning,
    Info,
    Debug,
}

/// Emits training progress through `tracing`, gated by [`Verbosity`].
#[derive(Debug)]
pub struct TrainingLogger {
    verbosity: Verbosity,
    started: Option<Instant>,
}

impl TrainingLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity, started: None }
    }

    #[inline]
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Whether per-round metrics should be computed at all.
    #[inline]
    pub fn wants_rounds(&self) -> bool {
        self.verbosity >= Verbosity::Debug
    }

    pub fn start_training(&mut self, n_rounds: u32, n_rows: usize, n_features: usize) {
        self.started = Some(Instant::now());
        if self.verbosity >= Verbosity::Info {
            tracing::info!(n_rounds, n_rows, n_features, "training started");
        }
    }

    pub fn log_round(&self, round: u32, metric: &str, value: f64) {
        if self.wants_rounds() {
            tracing::debug!(round, metric, value, "round finished");
        }
    }

    pub fn warn(&self, message: &str) {
        if self.verbosity >= Verbosity::Warning {
            tracing::warn!("{message}");
        }
    }

    pub fn finish_training(&self, n_trees: usize) {
        if self.verbosity >= Verbosity::Info {
            let elapsed_ms = self.started.map_or(0, |s| s.elapsed().as_millis() as u64);
            tracing::info!(n_trees, elapsed_ms, "training finished");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_is_ordered() {
        assert!(Verbosity::Silent < Verbosity::Warning);
        assert!(Verbosity::Info < Verbosity::Debug);
        assert_eq!(Verbosity::default(), Verbosity::Silent);
    }

    #[test]
    fn only_debug_wants_rounds() {
        assert!(!TrainingLogger::new(Verbosity::Info).wants_rounds());
        assert!(TrainingLogger::new(Verbosity::Debug).wants_rounds());
    }
}
