//! Nested parameter groups for GBDT configuration.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::training::GainParams;

/// Regularization and split constraints.
///
/// ```
/// use multishap::model::RegularizationParams;
///
/// let params = RegularizationParams { min_samples_leaf: 2, ..Default::default() };
/// assert_eq!(params.lambda, 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegularizationParams {
    /// L2 regularization on leaf weights. Default: 0.0.
    pub lambda: f64,
    /// L1 regularization on leaf weights. Default: 0.0.
    pub alpha: f64,
    /// Minimum hessian sum per child. Default: 0.0.
    pub min_child_weight: f64,
    /// Minimum gain required to split. Default: 0.0.
    pub min_gain: f64,
    /// Minimum samples per leaf. Default: 1.
    pub min_samples_leaf: u32,
}

impl Default for RegularizationParams {
    fn default() -> Self {
        Self {
            lambda: 0.0,
            alpha: 0.0,
            min_child_weight: 0.0,
            min_gain: 0.0,
            min_samples_leaf: 1,
        }
    }
}

impl RegularizationParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("lambda", self.lambda),
            ("alpha", self.alpha),
            ("min_child_weight", self.min_child_weight),
            ("min_gain", self.min_gain),
        ] {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(ConfigError::InvalidRegularization { field, value });
            }
        }
        if self.min_samples_leaf == 0 {
            return Err(ConfigError::InvalidMinSamplesLeaf);
        }
        Ok(())
    }

    pub(crate) fn to_gain_params(&self) -> GainParams {
        GainParams {
            reg_lambda: self.lambda,
            reg_alpha: self.alpha,
            min_gain: self.min_gain,
            min_child_weight: self.min_child_weight,
            min_samples_leaf: self.min_samples_leaf,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_and_nan_values_are_rejected() {
        let params = RegularizationParams { lambda: -1.0, ..Default::default() };
        assert!(matches!(
            params.validate(),
            Err(ConfigError::InvalidRegularization { field: "lambda", .. })
        ));

        let params = RegularizationParams { min_gain: f64::NAN, ..Default::default() };
        assert!(matches!(
            params.validate(),
            Err(ConfigError::InvalidRegularization { field: "min_gain", .. })
        ));
    }

    #[test]
    fn gain_params_carry_every_field() {
        let params = RegularizationParams {
            lambda: 1.0,
            alpha: 0.5,
            min_child_weight: 2.0,
            min_gain: 0.1,
            min_samples_leaf: 3,
        };
        let gain = params.to_gain_params();
        assert_eq!(gain.reg_lambda, 1.0);
        assert_eq!(gain.reg_alpha, 0.5);
        assert_eq!(gain.min_child_weight, 2.0);
        assert_eq!(gain.min_gain, 0.1);
        assert_eq!(gain.min_samples_leaf, 3);
    }
}
