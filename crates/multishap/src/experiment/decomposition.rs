//! Product-rule attributions for `f = f1 · f2` built from the attributions
//! of the two factors.

use crate::explainability::{ExplainError, ShapValues};

/// Combine two attribution matrices into attributions of their product.
///
/// With `E1, E2` the base values and `S1 = Σφ1`, `S2 = Σφ2`:
///
/// ```text
/// φ3_j = E2·φ1_j + E1·φ2_j + ½(φ1_j·S2 + φ2_j·S1),   base = E1·E2
/// ```
///
/// Cross terms `φ1_j·φ2_k` are split evenly between `j` and `k`, so every row
/// sums exactly to `(E1 + S1)(E2 + S2) - E1·E2`.
///
/// # Errors
///
/// [`ExplainError::ShapeMismatch`] if the two matrices differ in shape.
pub fn product_rule_decomposition(first: &ShapValues, second: &ShapValues) -> Result<ShapValues, ExplainError> {
    let shape = (first.n_samples(), first.n_features());
    let other = (second.n_samples(), second.n_features());
    if shape != other {
        return Err(ExplainError::ShapeMismatch { expected: shape, got: other });
    }

    let (n_samples, n_features) = shape;
    let mut out = ShapValues::zeros(n_samples, n_features);
    for s in 0..n_samples {
        let (phi1, phi2) = (first.row(s), second.row(s));
        let (e1, e2) = (first.base_value(s), second.base_value(s));
        let s1: f64 = phi1.iter().sum();
        let s2: f64 = phi2.iter().sum();
        for j in 0..n_features {
            let value = e2 * phi1[j] + e1 * phi2[j] + 0.5 * (phi1[j] * s2 + phi2[j] * s1);
            out.set(s, j, value);
        }
        out.set_base_value(s, e1 * e2);
    }
    Ok(out)
}
