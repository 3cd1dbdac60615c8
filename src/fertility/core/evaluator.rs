//! Model evaluator: observed `(y, n)` plus structural parameters to
//! model-implied `(w, e+θ̂, n̂)`.
//!
//! Purpose
//! -------
//! Implement the closed-form solution of the household problem. Latent
//! productivity is backed out from income and fertility, and education and
//! fertility follow from a threshold switch on that productivity.
//!
//! Key behaviors
//! -------------
//! - `w = y / (1 − φn)`, `w_thresh = θ / (ηφ)`.
//! - Interior regime (`w > w_thresh`): `e = (ηφw − θ)/(1 − η)` and
//!   `n̂ = (1 − η)γw / ((1 + γ)(φw − θ))`.
//! - Corner regime (otherwise): `e = 0` and `n̂ = γ / (φ(1 + γ))`.
//! - [`compute_model_values`] never fails. Divisions by zero yield NaN/±∞
//!   silently, and a NaN `w` lands in the corner regime.
//! - [`try_compute_model_values`] performs the same computation and reports
//!   the first non-finite quantity as [`ModelError::NonFinitePrediction`].
//!
//! Invariants & assumptions
//! ------------------------
//! - `y.len() == n.len()`; callers pass columns of a [`FertilityData`].
//! - The two closed forms are applied verbatim on either side of
//!   `w_thresh`; no smoothing or continuity correction is applied. As
//!   `w → w_thresh⁺`, `e → 0`, and nothing downstream relies on `n̂` being
//!   continuous there.
//!
//! [`FertilityData`]: crate::fertility::core::data::FertilityData
use ndarray::{Array1, ArrayView1, Zip};

use crate::fertility::{
    core::params::StructuralParams,
    errors::{ModelError, ModelResult},
};

/// Which closed form applies to an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    /// `w > w_thresh`: positive education.
    Interior,
    /// `w ≤ w_thresh` or `w` is NaN: zero education.
    Corner,
}

impl Regime {
    pub fn classify(w: f64, w_thresh: f64) -> Regime {
        if w > w_thresh { Regime::Interior } else { Regime::Corner }
    }
}

/// Model-implied values for every observation.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelValues {
    /// Latent productivity.
    pub w: Array1<f64>,
    /// Predicted education plus fixed cost, `e + θ`.
    pub e_plus_theta: Array1<f64>,
    /// Predicted fertility.
    pub n_hat: Array1<f64>,
}

impl ModelValues {
    /// Predicted education `e = (e+θ̂) − θ`.
    pub fn education(&self, theta: f64) -> Array1<f64> {
        self.e_plus_theta.mapv(|v| v - theta)
    }

    /// Per-observation regime for diagnostics.
    pub fn regimes(&self, params: &StructuralParams) -> Vec<Regime> {
        let w_thresh = params.w_thresh();
        self.w.iter().map(|&w| Regime::classify(w, w_thresh)).collect()
    }
}

/// Evaluate the model at `params` for observed `y` and `n`.
///
/// Never fails; non-finite results are returned as they arise.
pub fn compute_model_values(
    y: ArrayView1<f64>, n: ArrayView1<f64>, params: &StructuralParams,
) -> ModelValues {
    let StructuralParams { eta, phi, theta, gamma, .. } = *params;
    let w_thresh = params.w_thresh();
    let corner_n = gamma / (phi * (1.0 + gamma));

    let w = Zip::from(&y).and(&n).map_collect(|&y_i, &n_i| y_i / (1.0 - phi * n_i));
    let mut e_plus_theta = Array1::<f64>::zeros(w.len());
    let mut n_hat = Array1::<f64>::zeros(w.len());
    Zip::from(&w).and(&mut e_plus_theta).and(&mut n_hat).for_each(|&w_i, ept, nh| {
        match Regime::classify(w_i, w_thresh) {
            Regime::Interior => {
                *ept = (eta * phi * w_i - theta) / (1.0 - eta) + theta;
                *nh = (1.0 - eta) * gamma * w_i / ((1.0 + gamma) * (phi * w_i - theta));
            }
            Regime::Corner => {
                *ept = theta;
                *nh = corner_n;
            }
        }
    });
    ModelValues { w, e_plus_theta, n_hat }
}

/// Evaluate the model and reject any non-finite prediction.
///
/// # Errors
/// [`ModelError::NonFinitePrediction`] naming the first offending quantity
/// (`"w"`, `"e_plus_theta"` or `"n_hat"`) in observation order.
pub fn try_compute_model_values(
    y: ArrayView1<f64>, n: ArrayView1<f64>, params: &StructuralParams,
) -> ModelResult<ModelValues> {
    let values = compute_model_values(y, n, params);
    for index in 0..values.w.len() {
        let checks = [
            ("w", values.w[index]),
            ("e_plus_theta", values.e_plus_theta[index]),
            ("n_hat", values.n_hat[index]),
        ];
        if let Some(&(quantity, value)) = checks.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ModelError::NonFinitePrediction { index, quantity, value });
        }
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Both closed forms and the regime switch.
    // - Behavior at and just above the threshold.
    // - Silent non-finite output vs. the fallible variant.
    // -------------------------------------------------------------------------

    fn params(eta: f64, phi: f64, theta: f64, gamma: f64) -> StructuralParams {
        StructuralParams::new(eta, phi, theta, gamma, 0.0, 0.0)
    }

    #[test]
    // Purpose
    // -------
    // The interior branch matches the closed forms for a hand-computed
    // point.
    //
    // Given
    // -----
    // - η = 0.5, φ = 0.03, θ = 60, γ = 0.1; y = 9400, n = 2 so w = 10000
    //   (w_thresh = 4000).
    //
    // Expect
    // ------
    // - e = (0.5·0.03·10000 − 60)/0.5 = 180, e+θ = 240.
    // - n̂ = 0.5·0.1·10000 / (1.1·240) = 500/264.
    fn interior_branch_matches_closed_form() {
        // Arrange
        let p = params(0.5, 0.03, 60.0, 0.1);

        // Act
        let values = compute_model_values(array![9400.0].view(), array![2.0].view(), &p);

        // Assert
        assert_relative_eq!(values.w[0], 10_000.0, max_relative = 1e-12);
        assert_relative_eq!(values.e_plus_theta[0], 240.0, max_relative = 1e-12);
        assert_relative_eq!(values.n_hat[0], 500.0 / 264.0, max_relative = 1e-12);
        assert_eq!(values.regimes(&p), vec![Regime::Interior]);
        assert_relative_eq!(values.education(p.theta)[0], 180.0, max_relative = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Every observation below the threshold gets the corner values.
    //
    // Given
    // -----
    // - w_thresh = 4000 and observations with w = 1000, 3000 and 3999.9
    //   (n = 0 so w = y).
    //
    // Expect
    // ------
    // - e = 0 exactly (e+θ = θ) and n̂ = γ/(φ(1+γ)) for every element.
    fn corner_branch_applies_below_threshold() {
        let p = params(0.5, 0.03, 60.0, 0.1);
        let y = array![1000.0, 3000.0, 3999.9];
        let n = Array1::<f64>::zeros(3);

        let values = compute_model_values(y.view(), n.view(), &p);

        let corner_n = 0.1 / (0.03 * 1.1);
        for i in 0..3 {
            assert_eq!(values.e_plus_theta[i], 60.0);
            assert_eq!(values.education(60.0)[i], 0.0);
            assert_eq!(values.n_hat[i], corner_n);
        }
        assert!(values.regimes(&p).iter().all(|r| *r == Regime::Corner));
    }

    #[test]
    // Purpose
    // -------
    // Just above the threshold education vanishes while n̂ stays finite.
    //
    // Given
    // -----
    // - w = 4000·(1 + 1e-9) with w_thresh = 4000.
    //
    // Expect
    // ------
    // - Interior regime, e ≈ 0 and a finite n̂ (its value is not compared
    //   with the corner branch).
    fn threshold_limit_sends_education_to_zero() {
        let p = params(0.5, 0.03, 60.0, 0.1);
        let w = 4000.0 * (1.0 + 1e-9);

        let values = compute_model_values(array![w].view(), array![0.0].view(), &p);

        assert_eq!(values.regimes(&p), vec![Regime::Interior]);
        assert!(values.education(p.theta)[0].abs() < 1e-5);
        assert!(values.n_hat[0].is_finite());
    }

    #[test]
    // Purpose
    // -------
    // Division by zero is silent in `compute_model_values` and reported by
    // `try_compute_model_values`.
    //
    // Given
    // -----
    // - φ = 0.25 and n = 4 so that 1 − φn = 0 (w = +∞).
    //
    // Expect
    // ------
    // - `compute_model_values` returns without panicking with w = +∞.
    // - `try_compute_model_values` fails with `NonFinitePrediction` at
    //   index 1 for quantity `"w"`.
    fn non_finite_predictions_are_silent_or_reported() {
        let p = params(0.5, 0.25, 60.0, 0.1);
        let y = array![1000.0, 1000.0];
        let n = array![1.0, 4.0];

        let silent = compute_model_values(y.view(), n.view(), &p);
        let reported = try_compute_model_values(y.view(), n.view(), &p);

        assert!(silent.w[1].is_infinite());
        assert!(matches!(
            reported,
            Err(ModelError::NonFinitePrediction { index: 1, quantity: "w", .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // A NaN productivity takes the corner branch.
    //
    // Given
    // -----
    // - y = NaN.
    //
    // Expect
    // ------
    // - `Regime::Corner`, e+θ = θ and the corner n̂.
    fn nan_productivity_takes_corner_branch() {
        let p = params(0.5, 0.03, 60.0, 0.1);

        let values = compute_model_values(array![f64::NAN].view(), array![1.0].view(), &p);

        assert_eq!(Regime::classify(f64::NAN, p.w_thresh()), Regime::Corner);
        assert_eq!(values.e_plus_theta[0], 60.0);
        assert_eq!(values.n_hat[0], 0.1 / (0.03 * 1.1));
    }
}
