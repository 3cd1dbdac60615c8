//! Structural parameters of the fertility model.
//!
//! The optimizer works on a raw six-vector
//! `θ = (η, φ, θ_e, γ, log σ_n, log σ_e)`; [`StructuralParams`] is the named
//! view of the same numbers. No transformation is applied between the two:
//! the domain `0 < η < 1`, `0 < φ < 1`, `θ_e > 0`, `γ > 0` is enforced by
//! the objective's penalty, not by a reparameterization.
use ndarray::{Array1, ArrayView1};

use crate::fertility::errors::{ModelError, ModelResult};

/// Number of entries in the optimizer vector.
pub const N_PARAMS: usize = 6;

/// Display names in canonical order.
pub const PARAM_NAMES: [&str; N_PARAMS] =
    ["eta", "phi", "theta", "gamma", "log_sigma_n", "log_sigma_e"];

/// Standard starting point `(0.5, 0.03, 60, 0.1, ln 0.1, ln 0.1)`.
pub const INITIAL_ETA: f64 = 0.5;
pub const INITIAL_PHI: f64 = 0.03;
pub const INITIAL_THETA: f64 = 60.0;
pub const INITIAL_GAMMA: f64 = 0.1;
pub const INITIAL_SIGMA: f64 = 0.1;

/// Named structural parameters.
///
/// Fields
/// ------
/// - `eta` (η): education share, in (0, 1).
/// - `phi` (φ): time cost per child, in (0, 1).
/// - `theta` (θ): fixed education cost, > 0.
/// - `gamma` (γ): preference weight on children, > 0.
/// - `log_sigma_n`, `log_sigma_e`: log standard deviations of the fertility
///   and education residuals; unconstrained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StructuralParams {
    pub eta: f64,
    pub phi: f64,
    pub theta: f64,
    pub gamma: f64,
    pub log_sigma_n: f64,
    pub log_sigma_e: f64,
}

impl StructuralParams {
    pub fn new(
        eta: f64, phi: f64, theta: f64, gamma: f64, log_sigma_n: f64, log_sigma_e: f64,
    ) -> Self {
        StructuralParams { eta, phi, theta, gamma, log_sigma_n, log_sigma_e }
    }

    /// Read the named parameters from an optimizer vector.
    ///
    /// # Errors
    /// [`ModelError::ParamLengthMismatch`] unless `theta.len() == N_PARAMS`.
    pub fn from_theta(theta: ArrayView1<f64>) -> ModelResult<Self> {
        if theta.len() != N_PARAMS {
            return Err(ModelError::ParamLengthMismatch {
                expected: N_PARAMS,
                actual: theta.len(),
            });
        }
        Ok(StructuralParams::new(theta[0], theta[1], theta[2], theta[3], theta[4], theta[5]))
    }

    /// Optimizer vector in canonical order.
    pub fn to_theta(&self) -> Array1<f64> {
        Array1::from(vec![
            self.eta,
            self.phi,
            self.theta,
            self.gamma,
            self.log_sigma_n,
            self.log_sigma_e,
        ])
    }

    /// `true` iff η, φ, θ and γ lie in their open domains. NaN is infeasible.
    pub fn is_feasible(&self) -> bool {
        self.eta > 0.0
            && self.eta < 1.0
            && self.phi > 0.0
            && self.phi < 1.0
            && self.theta > 0.0
            && self.gamma > 0.0
    }

    pub fn sigma_n(&self) -> f64 {
        self.log_sigma_n.exp()
    }

    pub fn sigma_e(&self) -> f64 {
        self.log_sigma_e.exp()
    }

    /// Productivity threshold `θ / (ηφ)` above which education is positive.
    pub fn w_thresh(&self) -> f64 {
        self.theta / (self.eta * self.phi)
    }

    /// The standard starting point.
    pub fn initial_guess() -> Self {
        StructuralParams::new(
            INITIAL_ETA,
            INITIAL_PHI,
            INITIAL_THETA,
            INITIAL_GAMMA,
            INITIAL_SIGMA.ln(),
            INITIAL_SIGMA.ln(),
        )
    }
}

impl Default for StructuralParams {
    fn default() -> Self {
        StructuralParams::initial_guess()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // `from_theta` and `to_theta` agree on the canonical order, and bad
    // lengths are rejected.
    //
    // Given
    // -----
    // - θ = (0.4, 0.02, 50, 0.2, -1, -2) and a five-entry vector.
    //
    // Expect
    // ------
    // - Named fields in order, `to_theta` reproducing θ, and
    //   `ParamLengthMismatch { expected: 6, actual: 5 }`.
    fn theta_mapping_uses_canonical_order() {
        let theta = array![0.4, 0.02, 50.0, 0.2, -1.0, -2.0];

        let params = StructuralParams::from_theta(theta.view()).expect("six entries");
        let short = StructuralParams::from_theta(array![0.4, 0.02, 50.0, 0.2, -1.0].view());

        assert_eq!(params.eta, 0.4);
        assert_eq!(params.phi, 0.02);
        assert_eq!(params.theta, 50.0);
        assert_eq!(params.gamma, 0.2);
        assert_eq!(params.to_theta(), theta);
        assert_eq!(short, Err(ModelError::ParamLengthMismatch { expected: 6, actual: 5 }));
    }

    #[test]
    // Purpose
    // -------
    // Feasibility uses open domains and treats NaN as infeasible.
    //
    // Given
    // -----
    // - The initial guess, then copies with η = 1, φ = 0, θ = -1, γ = NaN.
    //
    // Expect
    // ------
    // - Only the initial guess is feasible.
    fn feasibility_uses_open_domains() {
        let base = StructuralParams::initial_guess();

        assert!(base.is_feasible());
        assert!(!StructuralParams { eta: 1.0, ..base }.is_feasible());
        assert!(!StructuralParams { phi: 0.0, ..base }.is_feasible());
        assert!(!StructuralParams { theta: -1.0, ..base }.is_feasible());
        assert!(!StructuralParams { gamma: f64::NAN, ..base }.is_feasible());
    }

    #[test]
    // Purpose
    // -------
    // Derived quantities of the initial guess.
    //
    // Given
    // -----
    // - η = 0.5, φ = 0.03, θ = 60, log σ = ln 0.1.
    //
    // Expect
    // ------
    // - w_thresh = 4000 and σ_n = σ_e = 0.1.
    fn initial_guess_derived_quantities() {
        let p = StructuralParams::default();

        assert!((p.w_thresh() - 4000.0).abs() < 1e-9);
        assert!((p.sigma_n() - 0.1).abs() < 1e-15);
        assert!((p.sigma_e() - 0.1).abs() < 1e-15);
    }
}
