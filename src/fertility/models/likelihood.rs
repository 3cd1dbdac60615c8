//! Gaussian log-likelihood of the fertility model and its penalized
//! negative, the objective every optimizer minimizes.
//!
//! Purpose
//! -------
//! Score a parameter vector by how well the model-implied fertility `n̂` and
//! education `e+θ̂` match the observations, assuming independent Gaussian
//! residuals with standard deviations `σ_n = exp(log σ_n)` and
//! `σ_e = exp(log σ_e)`.
//!
//! Key behaviors
//! -------------
//! - [`log_likelihood`] is the fallible building block used by scoring:
//!   `ℓ = −½ Σ [ln(2πσ_n²) + r_n²/σ_n²] − ½ Σ [ln(2πσ_e²) + r_e²/σ_e²]`.
//! - [`neg_log_likelihood`] never fails. Infeasible `η, φ, θ, γ` and every
//!   evaluation failure (wrong vector length, non-finite predictions,
//!   non-finite `ℓ`) return [`INFEASIBLE_PENALTY`]; otherwise it returns `−ℓ`.
//!
//! Invariants & assumptions
//! ------------------------
//! - The penalty is a constant, so the objective is flat outside the
//!   feasible region; derivative-free methods simply reject such points and
//!   L-BFGS sees a zero finite-difference slope there.
use ndarray::ArrayView1;
use std::f64::consts::PI;

use crate::{
    fertility::{
        core::{data::FertilityData, evaluator::try_compute_model_values, params::StructuralParams},
        errors::ModelResult,
    },
    optimization::loglik_optimizer::Theta,
};

/// Objective value for infeasible or unevaluable parameter vectors.
pub const INFEASIBLE_PENALTY: f64 = 1e10;

/// Gaussian log-density summed over `residuals` with `σ = exp(log_sigma)`.
pub fn gaussian_loglik(residuals: ArrayView1<f64>, log_sigma: f64) -> f64 {
    let sigma = log_sigma.exp();
    let var = sigma * sigma;
    let log_norm = (2.0 * PI * var).ln();
    -0.5 * residuals.iter().map(|r| log_norm + r * r / var).sum::<f64>()
}

/// Log-likelihood `ℓ` of `data` at `params`.
///
/// Feasibility is not checked here.
///
/// # Errors
/// [`ModelError::NonFinitePrediction`](crate::fertility::errors::ModelError::NonFinitePrediction)
/// if the model produces a non-finite `w`, `e+θ̂` or `n̂`.
pub fn log_likelihood(params: &StructuralParams, data: &FertilityData) -> ModelResult<f64> {
    let values = try_compute_model_values(data.y.view(), data.n.view(), params)?;
    let res_n = &data.n - &values.n_hat;
    let res_e = &data.e_plus_theta - &values.e_plus_theta;
    Ok(gaussian_loglik(res_n.view(), params.log_sigma_n)
        + gaussian_loglik(res_e.view(), params.log_sigma_e))
}

/// Penalized negative log-likelihood; the objective minimized by every
/// method.
///
/// Returns [`INFEASIBLE_PENALTY`] when `theta` has the wrong length, when
/// `η, φ, θ, γ` leave their open domains (NaN included), or when the
/// evaluation fails or yields a non-finite `ℓ`.
pub fn neg_log_likelihood(theta: &Theta, data: &FertilityData) -> f64 {
    let params = match StructuralParams::from_theta(theta.view()) {
        Ok(params) => params,
        Err(_) => return INFEASIBLE_PENALTY,
    };
    if !params.is_feasible() {
        return INFEASIBLE_PENALTY;
    }
    match log_likelihood(&params, data) {
        Ok(ll) if ll.is_finite() => -ll,
        _ => INFEASIBLE_PENALTY,
    }
}
