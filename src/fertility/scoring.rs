//! scoring: goodness-of-fit metrics for a fitted parameter vector.
//!
//! Purpose
//! -------
//! Recompute predictions and residuals at given parameters and summarize the
//! fit with the log-likelihood, information criteria, R² and RMSE for both
//! targets (fertility `n` and education plus fixed cost `e+θ`).
//!
//! Key behaviors
//! -------------
//! - [`evaluate_model`] is a pure forward computation with no feasibility
//!   check and no penalty: it reports the raw log-likelihood `ℓ`.
//! - `AIC = 2k − 2ℓ` and `BIC = k ln(n_obs) − 2ℓ` with `k = N_FREE_PARAMS`.
//! - [`r2_score`] follows the finite scikit-learn convention for a constant
//!   target: 1 when the fit is perfect, 0 otherwise.
//!
//! Invariants & assumptions
//! ------------------------
//! - `observed` and `predicted` slices passed to [`r2_score`] and [`rmse`]
//!   have equal length.
//!
//! Conventions
//! -----------
//! - Non-finite predictions are reported as
//!   [`ModelError::NonFinitePrediction`](crate::fertility::errors::ModelError::NonFinitePrediction)
//!   rather than propagated as NaN metrics.
use ndarray::ArrayView1;
use statrs::statistics::Statistics;

use crate::fertility::{
    core::{data::FertilityData, evaluator::try_compute_model_values, params::StructuralParams},
    errors::ModelResult,
    models::likelihood::gaussian_loglik,
};

/// Number of estimated parameters counted by the information criteria.
pub const N_FREE_PARAMS: usize = 6;

/// Goodness-of-fit summary at one parameter vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitMetrics {
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
    pub r2_n: f64,
    pub r2_e_plus_theta: f64,
    pub rmse_n: f64,
    pub rmse_e_plus_theta: f64,
}

/// Akaike information criterion `2k − 2ℓ`.
pub fn aic(log_likelihood: f64, k: usize) -> f64 {
    2.0 * k as f64 - 2.0 * log_likelihood
}

/// Bayesian information criterion `k ln(n_obs) − 2ℓ`.
pub fn bic(log_likelihood: f64, k: usize, n_obs: usize) -> f64 {
    k as f64 * (n_obs as f64).ln() - 2.0 * log_likelihood
}

/// Coefficient of determination `1 − SS_res / SS_tot`.
///
/// A constant `observed` gives 1 if `predicted` matches it exactly and 0
/// otherwise.
pub fn r2_score(observed: ArrayView1<f64>, predicted: ArrayView1<f64>) -> f64 {
    let mean = observed.iter().mean();
    let ss_res: f64 = observed.iter().zip(predicted.iter()).map(|(o, p)| (o - p).powi(2)).sum();
    let ss_tot: f64 = observed.iter().map(|o| (o - mean).powi(2)).sum();
    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

/// Root mean squared error.
pub fn rmse(observed: ArrayView1<f64>, predicted: ArrayView1<f64>) -> f64 {
    let sq: Vec<f64> = observed.iter().zip(predicted.iter()).map(|(o, p)| (o - p).powi(2)).collect();
    sq.mean().sqrt()
}

/// Evaluate the fit of `params` on `data`.
///
/// # Errors
/// `ModelError::NonFinitePrediction` if the model produces a non-finite
/// `w`, `e+θ̂` or `n̂` for any observation.
pub fn evaluate_model(params: &StructuralParams, data: &FertilityData) -> ModelResult<FitMetrics> {
    let values = try_compute_model_values(data.y.view(), data.n.view(), params)?;
    let res_n = &data.n - &values.n_hat;
    let res_e = &data.e_plus_theta - &values.e_plus_theta;
    let log_likelihood = gaussian_loglik(res_n.view(), params.log_sigma_n)
        + gaussian_loglik(res_e.view(), params.log_sigma_e);

    Ok(FitMetrics {
        log_likelihood,
        aic: aic(log_likelihood, N_FREE_PARAMS),
        bic: bic(log_likelihood, N_FREE_PARAMS, data.len()),
        r2_n: r2_score(data.n.view(), values.n_hat.view()),
        r2_e_plus_theta: r2_score(data.e_plus_theta.view(), values.e_plus_theta.view()),
        rmse_n: rmse(data.n.view(), values.n_hat.view()),
        rmse_e_plus_theta: rmse(data.e_plus_theta.view(), values.e_plus_theta.view()),
    })
}
