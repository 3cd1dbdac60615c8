//! Fertility model: maximum-likelihood fitting and post-fit accessors.
//!
//! [`FertilityModel`] implements [`LogLikelihood`] with
//! `ℓ(θ) = −neg_log_likelihood(θ)`, so every optimizer minimizes exactly the
//! penalized objective. No analytic gradient is provided; L-BFGS falls back
//! to finite differences of the cost.
//!
//! After [`FertilityModel::fit`] the model caches the optimizer outcome and
//! the fitted [`StructuralParams`], from which it can predict, score and
//! compute standard errors.
use ndarray::Array1;

use crate::{
    fertility::{
        core::{
            data::FertilityData,
            evaluator::{ModelValues, try_compute_model_values},
            options::EstimationOptions,
            params::{N_PARAMS, StructuralParams},
        },
        errors::{ModelError, ModelResult},
        models::likelihood::neg_log_likelihood,
        scoring::{FitMetrics, evaluate_model},
    },
    inference::calc_standard_errors_from_cost,
    optimization::{
        errors::{OptError, OptResult},
        loglik_optimizer::{
            Cost, LogLikelihood, Method, OptimOutcome, Theta, maximize,
        },
    },
};

/// Fertility / education / productivity model estimated by MLE.
///
/// Fields
/// ------
/// - `options`: optimizer settings and the default starting point.
/// - `results`: last optimizer outcome (populated by `fit`).
/// - `fitted_params`: named view of `results.theta_hat` (populated by `fit`).
#[derive(Debug, Clone, PartialEq)]
pub struct FertilityModel {
    pub options: EstimationOptions,
    pub results: Option<OptimOutcome>,
    pub fitted_params: Option<StructuralParams>,
}

impl FertilityModel {
    pub fn new(options: EstimationOptions) -> FertilityModel {
        FertilityModel { options, results: None, fitted_params: None }
    }

    /// Fit the model with `method` starting from `theta0` and cache results.
    ///
    /// ## Steps
    /// 1. Validate `theta0` (length six, finite entries).
    /// 2. Run `method` under `options.mle_opts`, moving `theta0` into the
    ///    solver.
    /// 3. Store the outcome in `self.results` and its named view in
    ///    `self.fitted_params`.
    ///
    /// ## Errors
    /// - `OptError::Model(ParamLengthMismatch)` or `InvalidThetaInput` for a
    ///   bad starting point.
    /// - Any solver or outcome-validation error from [`maximize`].
    ///
    /// On error the previously cached results are left untouched.
    pub fn fit(&mut self, method: Method, theta0: Theta, data: &FertilityData) -> OptResult<()> {
        let outcome = maximize(self, method, theta0, data, &self.options.mle_opts)?;
        let params = StructuralParams::from_theta(outcome.theta_hat.view())?;
        self.results = Some(outcome);
        self.fitted_params = Some(params);
        Ok(())
    }

    /// Fitted parameters, or `ModelNotFitted`.
    pub fn fitted(&self) -> ModelResult<&StructuralParams> {
        self.fitted_params.as_ref().ok_or(ModelError::ModelNotFitted)
    }

    /// Model-implied `(w, e+θ̂, n̂)` on `data` at the fitted parameters.
    pub fn predict(&self, data: &FertilityData) -> ModelResult<ModelValues> {
        try_compute_model_values(data.y.view(), data.n.view(), self.fitted()?)
    }

    /// Goodness-of-fit metrics on `data` at the fitted parameters.
    pub fn evaluate(&self, data: &FertilityData) -> ModelResult<FitMetrics> {
        evaluate_model(self.fitted()?, data)
    }

    /// Classical standard errors of `θ̂` in canonical parameter order.
    ///
    /// The observed information is the finite-difference Jacobian of the
    /// finite-difference gradient of the penalized objective.
    ///
    /// ## Errors
    /// - `OptError::Model(ModelNotFitted)` before `fit`.
    /// - The first finite-difference gradient failure, when one occurs.
    /// - `InvalidHessian` when the information matrix is otherwise not
    ///   finite.
    pub fn standard_errors(&self, data: &FertilityData) -> OptResult<Array1<f64>> {
        let theta_hat = &self.results.as_ref().ok_or(ModelError::ModelNotFitted)?.theta_hat;
        let cost = |theta: &Theta| neg_log_likelihood(theta, data);
        calc_standard_errors_from_cost(&cost, theta_hat)
    }
}

impl LogLikelihood for FertilityModel {
    type Data = FertilityData;

    /// `ℓ(θ) = −neg_log_likelihood(θ)`; never fails, infeasible vectors map
    /// to `−1e10`.
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost> {
        Ok(-neg_log_likelihood(theta, data))
    }

    /// Reject vectors whose length is not six or that contain non-finite
    /// entries.
    fn check(&self, theta: &Theta, _data: &Self::Data) -> OptResult<()> {
        if theta.len() != N_PARAMS {
            return Err(
                ModelError::ParamLengthMismatch { expected: N_PARAMS, actual: theta.len() }.into()
            );
        }
        if let Some((index, &value)) = theta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(OptError::InvalidThetaInput { index, value });
        }
        Ok(())
    }
}
