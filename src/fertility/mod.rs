//! fertility: structural fertility / education / productivity model.
//!
//! Purpose
//! -------
//! Estimate the household model in which latent productivity `w` is backed
//! out from income `y` and fertility `n`, and education and fertility follow
//! a threshold-switching closed form in `w`. Parameters are fitted by
//! maximum likelihood under Gaussian residuals and the fit is scored with
//! AIC, BIC, R² and RMSE.
//!
//! Key behaviors
//! -------------
//! - [`core`] holds the observation container, the structural parameters,
//!   the evaluator and estimation options.
//! - [`models`] holds the likelihood, [`FertilityModel`] and the
//!   multi-method comparison.
//! - [`scoring`] computes goodness-of-fit metrics; [`report`] renders them
//!   as text.
//! - [`errors`] defines [`ModelError`] / [`ModelResult`].
//!
//! Conventions
//! -----------
//! - The optimizer vector is `(η, φ, θ, γ, log σ_n, log σ_e)` with no
//!   transformation; feasibility is enforced by the objective's penalty.
//! - Indices in errors are 0-based observation positions.

pub mod core;
pub mod errors;
pub mod models;
pub mod report;
pub mod scoring;

pub use self::errors::{ModelError, ModelResult};
pub use self::models::FertilityModel;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use fertility_mle::fertility::prelude::*;
//
// to import the main model surface in a single line.

pub mod prelude {
    pub use super::core::{
        data::FertilityData, options::EstimationOptions, params::StructuralParams,
    };
    pub use super::errors::{ModelError, ModelResult};
    pub use super::models::{FertilityModel, MethodComparison, compare_methods};
    pub use super::scoring::{FitMetrics, evaluate_model};
    pub use crate::optimization::loglik_optimizer::Method;
}
