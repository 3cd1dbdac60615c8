//! models: the fertility likelihood, model fitting and method comparison.
//!
//! Purpose
//! -------
//! Sit on top of `fertility::core` and wire the closed-form evaluator to the
//! generic log-likelihood optimizer.
//!
//! Key behaviors
//! -------------
//! - [`likelihood`] defines the Gaussian log-likelihood and the penalized
//!   objective [`neg_log_likelihood`] that all methods minimize.
//! - [`estimation`] exposes [`FertilityModel`], which implements
//!   [`LogLikelihood`](crate::optimization::loglik_optimizer::LogLikelihood)
//!   and provides `fit`, `predict`, `evaluate` and `standard_errors`.
//! - [`comparison`] runs several methods on the same data via
//!   [`compare_methods`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Optimizer vectors have length six in the order
//!   `(η, φ, θ, γ, log σ_n, log σ_e)`; `FertilityModel::check` enforces the
//!   length and finiteness before any solver runs.
//! - Inside the objective, infeasible or unevaluable vectors cost `1e10`;
//!   they never surface as errors.
//!
//! Downstream usage
//! ----------------
//! - Build an [`EstimationOptions`](crate::fertility::core::options::EstimationOptions),
//!   construct `FertilityModel::new(options)`, then call
//!   `fit(method, theta0, &data)`.
//! - Use [`compare_methods`] with [`Method::ALL`](crate::optimization::loglik_optimizer::Method::ALL)
//!   for the robustness check.

pub mod comparison;
pub mod estimation;
pub mod likelihood;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::comparison::{MethodComparison, MethodFit, compare_methods};
pub use self::estimation::FertilityModel;
pub use self::likelihood::{INFEASIBLE_PENALTY, log_likelihood, neg_log_likelihood};
