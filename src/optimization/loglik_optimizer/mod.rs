//! loglik_optimizer: argmin-powered log-likelihood maximization.
//!
//! Purpose
//! -------
//! Let a model implement one trait, [`LogLikelihood`], and have it
//! maximized by any of three algorithms selected through [`Method`]:
//! L-BFGS, Powell's conjugate-direction method or a Nelder–Mead simplex.
//!
//! Key behaviors
//! -------------
//! - [`adapter::ArgMinAdapter`] turns `ℓ(θ)` into the argmin cost
//!   `c(θ) = -ℓ(θ)` and supplies finite-difference gradients when the model
//!   has none.
//! - [`maximize`] validates θ₀, builds the solver ([`builders`]) and runs
//!   it ([`run`], [`powell`]), returning a normalized [`OptimOutcome`].
//! - [`line_search`] caps every L-BFGS line search and supplies the
//!   descent step used when an L-BFGS run cannot leave its start.
//! - [`finite_diff`] provides validated numerical gradients and Hessians,
//!   which the inference layer reuses for standard errors.
//!
//! Invariants & assumptions
//! ------------------------
//! - User code implements `ℓ(θ)` and, optionally, `∇ℓ(θ)`; never the cost.
//! - Invalid inputs are reported as [`OptError`] values, not panics.
//! - [`Tolerances`] and [`MLEOptions`] are validated on construction.
//!
//! Conventions
//! -----------
//! - Parameters are raw optimizer vectors [`Theta`] (`Array1<f64>`); any
//!   mapping to named model parameters happens in the model layer.
//! - [`OptimOutcome::value`] is the log-likelihood at θ̂, not the cost.
//!
//! [`OptError`]: crate::optimization::errors::OptError

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod line_search;
pub mod powell;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, Method, OptimOutcome, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Hessian, Theta};

// ---- Optional convenience prelude for downstream crates -------------------
//
//     use fertility_mle::optimization::loglik_optimizer::prelude::*;

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{
        LineSearcher, LogLikelihood, MLEOptions, Method, OptimOutcome, Tolerances,
    };
    pub use super::types::{Cost, Grad, Theta};
}
