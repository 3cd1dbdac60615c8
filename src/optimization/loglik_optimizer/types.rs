//! loglik_optimizer::types: shared numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Centralize the core numeric types and solver aliases used by the
//! log-likelihood optimizer, so the rest of the optimization code stays
//! agnostic to `ndarray` and Argmin generics.
//!
//! Key behaviors
//! -------------
//! - Define canonical aliases for parameter vectors, gradients,
//!   Hessians, and scalar costs (`Theta`, `Grad`, `Hessian`, `Cost`).
//! - Provide a standard map type for Argmin function-evaluation counters
//!   (`FnEvalMap`).
//! - Expose pre-wired solver aliases: L-BFGS over capped More–Thuente and
//!   capped Armijo backtracking line searches, Nelder–Mead over `Theta`,
//!   and the scalar Brent optimizer used for Powell's line minimizations.
//!
//! Invariants & assumptions
//! ------------------------
//! - All optimizer vectors and matrices are `ndarray` containers over `f64`.
//! - `Cost` is always a scalar `f64`; higher layers handle the sign flip
//!   between cost and log-likelihood.
//!
//! Conventions
//! -----------
//! - `Theta` and `Grad` have length equal to the number of free
//!   parameters (six for the fertility model).
//! - `DEFAULT_LBFGS_MEM` is the L-BFGS history size unless overridden via
//!   `MLEOptions::lbfgs_mem`.
use argmin::solver::{
    brent::BrentOpt,
    linesearch::{BacktrackingLineSearch, MoreThuenteLineSearch, condition::ArmijoCondition},
    neldermead::NelderMead,
    quasinewton::LBFGS,
};
use ndarray::{Array1, Array2};
use std::collections::HashMap;

use crate::optimization::loglik_optimizer::line_search::CappedLineSearch;

/// Parameter vector `θ` for log-likelihood optimization.
///
/// Alias for `ndarray::Array1<f64>`, used as the canonical parameter type
/// throughout the optimizer.
pub type Theta = Array1<f64>;

/// Gradient vector `∇ℓ(θ)` or `∇c(θ)` for optimization.
///
/// Alias for `ndarray::Array1<f64>`, matching the shape of `Theta`.
pub type Grad = Array1<f64>;

/// Dense Hessian matrix for second-order information.
///
/// Alias for `ndarray::Array2<f64>`; `n × n` for `n = Theta.len()`.
pub type Hessian = Array2<f64>;

/// Scalar objective value used by the optimizer.
///
/// In this crate, this is the cost `c(θ) = -ℓ(θ)` derived from a
/// log-likelihood `ℓ(θ)`.
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver.
///
/// Maps human-readable counter names (e.g., `"cost_count"`) to counts.
pub type FnEvalMap = HashMap<String, u64>;

/// Default history size (`m`) for L-BFGS runs.
pub const DEFAULT_LBFGS_MEM: usize = 7;

/// Armijo backtracking line search over this crate’s numeric types.
pub type ArmijoBacktracking = BacktrackingLineSearch<Theta, Grad, ArmijoCondition<Cost>, Cost>;

/// Iteration-capped More–Thuente line search.
pub type MoreThuenteLS = CappedLineSearch<MoreThuenteLineSearch<Theta, Grad, Cost>>;

/// Iteration-capped Armijo backtracking line search.
pub type BacktrackingLS = CappedLineSearch<ArmijoBacktracking>;

/// L-BFGS solver wired to the capped More–Thuente line search.
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;

/// L-BFGS solver wired to the capped backtracking line search.
pub type LbfgsBacktracking = LBFGS<BacktrackingLS, Theta, Grad, Cost>;

/// Nelder–Mead simplex solver over the crate’s parameter vector.
pub type NelderMeadSolver = NelderMead<Theta, Cost>;

/// Scalar Brent minimizer used for Powell line searches.
pub type BrentLine = BrentOpt<f64>;
