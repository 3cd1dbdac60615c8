//! Estimation options: optimizer settings plus the starting point.
//!
//! [`EstimationOptions`] bundles the [`MLEOptions`] every method reads and
//! the initial parameter vector shared by all methods. The default carries
//! the standard starting point `(0.5, 0.03, 60, 0.1, ln 0.1, ln 0.1)` and a
//! budget of [`DEFAULT_MAX_ITER`] iterations.
use crate::{
    fertility::core::params::StructuralParams,
    optimization::loglik_optimizer::{LineSearcher, MLEOptions, Theta, Tolerances},
};

/// Iteration cap used for every method by default.
pub const DEFAULT_MAX_ITER: usize = 100_000;

/// Default gradient-norm tolerance for L-BFGS.
pub const DEFAULT_TOL_GRAD: f64 = 1e-6;

/// Default cost tolerance (L-BFGS cost change, Nelder–Mead simplex spread,
/// Powell relative decrease).
pub const DEFAULT_TOL_COST: f64 = 1e-10;

/// Estimation-time configuration for the fertility model.
///
/// Fields
/// ------
/// - `mle_opts`: [`MLEOptions`] shared by all three methods.
/// - `initial_guess`: starting vector θ₀ in canonical order.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimationOptions {
    pub mle_opts: MLEOptions,
    pub initial_guess: Theta,
}

impl EstimationOptions {
    pub fn new(mle_opts: MLEOptions, initial_guess: Theta) -> Self {
        EstimationOptions { mle_opts, initial_guess }
    }
}

impl Default for EstimationOptions {
    fn default() -> Self {
        let tols = Tolerances {
            tol_grad: Some(DEFAULT_TOL_GRAD),
            tol_cost: Some(DEFAULT_TOL_COST),
            max_iter: Some(DEFAULT_MAX_ITER),
        };
        let mle_opts = MLEOptions {
            tols,
            line_searcher: LineSearcher::MoreThuente,
            verbose: false,
            lbfgs_mem: None,
        };
        EstimationOptions { mle_opts, initial_guess: StructuralParams::initial_guess().to_theta() }
    }
}
