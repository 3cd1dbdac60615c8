//! loglik_optimizer::builders: solver construction helpers.
//!
//! Purpose
//! -------
//! Build configured `argmin` solvers for the log-likelihood optimizer so
//! that the entry point can request "L-BFGS with More–Thuente" or "a
//! Nelder–Mead simplex around θ₀" without touching argmin's generic wiring.
//!
//! Key behaviors
//! -------------
//! - L-BFGS with either More–Thuente or Armijo backtracking line search,
//!   each capped at [`LINE_SEARCH_MAX_ITERS`] iterations, memory from
//!   `opts.lbfgs_mem` or [`DEFAULT_LBFGS_MEM`].
//! - Optional gradient and cost-change tolerances applied through
//!   [`configure_lbfgs`].
//! - Nelder–Mead with the usual adaptive-free initial simplex: each nonzero
//!   coordinate of θ₀ scaled by 5%, each zero coordinate set to
//!   [`NM_ZERO_STEP`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Builders never set `max_iters` or the L-BFGS starting point; the
//!   runners apply those.
//! - Tolerances rejected by argmin surface as [`OptError`] through
//!   `From<argmin::core::Error>`.
//!
//! [`OptError`]: crate::optimization::errors::OptError
use argmin::solver::{linesearch::MoreThuenteLineSearch, quasinewton::LBFGS};

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        line_search::{CappedLineSearch, LINE_SEARCH_MAX_ITERS, armijo_backtracking},
        traits::MLEOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, LbfgsBacktracking, LbfgsMoreThuente, NelderMeadSolver,
            Theta,
        },
    },
};

/// Relative perturbation applied to nonzero coordinates of θ₀.
pub const NM_NONZERO_SCALE: f64 = 0.05;

/// Absolute value assigned to zero coordinates of θ₀.
pub const NM_ZERO_STEP: f64 = 0.00025;

/// Construct L-BFGS with a capped More–Thuente line search.
///
/// Consults `opts.lbfgs_mem` (falling back to [`DEFAULT_LBFGS_MEM`]) and the
/// optional `tol_grad` / `tol_cost`.
///
/// # Errors
/// Any tolerance argmin rejects, converted into `OptError`.
pub fn build_optimizer_more_thuente(opts: &MLEOptions) -> OptResult<LbfgsMoreThuente> {
    let more_thuente = CappedLineSearch::new(MoreThuenteLineSearch::new(), LINE_SEARCH_MAX_ITERS);
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsMoreThuente::new(more_thuente, mem);
    configure_lbfgs(lbfgs, opts)
}

/// Construct L-BFGS with a capped Armijo backtracking line search.
///
/// Same configuration rules as [`build_optimizer_more_thuente`].
///
/// # Errors
/// Any tolerance argmin rejects, converted into `OptError`.
pub fn build_optimizer_backtracking(opts: &MLEOptions) -> OptResult<LbfgsBacktracking> {
    let backtracking = CappedLineSearch::new(armijo_backtracking()?, LINE_SEARCH_MAX_ITERS);
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsBacktracking::new(backtracking, mem);
    configure_lbfgs(lbfgs, opts)
}

/// Apply optional tolerances to an L-BFGS solver of any line-search type.
///
/// A `None` tolerance leaves argmin's default in place.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

/// Construct a Nelder–Mead solver whose simplex surrounds `theta0`.
///
/// `opts.tols.tol_cost`, when present, becomes the standard-deviation
/// tolerance on the simplex cost values.
///
/// # Errors
/// Any tolerance argmin rejects, converted into `OptError`.
pub fn build_nelder_mead(theta0: &Theta, opts: &MLEOptions) -> OptResult<NelderMeadSolver> {
    let solver = NelderMeadSolver::new(initial_simplex(theta0));
    match opts.tols.tol_cost {
        Some(tol) => Ok(solver.with_sd_tolerance(tol)?),
        None => Ok(solver),
    }
}

/// `theta0` followed by one perturbed vertex per coordinate.
pub fn initial_simplex(theta0: &Theta) -> Vec<Theta> {
    let mut simplex = Vec::with_capacity(theta0.len() + 1);
    simplex.push(theta0.clone());
    for i in 0..theta0.len() {
        let mut vertex = theta0.clone();
        vertex[i] = if vertex[i] != 0.0 {
            (1.0 + NM_NONZERO_SCALE) * vertex[i]
        } else {
            NM_ZERO_STEP
        };
        simplex.push(vertex);
    }
    simplex
}
