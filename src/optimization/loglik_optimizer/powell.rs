//! loglik_optimizer::powell: Powell's conjugate-direction method.
//!
//! Purpose
//! -------
//! Derivative-free minimization of the cost `c(θ) = -ℓ(θ)` exposed by
//! [`ArgMinAdapter`]. argmin ships no Powell solver, so the outer sweep
//! lives here while every one-dimensional minimization is delegated to
//! argmin's Brent optimizer.
//!
//! Key behaviors
//! -------------
//! - The direction set starts as the coordinate axes.
//! - Each sweep line-minimizes along every direction in turn and records
//!   the direction with the largest single decrease.
//! - A sweep that improves the cost by less than
//!   `ftol · (|c_start| + |c_end|) / 2` (plus a tiny absolute floor) ends
//!   the run as converged.
//! - Otherwise the extrapolated point `2x − x_start` is tested; when the
//!   classic criterion holds, the net sweep displacement is line-minimized
//!   and replaces the direction of largest decrease.
//! - Line minimizations bracket the minimum by golden-ratio expansion from
//!   `(0, 1)` and refine it with [`BrentLine`]. A step is only taken if it
//!   lowers the cost.
//!
//! Invariants & assumptions
//! ------------------------
//! - The cost never increases from one accepted point to the next.
//! - `max_iter` caps the number of sweeps.
//! - `fn_evals["cost_count"]` counts every cost evaluation, including the
//!   ones made inside Brent.
use std::cell::Cell;

use argmin::core::{CostFunction, Error, Executor, State, TerminationReason, TerminationStatus};
use ndarray::Array1;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        FnEvalMap, LogLikelihood, MLEOptions, OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        types::BrentLine,
    },
};

/// Relative function tolerance used when `opts.tols.tol_cost` is `None`.
pub const DEFAULT_POWELL_FTOL: f64 = 1e-4;

/// Sweep cap used when `opts.tols.max_iter` is `None`, per parameter.
pub const DEFAULT_SWEEPS_PER_PARAM: usize = 1000;

/// Golden-ratio growth factor for bracket expansion.
const GOLDEN: f64 = 1.618_033_988_749_895;

/// Upper bound on bracket expansions per line search.
const MAX_BRACKET_STEPS: usize = 50;

/// Iteration cap for a single Brent refinement.
const MAX_BRENT_ITERS: u64 = 500;

/// Absolute floor in the sweep stopping rule.
const TINY: f64 = 1e-20;

/// Minimize the adapter's cost from `theta0` with Powell's method.
///
/// # Errors
/// - Cost evaluation errors from the adapter.
/// - argmin errors raised by the Brent line searches.
/// - Validation errors from [`OptimOutcome::new`].
pub fn run_powell<F: LogLikelihood>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'_, F>,
) -> OptResult<OptimOutcome> {
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        crate::optimization::loglik_optimizer::run::log_initial_state(&theta0, &problem)?;
    }
    let dim = theta0.len();
    let ftol = opts.tols.tol_cost.unwrap_or(DEFAULT_POWELL_FTOL);
    let max_sweeps = opts.tols.max_iter.unwrap_or(dim * DEFAULT_SWEEPS_PER_PARAM) as u64;
    let evals = Cell::new(0_u64);

    let mut directions: Vec<Theta> = (0..dim)
        .map(|i| {
            let mut axis = Array1::zeros(dim);
            axis[i] = 1.0;
            axis
        })
        .collect();
    let mut x = theta0;
    let mut fval = counted_cost(&problem, &x, &evals)?;
    let mut sweeps = 0_u64;
    let status = loop {
        if sweeps >= max_sweeps {
            break TerminationStatus::Terminated(TerminationReason::MaxItersReached);
        }
        sweeps += 1;

        let fx = fval;
        let x_start = x.clone();
        let mut big_ind = 0;
        let mut delta = 0.0;
        for (i, direction) in directions.iter().enumerate() {
            let before = fval;
            let (alpha, f_new) = line_minimize(&problem, &x, direction, fval, &evals)?;
            if alpha != 0.0 {
                x = &x + &(direction * alpha);
                fval = f_new;
            }
            if before - fval > delta {
                delta = before - fval;
                big_ind = i;
            }
        }

        #[cfg(feature = "obs_slog")]
        if opts.verbose {
            eprintln!("powell sweep {sweeps}: cost = {fval:.6}");
        }

        if 2.0 * (fx - fval) <= ftol * (fx.abs() + fval.abs()) + TINY {
            break TerminationStatus::Terminated(TerminationReason::SolverConverged);
        }

        let displacement = &x - &x_start;
        let extrapolated = &x + &displacement;
        let fx2 = counted_cost(&problem, &extrapolated, &evals)?;
        if fx > fx2 {
            let t = 2.0 * (fx + fx2 - 2.0 * fval) * (fx - fval - delta).powi(2)
                - delta * (fx - fx2).powi(2);
            if t < 0.0 {
                let (alpha, f_new) = line_minimize(&problem, &x, &displacement, fval, &evals)?;
                if alpha != 0.0 {
                    x = &x + &(&displacement * alpha);
                    fval = f_new;
                    directions[big_ind] = directions[dim - 1].clone();
                    directions[dim - 1] = &displacement * alpha;
                }
            }
        }
    };

    let mut fn_evals = FnEvalMap::new();
    fn_evals.insert("cost_count".to_string(), evals.get());
    OptimOutcome::new(Some(x), -fval, status, sweeps, fn_evals, None)
}

// ---- Line search ----

/// Cost along the ray `origin + α · direction`, counting evaluations.
struct LineProblem<'p, 'a, F: LogLikelihood> {
    problem: &'p ArgMinAdapter<'a, F>,
    origin: &'p Theta,
    direction: &'p Theta,
    evals: &'p Cell<u64>,
}

impl<F: LogLikelihood> LineProblem<'_, '_, F> {
    fn at(&self, alpha: f64) -> Result<f64, Error> {
        let point = self.origin + &(self.direction * alpha);
        counted_cost(self.problem, &point, self.evals)
    }
}

impl<F: LogLikelihood> CostFunction for LineProblem<'_, '_, F> {
    type Param = f64;
    type Output = f64;

    fn cost(&self, alpha: &Self::Param) -> Result<Self::Output, Error> {
        self.at(*alpha)
    }
}

fn counted_cost<F: LogLikelihood>(
    problem: &ArgMinAdapter<'_, F>, theta: &Theta, evals: &Cell<u64>,
) -> Result<f64, Error> {
    evals.set(evals.get() + 1);
    problem.cost(theta)
}

/// Minimize along `direction` from `origin`, where `f0` is the cost at
/// `origin`. Returns the accepted step and its cost, or `(0, f0)` when no
/// lower point was found.
fn line_minimize<F: LogLikelihood>(
    problem: &ArgMinAdapter<'_, F>, origin: &Theta, direction: &Theta, f0: f64,
    evals: &Cell<u64>,
) -> Result<(f64, f64), Error> {
    if direction.iter().all(|&d| d == 0.0) {
        return Ok((0.0, f0));
    }
    let line = LineProblem { problem, origin, direction, evals };
    let (lo, hi, best_alpha, best_cost) = bracket(&line, f0)?;

    let brent = BrentLine::new(lo, hi);
    let result = Executor::new(line, brent)
        .configure(|state| state.max_iters(MAX_BRENT_ITERS))
        .run()?;
    let state = result.state();
    let (mut alpha, mut cost) = (best_alpha, best_cost);
    if let Some(&brent_alpha) = state.get_best_param() {
        if state.get_best_cost() < cost {
            alpha = brent_alpha;
            cost = state.get_best_cost();
        }
    }

    if cost < f0 { Ok((alpha, cost)) } else { Ok((0.0, f0)) }
}

/// Golden-ratio expansion until the middle point is lowest.
///
/// Returns the interval `(lo, hi)` together with the lowest point seen.
fn bracket<F: LogLikelihood>(
    line: &LineProblem<'_, '_, F>, f0: f64,
) -> Result<(f64, f64, f64, f64), Error> {
    let f1 = line.at(1.0)?;
    let (mut a, mut b, mut fb) = if f1 > f0 { (1.0, 0.0, f0) } else { (0.0, 1.0, f1) };
    let mut c = b + GOLDEN * (b - a);
    let mut fc = line.at(c)?;
    let mut steps = 0;
    while fc < fb && steps < MAX_BRACKET_STEPS {
        a = b;
        b = c;
        fb = fc;
        c = b + GOLDEN * (b - a);
        fc = line.at(c)?;
        steps += 1;
    }
    let (best_alpha, best_cost) = if fc < fb { (c, fc) } else { (b, fb) };
    Ok((a.min(c), a.max(c), best_alpha, best_cost))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{
        errors::OptResult,
        loglik_optimizer::traits::{LineSearcher, Tolerances},
    };
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Convergence of Powell on smooth quadratic bowls, including a
    //   correlated one where the coordinate axes are not conjugate.
    // - The sweep cap and evaluation counting.
    // - Bracketing in the negative direction.
    // -------------------------------------------------------------------------

    /// ℓ(θ) = -(θ - c)ᵀ A (θ - c) - 1 with A = [[3, 1], [1, 2]].
    struct CorrelatedBowl;

    impl LogLikelihood for CorrelatedBowl {
        type Data = Theta;

        fn value(&self, theta: &Theta, data: &Theta) -> OptResult<f64> {
            let d = theta - data;
            Ok(-(3.0 * d[0] * d[0] + 2.0 * d[0] * d[1] + 2.0 * d[1] * d[1]) - 1.0)
        }

        fn check(&self, _theta: &Theta, _data: &Theta) -> OptResult<()> {
            Ok(())
        }
    }

    fn opts(tol_cost: f64, max_iter: usize) -> MLEOptions {
        let tols = Tolerances::new(None, Some(tol_cost), Some(max_iter)).expect("valid tolerances");
        MLEOptions::new(tols, LineSearcher::MoreThuente, false, None).expect("valid options")
    }

    #[test]
    // Purpose
    // -------
    // Powell reaches the minimum of a correlated quadratic.
    //
    // Given
    // -----
    // - The correlated bowl centred at c = (1, -2), started at (0, 0).
    //
    // Expect
    // ------
    // - Converged outcome with θ̂ ≈ c and ℓ(θ̂) ≈ -1.
    fn powell_minimizes_correlated_quadratic() {
        // Arrange
        let centre = array![1.0, -2.0];
        let problem = ArgMinAdapter::new(&CorrelatedBowl, &centre);

        // Act
        let out = run_powell(array![0.0, 0.0], &opts(1e-10, 200), problem).expect("powell run");

        // Assert
        assert!(out.converged);
        assert!((out.theta_hat[0] - 1.0).abs() < 1e-3, "theta_hat = {:?}", out.theta_hat);
        assert!((out.theta_hat[1] + 2.0).abs() < 1e-3, "theta_hat = {:?}", out.theta_hat);
        assert!((out.value + 1.0).abs() < 1e-6);
        assert!(out.cost_evals() > 0);
    }

    #[test]
    // Purpose
    // -------
    // The sweep cap is honored and reported as `MaxItersReached`.
    //
    // Given
    // -----
    // - The correlated bowl with `max_iter = 1` and a tolerance no single
    //   sweep can meet from far away.
    //
    // Expect
    // ------
    // - Exactly one sweep, a status mentioning `MaxItersReached`, and a
    //   cost lower than at θ₀.
    fn powell_respects_sweep_cap() {
        let centre = array![10.0, -20.0];
        let problem = ArgMinAdapter::new(&CorrelatedBowl, &centre);
        let start_value = CorrelatedBowl.value(&array![0.0, 0.0], &centre).expect("value");

        let out = run_powell(array![0.0, 0.0], &opts(1e-14, 1), problem).expect("powell run");

        assert_eq!(out.iterations, 1);
        assert!(out.status.contains("MaxItersReached"), "status = {}", out.status);
        assert!(out.value > start_value);
    }

    #[test]
    // Purpose
    // -------
    // Bracketing searches the negative direction when α = 1 is uphill.
    //
    // Given
    // -----
    // - A 1-D bowl centred at -3, line origin 0, direction +1.
    //
    // Expect
    // ------
    // - `line_minimize` returns α ≈ -3 with cost ≈ 1.
    fn line_minimize_handles_negative_steps() {
        // Arrange
        let centre = array![-3.0, 0.0];
        let problem = ArgMinAdapter::new(&CorrelatedBowl, &centre);
        let origin = array![0.0, 0.0];
        let direction = array![1.0, 0.0];
        let evals = Cell::new(0);
        let f0 = problem.cost(&origin).expect("cost");

        // Act
        let (alpha, cost) =
            line_minimize(&problem, &origin, &direction, f0, &evals).expect("line search");

        // Assert
        assert!((alpha + 3.0).abs() < 1e-3, "alpha = {alpha}");
        assert!((cost - 1.0).abs() < 1e-5);
        assert!(evals.get() > 2);
    }
}
