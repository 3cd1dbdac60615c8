//! Runners that execute an `argmin` solver on a log-likelihood problem and
//! return a crate-friendly [`OptimOutcome`].
//!
//! L-BFGS runs are guarded. A run that ends away from a stationary point is
//! restarted from its best point with fresh curvature memory. A run that
//! cannot leave its start is retried with the backtracking line search,
//! and failing that a single steepest-descent step is taken. The outcome is
//! marked converged only when the gradient re-evaluated at `θ̂` meets
//! `tol_grad`.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        FnEvalMap, Grad, LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{build_optimizer_backtracking, build_optimizer_more_thuente},
        line_search::{descent_step, merge_fn_evals},
        types::NelderMeadSolver,
    },
};
use argmin::core::{
    CostFunction, Executor, Gradient, IterState, Solver, State, TerminationReason,
    TerminationStatus,
};
use argmin_math::ArgminL2Norm;

/// Restarts granted to L-BFGS after the first run.
pub const MAX_LBFGS_RESTARTS: usize = 20;

/// Status reported when neither L-BFGS nor a descent step can lower the
/// cost from the current point.
pub const STALLED_STATUS: &str = "Line search made no progress";

/// Run guarded L-BFGS for a log-likelihood problem.
///
/// Each round runs L-BFGS from the current point with the remaining
/// iteration budget, keeps its best point if it lowered the cost, and
/// re-evaluates `∇c` there. Rounds stop when `‖∇c(θ)‖ ≤ tol_grad`, the
/// budget is spent, the restarts are used up, or nothing lowers the cost.
/// A round that makes no progress switches to the backtracking line search;
/// if that also stalls, [`descent_step`] is tried once.
///
/// `tol_grad` defaults to argmin's `sqrt(f64::EPSILON)` when unset. The
/// outcome's `grad_norm` is the norm at `θ̂`, and `iterations` / `fn_evals`
/// add up every round.
///
/// # Errors
/// - Gradient errors at `θ₀`, and cost errors from the adapter.
/// - argmin runtime errors, converted through `From<argmin::core::Error>`.
/// - Validation errors from [`OptimOutcome::new`].
pub fn run_lbfgs<F: LogLikelihood>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'_, F>,
) -> OptResult<OptimOutcome> {
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(&theta0, &problem)?;
    }
    let tol_grad = opts.tols.tol_grad.unwrap_or_else(|| f64::EPSILON.sqrt());
    let mut remaining = opts.tols.max_iter.map(|m| m as u64);
    let mut iterations = 0_u64;
    let mut fn_evals = FnEvalMap::new();
    let mut status = TerminationStatus::NotTerminated;
    let mut stalled = false;

    let mut cost = problem.cost(&theta0)?;
    let mut grad = Some(problem.gradient(&theta0)?);
    let mut theta = theta0;
    let mut searcher = opts.line_searcher;

    for _ in 0..=MAX_LBFGS_RESTARTS {
        let current = match &grad {
            Some(g) if g.l2_norm() > tol_grad => g.clone(),
            _ => break,
        };
        if remaining == Some(0) {
            break;
        }

        let mut state = match searcher {
            LineSearcher::MoreThuente => {
                let solver = build_optimizer_more_thuente(opts)?;
                execute_lbfgs(&theta, opts, &problem, solver, remaining)?
            }
            LineSearcher::Backtracking => {
                let solver = build_optimizer_backtracking(opts)?;
                execute_lbfgs(&theta, opts, &problem, solver, remaining)?
            }
        };
        iterations += state.get_iter();
        if let Some(left) = remaining.as_mut() {
            *left = left.saturating_sub(state.get_iter());
        }
        merge_fn_evals(&mut fn_evals, state.get_func_counts());
        status = state.get_termination_status().clone();

        let best_cost = state.get_best_cost();
        let improved = match state.take_best_param() {
            Some(best) if best_cost < cost => {
                theta = best;
                cost = best_cost;
                true
            }
            _ => false,
        };

        if improved {
            searcher = opts.line_searcher;
        } else if searcher != LineSearcher::Backtracking {
            searcher = LineSearcher::Backtracking;
            continue;
        } else {
            match descent_step(&problem, &theta, cost, &current, &mut fn_evals)? {
                Some((next, next_cost)) => {
                    theta = next;
                    cost = next_cost;
                    searcher = opts.line_searcher;
                }
                None => {
                    stalled = true;
                    break;
                }
            }
        }
        grad = problem.gradient(&theta).ok();
    }

    let grad_norm = grad.as_ref().map(|g| g.l2_norm());
    let stationary = grad_norm.is_some_and(|n| n <= tol_grad);
    if stationary && !matches!(status, TerminationStatus::Terminated(_)) {
        status = TerminationStatus::Terminated(TerminationReason::SolverConverged);
    }
    let mut outcome = OptimOutcome::new(Some(theta), -cost, status, iterations, fn_evals, grad)?;
    outcome.converged = stationary;
    if stalled {
        outcome.status = STALLED_STATUS.to_string();
    } else if !stationary {
        if let Some(norm) = grad_norm {
            outcome.status = format!(
                "{} (gradient norm {norm:.3e} above tol_grad {tol_grad:.1e})",
                outcome.status
            );
        }
    }
    Ok(outcome)
}

/// Run one L-BFGS solve from `theta` and return its final state.
///
/// `max_iters`, when present, caps this run only. The slog observer is
/// attached when the `obs_slog` feature is on and `opts.verbose` is set.
fn execute_lbfgs<'a, F, S>(
    theta: &Theta, opts: &MLEOptions, problem: &ArgMinAdapter<'a, F>, solver: S,
    max_iters: Option<u64>,
) -> OptResult<IterState<Theta, Grad, (), (), (), f64>>
where
    F: LogLikelihood,
    S: Solver<ArgMinAdapter<'a, F>, IterState<Theta, Grad, (), (), (), f64>>,
{
    #[cfg(not(feature = "obs_slog"))]
    let _ = opts;
    let mut optimizer = Executor::new(ArgMinAdapter::new(problem.f, problem.data), solver);
    optimizer = optimizer.configure(|state| state.param(theta.clone()));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iters) = max_iters {
        optimizer = optimizer.configure(|state| state.max_iters(max_iters));
    }
    Ok(optimizer.run()?.state().clone())
}

/// Run a Nelder–Mead solver for a log-likelihood problem.
///
/// The simplex already carries the starting point, so only `max_iter` and
/// the optional observer are configured. The outcome has no gradient norm.
///
/// # Errors
/// Same sources as [`run_lbfgs`].
pub fn run_nelder_mead<F: LogLikelihood>(
    theta0: &Theta, opts: &MLEOptions, problem: ArgMinAdapter<'_, F>, solver: NelderMeadSolver,
) -> OptResult<OptimOutcome> {
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(theta0, &problem)?;
    }
    #[cfg(not(feature = "obs_slog"))]
    let _ = theta0;
    let mut optimizer = Executor::new(problem, solver);
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    OptimOutcome::new(
        result.take_best_param(),
        -result.get_best_cost(),
        termination,
        iterations,
        function_counts,
        None,
    )
}

// ---- Helper Methods ----

/// Print ℓ(θ₀) and, when it can be computed, ‖∇c(θ₀)‖ to stderr.
#[cfg(feature = "obs_slog")]
pub(crate) fn log_initial_state<F>(theta0: &Theta, problem: &ArgMinAdapter<'_, F>) -> OptResult<()>
where
    F: LogLikelihood,
{
    let ll0 = -problem.cost(theta0)?;
    let g0n = problem.gradient(theta0).ok().map(|g| g.l2_norm());

    eprintln!(
        "init: ell(theta0) = {:.6}{}",
        ll0,
        g0n.map(|n| format!(", ||grad|| = {:.6}", n)).unwrap_or_default()
    );
    Ok(())
}
