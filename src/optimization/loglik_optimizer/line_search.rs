//! loglik_optimizer::line_search: bounded line searches for L-BFGS.
//!
//! Purpose
//! -------
//! Keep every line search run by the L-BFGS driver finite in length, and
//! provide a last-resort descent step for starting points where a
//! quasi-Newton run cannot leave `θ` at all.
//!
//! Key behaviors
//! -------------
//! - [`CappedLineSearch`] wraps any argmin line search and caps its
//!   iterations at [`LINE_SEARCH_MAX_ITERS`]. argmin runs the L-BFGS line
//!   search in an internal executor with no iteration limit, so the cap is
//!   installed on the line-search state during `init`.
//! - [`descent_step`] backtracks along `−∇c(θ)` under the Armijo condition,
//!   starting from a unit-length step and halving up to
//!   [`DESCENT_MAX_HALVINGS`] times.
//!
//! Invariants & assumptions
//! ------------------------
//! - A capped search that hits its limit hands the last trial point back to
//!   L-BFGS; the outer executor still tracks the best point seen.
//! - [`descent_step`] only reports a point whose cost is strictly below the
//!   starting cost.
//!
//! Conventions
//! -----------
//! - All searches minimize the cost `c(θ) = −ℓ(θ)` of an [`ArgMinAdapter`].
use argmin::core::{
    ArgminFloat, Error, Executor, IterState, KV, LineSearch, Problem, Solver, State,
    TerminationStatus,
};
use argmin::solver::linesearch::condition::ArmijoCondition;
use argmin_math::ArgminL2Norm;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        FnEvalMap, LogLikelihood,
        adapter::ArgMinAdapter,
        types::{ArmijoBacktracking, Cost, Grad, Theta},
    },
};

/// Iteration cap for a single line search inside L-BFGS.
pub const LINE_SEARCH_MAX_ITERS: u64 = 64;

/// Sufficient-decrease constant of the Armijo condition.
pub const ARMIJO_C1: f64 = 1e-4;

/// Contraction factor applied to the step on each backtracking iteration.
pub const BACKTRACK_RHO: f64 = 0.5;

/// Halvings allowed in [`descent_step`] before it gives up.
pub const DESCENT_MAX_HALVINGS: u64 = 200;

/// A line search whose iteration count is bounded by `max_iters`.
#[derive(Debug, Clone)]
pub struct CappedLineSearch<L> {
    inner: L,
    max_iters: u64,
}

impl<L> CappedLineSearch<L> {
    pub fn new(inner: L, max_iters: u64) -> Self {
        Self { inner, max_iters }
    }

    pub fn max_iters(&self) -> u64 {
        self.max_iters
    }
}

impl<L, D, F> LineSearch<D, F> for CappedLineSearch<L>
where
    L: LineSearch<D, F>,
{
    fn search_direction(&mut self, direction: D) {
        self.inner.search_direction(direction);
    }

    fn initial_step_length(&mut self, step_length: F) -> Result<(), Error> {
        self.inner.initial_step_length(step_length)
    }
}

impl<O, L, P, G, F> Solver<O, IterState<P, G, (), (), (), F>> for CappedLineSearch<L>
where
    L: Solver<O, IterState<P, G, (), (), (), F>>,
    P: Clone,
    F: ArgminFloat,
{
    const NAME: &'static str = "Capped line search";

    fn init(
        &mut self, problem: &mut Problem<O>, state: IterState<P, G, (), (), (), F>,
    ) -> Result<(IterState<P, G, (), (), (), F>, Option<KV>), Error> {
        let (state, kv) = self.inner.init(problem, state)?;
        Ok((state.max_iters(self.max_iters), kv))
    }

    fn next_iter(
        &mut self, problem: &mut Problem<O>, state: IterState<P, G, (), (), (), F>,
    ) -> Result<(IterState<P, G, (), (), (), F>, Option<KV>), Error> {
        self.inner.next_iter(problem, state)
    }

    fn terminate(&mut self, state: &IterState<P, G, (), (), (), F>) -> TerminationStatus {
        self.inner.terminate(state)
    }
}

/// Armijo backtracking line search with [`ARMIJO_C1`] and [`BACKTRACK_RHO`].
///
/// # Errors
/// Parameter errors from argmin, which cannot occur for the constants used.
pub fn armijo_backtracking() -> OptResult<ArmijoBacktracking> {
    let condition = ArmijoCondition::new(ARMIJO_C1)?;
    Ok(ArmijoBacktracking::new(condition).rho(BACKTRACK_RHO)?)
}

/// One steepest-descent step from `theta` with Armijo backtracking.
///
/// The first trial moves a Euclidean distance of 1 along `−grad`; each
/// rejected trial halves the step. Cost evaluations are added to
/// `fn_evals`.
///
/// Returns `Some((θ', c(θ')))` for the lowest point found when
/// `c(θ') < cost`, and `None` when no trial lowered the cost or the
/// gradient is zero or not finite.
///
/// # Errors
/// Cost errors from the adapter, converted into `OptError`.
pub fn descent_step<F: LogLikelihood>(
    problem: &ArgMinAdapter<'_, F>, theta: &Theta, cost: Cost, grad: &Grad,
    fn_evals: &mut FnEvalMap,
) -> OptResult<Option<(Theta, Cost)>> {
    let grad_norm = grad.l2_norm();
    if !grad_norm.is_finite() || grad_norm <= 0.0 {
        return Ok(None);
    }
    let mut search = armijo_backtracking()?;
    search.search_direction(-grad);
    search.initial_step_length(1.0 / grad_norm)?;

    let executor = Executor::new(ArgMinAdapter::new(problem.f, problem.data), search).configure(
        |state| {
            state
                .param(theta.clone())
                .gradient(grad.clone())
                .cost(cost)
                .max_iters(DESCENT_MAX_HALVINGS)
        },
    );
    let mut result = executor.run()?.state().clone();
    merge_fn_evals(fn_evals, result.get_func_counts());

    let best_cost = result.get_best_cost();
    match result.take_best_param() {
        Some(best) if best_cost < cost => Ok(Some((best, best_cost))),
        _ => Ok(None),
    }
}

/// Add every counter in `counts` to `total`.
pub fn merge_fn_evals(total: &mut FnEvalMap, counts: &FnEvalMap) {
    for (key, count) in counts {
        *total.entry(key.clone()).or_insert(0) += count;
    }
}
