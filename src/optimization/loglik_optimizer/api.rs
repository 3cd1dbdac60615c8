//! High-level entry point for maximizing a user-provided `LogLikelihood`.
//!
//! [`maximize`] validates the starting point, wraps the model in an
//! [`ArgMinAdapter`] (which *minimizes* `-ℓ(θ)`), and dispatches on
//! [`Method`]: L-BFGS with the configured line search, a Nelder–Mead
//! simplex around θ₀, or Powell's conjugate-direction search.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::build_nelder_mead,
        powell::run_powell,
        run::{run_lbfgs, run_nelder_mead},
        traits::{LogLikelihood, MLEOptions, Method},
        validation::validate_theta0,
    },
};

/// Maximize a log-likelihood `ℓ(θ)` with the chosen method.
///
/// # Behavior
/// - Rejects an empty or non-finite `theta0`, then calls `f.check`.
/// - `Method::Lbfgs`: guarded L-BFGS ([`run_lbfgs`]) starting with the
///   line search in `opts.line_searcher`; finite-difference gradients when
///   the model has no analytic one.
/// - `Method::NelderMead`: simplex from [`build_nelder_mead`].
/// - `Method::Powell`: [`run_powell`].
///
/// # Errors
/// - `InvalidThetaInput` / `MissingThetaHat` for a bad `theta0`.
/// - Anything `f.check` returns.
/// - Builder and runtime errors of the selected solver.
///
/// # Example
/// ```
/// use ndarray::array;
/// use fertility_mle::optimization::errors::OptResult;
/// use fertility_mle::optimization::loglik_optimizer::{
///     maximize, LineSearcher, LogLikelihood, MLEOptions, Method, Theta, Tolerances,
/// };
///
/// struct Bowl;
/// impl LogLikelihood for Bowl {
///     type Data = ();
///     fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
///         Ok(-theta.dot(theta))
///     }
///     fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let tols = Tolerances::new(Some(1e-8), None, Some(200))?;
/// let opts = MLEOptions::new(tols, LineSearcher::Backtracking, false, None)?;
/// let out = maximize(&Bowl, Method::Lbfgs, array![0.1, -0.2, 0.3], &(), &opts)?;
/// assert!(out.value > -1e-8);
/// # Ok::<(), fertility_mle::optimization::errors::OptError>(())
/// ```
pub fn maximize<F: LogLikelihood>(
    f: &F, method: Method, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    validate_theta0(&theta0)?;
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match method {
        Method::Lbfgs => run_lbfgs(theta0, opts, problem),
        Method::NelderMead => {
            let solver = build_nelder_mead(&theta0, opts)?;
            run_nelder_mead(&theta0, opts, problem, solver)
        }
        Method::Powell => run_powell(theta0, opts, problem),
    }
}
