//! loglik_optimizer::finite_diff: finite-difference gradient and Hessian helpers.
//!
//! Purpose
//! -------
//! Give the optimizer and the inference layer validated numerical
//! derivatives without touching the `finitediff` API directly. The fertility
//! likelihood has no analytic gradient, so every L-BFGS step and every
//! standard-error computation goes through this module.
//!
//! Key behaviors
//! -------------
//! - [`robust_gradient`]: central differences first, forward differences
//!   when the central stencil hit an evaluation error or produced a
//!   non-finite entry.
//! - [`run_fd_diff`]: forward differences with error capture and
//!   validation.
//! - [`compute_hessian`]: central-difference Hessian of a gradient map,
//!   falling back to forward differences, then symmetrized.
//!
//! Invariants & assumptions
//! ------------------------
//! - Objective closures cannot return `Result`; they park the first error
//!   in a shared `RefCell<Option<Error>>` and return `NaN`.
//! - Whatever this module returns has passed [`validate_grad`] or
//!   [`validate_hessian`].
//!
//! Conventions
//! -----------
//! - Derivatives are taken with respect to the raw optimizer vector
//!   `Theta`; for the fertility model that is
//!   `(η, φ, θ, γ, log σ_n, log σ_e)`.
//! - Errors surface as [`OptError`](crate::optimization::errors::OptError)
//!   through `OptResult<T>`.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Grad, Theta,
        types::Hessian,
        validation::{validate_grad, validate_hessian},
    },
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Central-difference gradient with a forward-difference fallback.
///
/// # Parameters
/// - `theta`: evaluation point; its length fixes the gradient dimension.
/// - `func`: scalar objective that parks errors in `closure_err`.
/// - `closure_err`: error side channel shared with `func`.
///
/// # Errors
/// - Any error captured by `func` during the forward-difference pass.
/// - `GradientDimMismatch` / `InvalidGradient` if the fallback gradient
///   fails validation.
pub fn robust_gradient<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let central = theta.central_diff(func);
    if closure_err.borrow().is_none() && validate_grad(&central, theta.len()).is_ok() {
        return Ok(central);
    }
    run_fd_diff(theta, func, closure_err)
}

/// Forward-difference gradient with error capture and validation.
///
/// Clears `closure_err`, differentiates `func` at `theta`, and then either
/// returns the captured error or the validated gradient.
///
/// # Errors
/// - The error parked in `closure_err`, converted into `OptError`.
/// - `GradientDimMismatch` / `InvalidGradient` from [`validate_grad`].
///
/// # Examples
/// ```rust
/// # use std::cell::RefCell;
/// # use argmin::core::Error;
/// # use ndarray::Array1;
/// # use fertility_mle::optimization::loglik_optimizer::Theta;
/// # use fertility_mle::optimization::loglik_optimizer::finite_diff::run_fd_diff;
/// let theta: Theta = Array1::from(vec![0.0_f64, 1.0]);
/// let closure_err: RefCell<Option<Error>> = RefCell::new(None);
/// let f = |x: &Theta| x.dot(x);
///
/// let grad = run_fd_diff(&theta, &f, &closure_err).unwrap();
/// assert_eq!(grad.len(), theta.len());
/// ```
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, theta.len())?;
    Ok(fd_grad)
}

/// Finite-difference Hessian of a gradient map, validated and symmetrized.
///
/// The central-difference Hessian is preferred. If it fails validation the
/// forward-difference Hessian is tried, and only its validation error is
/// reported.
///
/// # Errors
/// - `HessianDimMismatch` / `InvalidHessian` when the forward-difference
///   fallback is also invalid.
///
/// # Examples
/// ```rust
/// # use ndarray::Array1;
/// # use fertility_mle::optimization::loglik_optimizer::Theta;
/// # use fertility_mle::optimization::loglik_optimizer::finite_diff::compute_hessian;
/// let grad_fn = |theta: &Theta| theta.mapv(|x| 2.0 * x);
/// let theta: Theta = Array1::from(vec![1.0_f64, 2.0]);
/// let hess = compute_hessian(&grad_fn, &theta).unwrap();
/// assert_eq!(hess.shape(), &[2, 2]);
/// ```
pub fn compute_hessian<F: Fn(&Theta) -> Grad>(f: &F, theta: &Theta) -> OptResult<Hessian> {
    let dim = theta.len();
    let mut cent_hess = theta.central_hessian(f);
    match validate_hessian(&cent_hess, dim) {
        Ok(_) => {
            symmetrize_hess(&mut cent_hess);
            Ok(cent_hess)
        }
        Err(_) => {
            let mut forward_hess = theta.forward_hessian(f);
            validate_hessian(&forward_hess, dim)?;
            symmetrize_hess(&mut forward_hess);
            Ok(forward_hess)
        }
    }
}

// ---- Helper methods ----

/// Replace each off-diagonal pair with its average; the diagonal is kept.
fn symmetrize_hess(hess: &mut Hessian) {
    for i in 0..hess.nrows() {
        for j in 0..i {
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
        }
    }
}
