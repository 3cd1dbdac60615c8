//! inference::hessian: observed-information standard errors.
//!
//! Purpose
//! -------
//! Turn a gradient map into classical standard errors at an estimate `θ̂`.
//! The observed information `J(θ̂)` is the finite-difference Jacobian of the
//! gradient of the negative log-likelihood; its eigen-truncated
//! pseudoinverse is the asymptotic covariance of `θ̂`.
//!
//! Key behaviors
//! -------------
//! - Call [`compute_hessian`] on the supplied gradient map to obtain
//!   `J(θ̂)` (validated and symmetrized upstream).
//! - Copy the Hessian into a `nalgebra::DMatrix` ([`fill_dmatrix`]) and
//!   take a symmetric eigendecomposition `J = Q Λ Qᵀ`.
//! - Return `sqrt(diag(J⁺))`, dropping eigenvalues `λ ≤ EIGEN_EPS`.
//! - [`calc_standard_errors_from_cost`] builds the gradient map from a
//!   scalar cost with [`robust_gradient`] and reports the first gradient
//!   failure instead of the downstream `InvalidHessian`.
//!
//! Invariants & assumptions
//! ------------------------
//! - The gradient map returns vectors of length `θ̂.len()`. Failures inside
//!   the map should surface as non-finite entries, which
//!   [`compute_hessian`] rejects as `InvalidHessian`.
//! - No explicit matrix inverse is formed.
//!
//! Conventions
//! -----------
//! - The Hessian is on the summed (not averaged) log-likelihood scale, so
//!   the returned SEs need no further `1/n` scaling.
//! - Dropped eigen-directions contribute zero variance; a fully flat
//!   direction yields an SE of 0 rather than infinity.
//! - Errors are reported via [`OptResult<T>`].
use std::cell::RefCell;

use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        Grad, Hessian, Theta,
        finite_diff::{compute_hessian, robust_gradient},
    },
};
use nalgebra::DMatrix;
use ndarray::Array1;

/// Eigenvalues at or below this threshold are excluded from `J⁺`.
pub const EIGEN_EPS: f64 = 1e-10;

/// Classical standard errors from the observed information at `theta_hat`.
///
/// Parameters
/// ----------
/// - `f`: gradient map of the **negative** log-likelihood, `θ ↦ ∇c(θ)`.
/// - `theta_hat`: estimate at which the information is evaluated.
///
/// Returns
/// -------
/// Length-`θ̂.len()` vector of standard errors.
///
/// Errors
/// ------
/// - `HessianDimMismatch` / `InvalidHessian` from [`compute_hessian`].
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use fertility_mle::inference::hessian::calc_standard_errors;
/// # use fertility_mle::optimization::loglik_optimizer::Theta;
/// // c(θ) = ½ θᵀAθ with A = diag(4, 1) has gradient Aθ.
/// let a = array![[4.0, 0.0], [0.0, 1.0]];
/// let f = |theta: &Theta| a.dot(theta);
///
/// let se = calc_standard_errors(&f, &array![1.0, -1.0])?;
/// assert!((se[0] - 0.5).abs() < 1e-6);
/// assert!((se[1] - 1.0).abs() < 1e-6);
/// # Ok::<(), fertility_mle::optimization::errors::OptError>(())
/// ```
pub fn calc_standard_errors<F: Fn(&Theta) -> Grad>(
    f: &F, theta_hat: &Theta,
) -> OptResult<Array1<f64>> {
    let obs_info = compute_hessian(f, theta_hat)?;
    let mut obs_info_nalg = DMatrix::<f64>::zeros(obs_info.nrows(), obs_info.ncols());
    fill_dmatrix(&obs_info, &mut obs_info_nalg);
    Ok(solve_for_se(obs_info_nalg, theta_hat.len()))
}

/// Classical standard errors from a scalar cost `c(θ) = −ℓ(θ)`.
///
/// The gradient map differentiates `cost` with [`robust_gradient`]. A
/// failed gradient evaluation is parked and yields a NaN vector, so the
/// Hessian step fails; the parked error is then returned in place of the
/// Hessian error.
///
/// Errors
/// ------
/// - The first `robust_gradient` error (`InvalidGradient`,
///   `GradientDimMismatch`, or a cost error captured by the stencil).
/// - Otherwise, any error from [`calc_standard_errors`].
pub fn calc_standard_errors_from_cost<C: Fn(&Theta) -> f64>(
    cost: &C, theta_hat: &Theta,
) -> OptResult<Array1<f64>> {
    let grad_err: RefCell<Option<OptError>> = RefCell::new(None);
    let grad = |theta: &Theta| {
        let closure_err = RefCell::new(None);
        match robust_gradient(theta, cost, &closure_err) {
            Ok(g) => g,
            Err(e) => {
                let mut slot = grad_err.borrow_mut();
                if slot.is_none() {
                    *slot = Some(e);
                }
                Array1::from_elem(theta.len(), f64::NAN)
            }
        }
    };
    let result = calc_standard_errors(&grad, theta_hat);
    match (result, grad_err.take()) {
        (Err(_), Some(first)) => Err(first),
        (result, _) => result,
    }
}

// ---- Helper methods ----

/// Copy a square `ndarray` Hessian into a preallocated `DMatrix` of the
/// same shape. Symmetry is preserved, not enforced.
fn fill_dmatrix(obs_info: &Hessian, obs_info_nalg: &mut DMatrix<f64>) {
    for ((i, j), &value) in obs_info.indexed_iter() {
        obs_info_nalg[(i, j)] = value;
    }
}

/// `sqrt(diag(J⁺))` via symmetric eigendecomposition:
/// `Var(θ̂_i) = Σ_{k: λ_k > EIGEN_EPS} Q[i,k]² / λ_k`.
fn solve_for_se(obs_info_nalg: DMatrix<f64>, n: usize) -> Array1<f64> {
    let eigen_decomp = obs_info_nalg.symmetric_eigen();
    let q = eigen_decomp.eigenvectors;
    let eigenvals = eigen_decomp.eigenvalues;
    Array1::from_shape_fn(n, |i| {
        eigenvals
            .iter()
            .enumerate()
            .filter(|(_, lambda)| **lambda > EIGEN_EPS)
            .map(|(k, &lambda)| q[(i, k)] * q[(i, k)] / lambda)
            .sum::<f64>()
            .sqrt()
    })
}
