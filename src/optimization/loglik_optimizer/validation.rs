//! Validation helpers for log-likelihood optimization.
//!
//! Consistency checks shared by the optimizer entry points and solvers:
//!
//! - **Tolerances**: [`verify_tol_grad`] and [`verify_tol_cost`] require
//!   finite, strictly positive values when a tolerance is supplied.
//! - **Starting points**: [`validate_theta0`] rejects empty or non-finite
//!   initial vectors before any solver is built.
//! - **Derivatives**: [`validate_grad`] and [`validate_hessian`] enforce
//!   dimensions and finite entries.
//! - **Outcomes**: [`validate_theta_hat`] and [`validate_value`] guard what
//!   a solver hands back.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{Grad, Theta, types::Hessian},
};

/// Validate the optional gradient‐norm tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidTolGrad`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate the optional cost tolerance.
///
/// The same value serves as the L-BFGS cost-change rule, the Nelder–Mead
/// simplex spread rule and the Powell relative decrease rule.
///
/// # Errors
/// Returns [`OptError::InvalidTolCost`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate an initial parameter vector.
///
/// # Errors
/// - [`OptError::MissingThetaHat`] if the vector is empty.
/// - [`OptError::InvalidThetaInput`] for the first non-finite entry.
pub fn validate_theta0(theta: &Theta) -> OptResult<()> {
    if theta.is_empty() {
        return Err(OptError::MissingThetaHat);
    }
    match theta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        Some((index, &value)) => Err(OptError::InvalidThetaInput { index, value }),
        None => Ok(()),
    }
}

/// Validate a gradient vector against dimension and finiteness.
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] if length does not match `dim`.
/// - [`OptError::InvalidGradient`] with the index/value of the first
///   offending element.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Gradient elements must be finite.",
            });
        }
    }
    Ok(())
}

/// Validate and unwrap an estimated parameter vector (`theta_hat`).
///
/// # Errors
/// - [`OptError::MissingThetaHat`] if the solver produced no vector.
/// - [`OptError::InvalidThetaHat`] if any element is non-finite.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    match theta_hat {
        Some(t) => {
            for (index, &value) in t.iter().enumerate() {
                if !value.is_finite() {
                    return Err(OptError::InvalidThetaHat {
                        index,
                        value,
                        reason: "Parameter estimates must be finite.",
                    });
                }
            }
            Ok(t)
        }
        None => Err(OptError::MissingThetaHat),
    }
}

/// Validate that a scalar log-likelihood value is finite.
///
/// # Errors
/// Returns [`OptError::NonFiniteCost`] if the value is `NaN` or infinite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

/// Validate the shape and entries of a Hessian matrix.
///
/// # Errors
/// - [`OptError::HessianDimMismatch`] if dimensions are not `dim × dim`.
/// - [`OptError::InvalidHessian`] for the first non-finite entry.
pub fn validate_hessian(hessian: &Hessian, dim: usize) -> OptResult<()> {
    if hessian.nrows() != dim || hessian.ncols() != dim {
        return Err(OptError::HessianDimMismatch {
            expected: dim,
            found: (hessian.nrows(), hessian.ncols()),
        });
    }
    for ((i, j), &value) in hessian.indexed_iter() {
        if !value.is_finite() {
            return Err(OptError::InvalidHessian { row: i, col: j, value });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, array};

    #[test]
    // Purpose
    // -------
    // `validate_theta0` accepts a finite vector and points at the first
    // non-finite entry otherwise.
    //
    // Given
    // -----
    // - The standard six-element starting vector.
    // - The same vector with an infinite fourth entry.
    // - An empty vector.
    //
    // Expect
    // ------
    // - `Ok(())`, `InvalidThetaInput { index: 3, .. }`, `MissingThetaHat`.
    fn validate_theta0_flags_first_non_finite_entry() {
        let good = array![0.5, 0.03, 60.0, 0.1, 0.1_f64.ln(), 0.1_f64.ln()];
        let mut bad = good.clone();
        bad[3] = f64::INFINITY;

        assert!(validate_theta0(&good).is_ok());
        assert!(matches!(validate_theta0(&bad), Err(OptError::InvalidThetaInput { index: 3, .. })));
        assert_eq!(validate_theta0(&Array1::zeros(0)), Err(OptError::MissingThetaHat));
    }

    #[test]
    // Purpose
    // -------
    // Gradient validation checks length before finiteness.
    //
    // Given
    // -----
    // - A length-2 gradient checked against `dim = 3`.
    // - A length-2 gradient with a NaN checked against `dim = 2`.
    //
    // Expect
    // ------
    // - `GradientDimMismatch` then `InvalidGradient { index: 1, .. }`.
    fn validate_grad_checks_dimension_then_finiteness() {
        assert_eq!(
            validate_grad(&array![1.0, 2.0], 3),
            Err(OptError::GradientDimMismatch { expected: 3, found: 2 })
        );
        assert!(matches!(
            validate_grad(&array![1.0, f64::NAN], 2),
            Err(OptError::InvalidGradient { index: 1, .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Hessian validation reports shape mismatches with the found shape.
    //
    // Given
    // -----
    // - A 2×3 matrix checked against `dim = 2`.
    //
    // Expect
    // ------
    // - `HessianDimMismatch { expected: 2, found: (2, 3) }`.
    fn validate_hessian_reports_shape_mismatch() {
        let h = Hessian::zeros((2, 3));
        assert_eq!(
            validate_hessian(&h, 2),
            Err(OptError::HessianDimMismatch { expected: 2, found: (2, 3) })
        );
    }

    #[test]
    // Purpose
    // -------
    // A missing or non-finite estimate is rejected.
    //
    // Given
    // -----
    // - `None`, and a vector with an infinite entry.
    //
    // Expect
    // ------
    // - `MissingThetaHat`, then `InvalidThetaHat { index: 0, .. }`.
    fn validate_theta_hat_rejects_missing_and_non_finite() {
        assert_eq!(validate_theta_hat(None), Err(OptError::MissingThetaHat));
        assert!(matches!(
            validate_theta_hat(Some(array![f64::NEG_INFINITY, 1.0])),
            Err(OptError::InvalidThetaHat { index: 0, .. })
        ));
    }
}
