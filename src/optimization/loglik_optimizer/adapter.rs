//! Adapter that exposes a user `LogLikelihood` as an `argmin` problem.
//!
//! Maximizing `ℓ(θ)` becomes minimizing `c(θ) = -ℓ(θ)`. Analytic gradients
//! are negated; when a model has none, the **cost** closure is finite
//! differenced, so that branch needs no sign flip.
use std::cell::RefCell;

use crate::optimization::{
    errors::OptError,
    loglik_optimizer::{
        finite_diff::robust_gradient,
        traits::LogLikelihood,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};

/// Bridges a user `LogLikelihood` to `argmin`'s `CostFunction` and `Gradient`.
///
/// - `CostFunction::cost` returns `-ℓ(θ)`.
/// - `Gradient::gradient` returns `-∇ℓ(θ)` for analytic gradients, or a
///   finite-difference gradient of the cost otherwise.
///
/// The same adapter feeds every solver: L-BFGS uses both traits, while
/// Nelder–Mead and the Powell line problems only call `cost`.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: LogLikelihood> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate `c(θ) = -ℓ(θ)`.
    ///
    /// # Errors
    /// Propagates the model's `OptError`, or `NonFiniteCost` when `ℓ(θ)` is
    /// not finite.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let output = self.f.value(theta, self.data)?;
        if !output.is_finite() {
            return Err((OptError::NonFiniteCost { value: output }).into());
        }
        Ok(-output)
    }
}

impl<'a, F: LogLikelihood> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// Evaluate the gradient of the cost at `θ`.
    ///
    /// Central differences are tried first. If any cost evaluation inside
    /// the stencil failed, or the result is not finite, a forward-difference
    /// gradient is computed instead and validated.
    ///
    /// The finite-difference closure must return `f64`, so the first cost
    /// error is parked in `closure_err` and the closure returns `NaN`.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let dim = theta.len();
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, dim)?;
                Ok(-g)
            }
            Err(OptError::GradientNotImplemented) => {
                let closure_err: RefCell<Option<Error>> = RefCell::new(None);
                let cost_func = |theta: &Theta| -> f64 {
                    match self.cost(theta) {
                        Ok(val) => val,
                        Err(e) => {
                            let mut slot = closure_err.borrow_mut();
                            if slot.is_none() {
                                *slot = Some(e);
                            }
                            f64::NAN
                        }
                    }
                };
                Ok(robust_gradient(theta, &cost_func, &closure_err)?)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl<'a, F: LogLikelihood> ArgMinAdapter<'a, F> {
    /// Construct a new adapter over a user `LogLikelihood` and its data.
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptResult;
    use ndarray::array;

    /// ℓ(θ) = -‖θ - c‖² with no analytic gradient.
    struct ShiftedBowl;

    impl LogLikelihood for ShiftedBowl {
        type Data = Theta;

        fn value(&self, theta: &Theta, data: &Theta) -> OptResult<f64> {
            let d = theta - data;
            Ok(-d.dot(&d))
        }

        fn check(&self, _theta: &Theta, _data: &Theta) -> OptResult<()> {
            Ok(())
        }
    }

    /// Same bowl, but with the analytic gradient ∇ℓ = -2(θ - c).
    struct AnalyticBowl;

    impl LogLikelihood for AnalyticBowl {
        type Data = Theta;

        fn value(&self, theta: &Theta, data: &Theta) -> OptResult<f64> {
            ShiftedBowl.value(theta, data)
        }

        fn check(&self, _theta: &Theta, _data: &Theta) -> OptResult<()> {
            Ok(())
        }

        fn grad(&self, theta: &Theta, data: &Theta) -> OptResult<Grad> {
            Ok((theta - data) * -2.0)
        }
    }

    #[test]
    // Purpose
    // -------
    // The adapter's cost is the negated log-likelihood.
    //
    // Given
    // -----
    // - ℓ(θ) = -‖θ - c‖² with c = (1, 2), evaluated at θ = (0, 0).
    //
    // Expect
    // ------
    // - cost = ‖c‖² = 5.
    fn cost_is_negated_log_likelihood() {
        let centre = array![1.0, 2.0];
        let adapter = ArgMinAdapter::new(&ShiftedBowl, &centre);
        let cost = adapter.cost(&array![0.0, 0.0]).expect("cost should evaluate");
        assert!((cost - 5.0).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Finite-difference and analytic paths agree on the cost gradient.
    //
    // Given
    // -----
    // - The shifted bowl with and without an analytic gradient at θ = (0, 0).
    //
    // Expect
    // ------
    // - Both gradients ≈ 2(θ - c) = (-2, -4).
    fn finite_difference_gradient_matches_analytic_gradient() {
        let centre = array![1.0, 2.0];
        let theta = array![0.0, 0.0];

        let fd = ArgMinAdapter::new(&ShiftedBowl, &centre).gradient(&theta).expect("fd grad");
        let an = ArgMinAdapter::new(&AnalyticBowl, &centre).gradient(&theta).expect("analytic");

        for (a, b) in fd.iter().zip(an.iter()) {
            assert!((a - b).abs() < 1e-5, "fd {a} vs analytic {b}");
        }
        assert!((an[0] + 2.0).abs() < 1e-12);
        assert!((an[1] + 4.0).abs() < 1e-12);
    }
}
