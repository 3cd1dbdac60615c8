//! Robustness check: fit the same data with several optimization methods.
//!
//! Purpose
//! -------
//! Run each requested [`Method`] independently from the same starting point
//! and collect the outcome, the fitted parameters and the goodness-of-fit
//! metrics, so the estimates can be compared side by side.
//!
//! Key behaviors
//! -------------
//! - Methods run sequentially in the order given; [`Method::ALL`] is
//!   Powell, Nelder–Mead, L-BFGS.
//! - Each method gets a fresh [`FertilityModel`]; nothing is shared between
//!   runs except the options and the data.
//! - A failure in one method is recorded as an `Err` for that key and does
//!   not stop the remaining methods.
//!
//! Invariants & assumptions
//! ------------------------
//! - Each method appears at most once; repeated entries in the request are
//!   ignored after the first.
use std::collections::BTreeMap;

use crate::{
    fertility::{
        core::{data::FertilityData, options::EstimationOptions, params::StructuralParams},
        errors::{ModelError, ModelResult},
        models::estimation::FertilityModel,
        scoring::FitMetrics,
    },
    optimization::{
        errors::OptResult,
        loglik_optimizer::{Method, OptimOutcome},
    },
};

/// Result of one method's fit.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodFit {
    pub method: Method,
    pub outcome: OptimOutcome,
    pub params: StructuralParams,
    /// Metrics at `params`; an error if the fitted predictions are not finite.
    pub metrics: ModelResult<FitMetrics>,
}

/// Per-method results keyed by [`Method`], remembering the run order.
#[derive(Debug, PartialEq)]
pub struct MethodComparison {
    order: Vec<Method>,
    fits: BTreeMap<Method, OptResult<MethodFit>>,
}

impl MethodComparison {
    pub fn get(&self, method: Method) -> Option<&OptResult<MethodFit>> {
        self.fits.get(&method)
    }

    /// Entries in run order.
    pub fn iter(&self) -> impl Iterator<Item = (Method, &OptResult<MethodFit>)> + '_ {
        self.order.iter().filter_map(move |m| self.fits.get(m).map(|fit| (*m, fit)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Successful fit with the lowest AIC, if any method produced metrics.
    pub fn best_by_aic(&self) -> Option<&MethodFit> {
        self.iter()
            .filter_map(|(_, fit)| fit.as_ref().ok())
            .filter_map(|fit| fit.metrics.as_ref().ok().map(|m| (fit, m.aic)))
            .filter(|(_, aic)| aic.is_finite())
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(fit, _)| fit)
    }
}

/// Fit `data` with every method in `methods` from `options.initial_guess`.
pub fn compare_methods(
    options: &EstimationOptions, data: &FertilityData, methods: &[Method],
) -> MethodComparison {
    let mut order = Vec::with_capacity(methods.len());
    let mut fits = BTreeMap::new();
    for &method in methods {
        if fits.contains_key(&method) {
            continue;
        }
        order.push(method);
        fits.insert(method, fit_one(options, data, method));
    }
    MethodComparison { order, fits }
}

fn fit_one(
    options: &EstimationOptions, data: &FertilityData, method: Method,
) -> OptResult<MethodFit> {
    let mut model = FertilityModel::new(options.clone());
    model.fit(method, options.initial_guess.clone(), data)?;
    let metrics = model.evaluate(data);
    let params = *model.fitted()?;
    let outcome = model.results.ok_or(ModelError::ModelNotFitted)?;
    Ok(MethodFit { method, outcome, params, metrics })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fertility::models::likelihood::neg_log_likelihood;
    use ndarray::{Array1, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Run order, keying and de-duplication.
    // - Isolation of a failing method from the others.
    // -------------------------------------------------------------------------

    fn sample() -> FertilityData {
        let y = Array1::linspace(5000.0, 15_000.0, 12);
        let n = y.mapv(|v: f64| 2.6 - v / 10_000.0);
        let e_plus_theta = y.mapv(|v: f64| 0.028 * v - 40.0);
        FertilityData::new(y, n, e_plus_theta).expect("valid sample")
    }

    fn quick_options() -> EstimationOptions {
        let mut options = EstimationOptions::default();
        options.mle_opts.tols.max_iter = Some(300);
        options
    }

    #[test]
    // Purpose
    // -------
    // Every requested method gets exactly one entry, iterated in run order,
    // and successful fits never end worse than the start.
    //
    // Given
    // -----
    // - `Method::ALL` followed by a duplicate `Powell`.
    //
    // Expect
    // ------
    // - Three entries in the order Powell, Nelder–Mead, L-BFGS.
    // - For every `Ok` entry, `outcome.value ≥ ℓ(θ₀)`.
    fn runs_each_method_once_in_order() {
        // Arrange
        let options = quick_options();
        let data = sample();
        let mut methods = Method::ALL.to_vec();
        methods.push(Method::Powell);
        let start_ll = -neg_log_likelihood(&options.initial_guess, &data);

        // Act
        let comparison = compare_methods(&options, &data, &methods);

        // Assert
        let order: Vec<Method> = comparison.iter().map(|(m, _)| m).collect();
        assert_eq!(order, vec![Method::Powell, Method::NelderMead, Method::Lbfgs]);
        assert_eq!(comparison.len(), 3);
        for (method, fit) in comparison.iter() {
            if let Ok(fit) = fit {
                assert_eq!(fit.method, method);
                assert!(fit.outcome.value >= start_ll);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // A failing configuration is recorded per method instead of aborting.
    //
    // Given
    // -----
    // - An initial guess with the wrong length.
    //
    // Expect
    // ------
    // - One `Err` entry per method, no best fit, and `get` finding each key.
    fn failures_are_recorded_per_method() {
        let mut options = quick_options();
        options.initial_guess = array![0.5, 0.03, 60.0];

        let comparison = compare_methods(&options, &sample(), &Method::ALL);

        assert_eq!(comparison.len(), 3);
        for method in Method::ALL {
            assert!(matches!(comparison.get(method), Some(Err(_))));
        }
        assert!(comparison.best_by_aic().is_none());
    }
}
