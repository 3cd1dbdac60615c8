//! Integration tests for the fertility estimation pipeline.
//!
//! Purpose
//! -------
//! - Validate the end-to-end path: CSV or in-memory data, model fitting with
//!   each optimizer, scoring, standard errors and the method comparison.
//! - Use a realistic synthetic sample drawn from known structural
//!   parameters with small Gaussian noise.
//!
//! Coverage
//! --------
//! - `fertility::core::data`: CSV loading through `from_reader`.
//! - `fertility::models`: `FertilityModel::fit`, `evaluate`,
//!   `standard_errors` and `compare_methods`.
//! - `fertility::report`: the comparison table over real fits.
//!
//! Exclusions
//! ----------
//! - Low-level solver mechanics and error plumbing, covered by unit tests.
//! - The binary's console output.
use fertility_mle::{
    fertility::{
        core::{data::FertilityData, options::EstimationOptions, params::StructuralParams},
        models::{FertilityModel, compare_methods, neg_log_likelihood},
        report::format_comparison_table,
    },
    optimization::loglik_optimizer::{
        LineSearcher, MLEOptions, Method, Tolerances, adapter::ArgMinAdapter,
    },
};
use argmin::core::Gradient;
use argmin_math::ArgminL2Norm;
use ndarray::Array1;
use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Normal};

const TRUE_ETA: f64 = 0.5;
const TRUE_PHI: f64 = 0.03;
const TRUE_THETA: f64 = 60.0;
const TRUE_GAMMA: f64 = 0.1;

/// Purpose
/// -------
/// Draw a sample from the model's interior regime at the true parameters.
///
/// Construction
/// ------------
/// - Productivity `w` on an even grid over `[5000, 20000]` (all above
///   `w_thresh = 4000`).
/// - `n* = (1 − η)γw / ((1 + γ)(φw − θ))`, `e+θ* = (ηφw − θ)/(1 − η) + θ`.
/// - Income `y = w (1 − φ n*)`.
/// - Observed `n = n* + N(0, 0.01²)` and `e+θ = e+θ* + N(0, 0.1²)`.
///
/// Invariants
/// ----------
/// - Seeded `StdRng`, so the sample is identical on every run.
fn synthetic_sample(n_obs: usize, seed: u64) -> FertilityData {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise_n = Normal::new(0.0, 0.01).expect("valid sd");
    let noise_e = Normal::new(0.0, 0.1).expect("valid sd");

    let w = Array1::linspace(5000.0, 20_000.0, n_obs);
    let n_star = w.mapv(|w: f64| {
        (1.0 - TRUE_ETA) * TRUE_GAMMA * w / ((1.0 + TRUE_GAMMA) * (TRUE_PHI * w - TRUE_THETA))
    });
    let e_star =
        w.mapv(|w: f64| (TRUE_ETA * TRUE_PHI * w - TRUE_THETA) / (1.0 - TRUE_ETA) + TRUE_THETA);
    let y = &w * &n_star.mapv(|n: f64| 1.0 - TRUE_PHI * n);
    let n = n_star.mapv(|v| v + noise_n.sample(&mut rng));
    let e_plus_theta = e_star.mapv(|v| v + noise_e.sample(&mut rng));

    FertilityData::new(y, n, e_plus_theta).expect("valid synthetic sample")
}

/// Default options with a tighter iteration budget for test runtime.
fn test_options(max_iter: usize) -> EstimationOptions {
    let tols = Tolerances::new(Some(1e-3), Some(1e-9), Some(max_iter)).expect("valid tolerances");
    let mle_opts =
        MLEOptions::new(tols, LineSearcher::MoreThuente, false, None).expect("valid options");
    EstimationOptions::new(mle_opts, StructuralParams::initial_guess().to_theta())
}

fn within(estimate: f64, truth: f64, rel: f64) -> bool {
    (estimate - truth).abs() <= rel * truth.abs()
}

#[test]
// Purpose
// -------
// L-BFGS from the standard starting point recovers the structural
// parameters and fits both targets well.
//
// Given
// -----
// - 200 synthetic observations (seed 7).
// - L-BFGS with More–Thuente line search.
//
// Expect
// ------
// - η, φ, θ, γ within ±10% of the truth.
// - R² for n and for e+θ above 0.9.
// - Six finite, non-negative standard errors.
fn lbfgs_recovers_structural_parameters() {
    // Arrange
    let data = synthetic_sample(200, 7);
    let options = test_options(5_000);
    let mut model = FertilityModel::new(options.clone());

    // Act
    model.fit(Method::Lbfgs, options.initial_guess.clone(), &data).expect("L-BFGS fit");
    let params = *model.fitted().expect("fitted params");
    let metrics = model.evaluate(&data).expect("finite predictions");
    let se = model.standard_errors(&data).expect("standard errors");

    // Assert
    assert!(within(params.eta, TRUE_ETA, 0.1), "eta = {}", params.eta);
    assert!(within(params.phi, TRUE_PHI, 0.1), "phi = {}", params.phi);
    assert!(within(params.theta, TRUE_THETA, 0.1), "theta = {}", params.theta);
    assert!(within(params.gamma, TRUE_GAMMA, 0.1), "gamma = {}", params.gamma);
    assert!(metrics.r2_n > 0.9, "R2_n = {}", metrics.r2_n);
    assert!(metrics.r2_e_plus_theta > 0.9, "R2_e = {}", metrics.r2_e_plus_theta);
    assert_eq!(se.len(), 6);
    assert!(se.iter().all(|s| s.is_finite() && *s >= 0.0), "se = {se}");
}

#[test]
// Purpose
// -------
// The comparison runs every method on realistic data and each method
// improves on the starting point.
//
// Given
// -----
// - 120 synthetic observations (seed 11) and a 2 000-iteration cap.
//
// Expect
// ------
// - Three entries in the order Powell, Nelder–Mead, L-BFGS.
// - Powell and Nelder–Mead succeed with `value ≥ ℓ(θ₀)`.
// - L-BFGS succeeds with `value > ℓ(θ₀)`.
// - The rendered table has one column per method.
fn comparison_covers_all_methods() {
    // Arrange
    let data = synthetic_sample(120, 11);
    let options = test_options(2_000);
    let start_ll = -neg_log_likelihood(&options.initial_guess, &data);

    // Act
    let comparison = compare_methods(&options, &data, &Method::ALL);
    let table = format_comparison_table(&comparison);

    // Assert
    let order: Vec<Method> = comparison.iter().map(|(m, _)| m).collect();
    assert_eq!(order, vec![Method::Powell, Method::NelderMead, Method::Lbfgs]);
    for method in [Method::Powell, Method::NelderMead] {
        let fit = comparison.get(method).expect("entry").as_ref().expect("fit succeeds");
        assert!(fit.outcome.value >= start_ll, "{method}: {}", fit.outcome.value);
        assert!(fit.metrics.is_ok());
    }
    let lbfgs = comparison.get(Method::Lbfgs).expect("entry").as_ref().expect("fit succeeds");
    assert!(lbfgs.outcome.value > start_ll, "L-BFGS: {}", lbfgs.outcome.value);
    let header = table.lines().next().expect("header line");
    assert!(header.contains("Powell") && header.contains("Nelder-Mead") && header.contains("L-BFGS"));
}

#[test]
// Purpose
// -------
// L-BFGS leaves θ₀ on a sample where its first line search overshoots
// into the infeasible region, and only claims convergence at a point whose
// gradient meets `tol_grad`.
//
// Given
// -----
// - 120 synthetic observations (seed 11) and θ₀ = the standard guess.
// - Both line searches under a 2 000-iteration cap and tol_grad = 1e-3.
//
// Expect
// ------
// - ℓ(θ̂) > ℓ(θ₀) strictly and θ̂ ≠ θ₀.
// - If `converged`, the gradient re-evaluated at θ̂ has norm ≤ tol_grad
//   and equals the reported `grad_norm`.
fn lbfgs_improves_on_start_with_penalty_plateau() {
    for searcher in [LineSearcher::MoreThuente, LineSearcher::Backtracking] {
        // Arrange
        let data = synthetic_sample(120, 11);
        let mut options = test_options(2_000);
        options.mle_opts.line_searcher = searcher;
        let start_ll = -neg_log_likelihood(&options.initial_guess, &data);
        let mut model = FertilityModel::new(options.clone());

        // Act
        model.fit(Method::Lbfgs, options.initial_guess.clone(), &data).expect("L-BFGS fit");
        let outcome = model.results.clone().expect("outcome");

        // Assert
        assert!(outcome.value > start_ll, "{searcher:?}: {} vs {start_ll}", outcome.value);
        assert_ne!(outcome.theta_hat, options.initial_guess);
        if outcome.converged {
            let grad = ArgMinAdapter::new(&model, &data)
                .gradient(&outcome.theta_hat)
                .expect("gradient at theta_hat");
            let norm = grad.l2_norm();
            assert!(norm <= 1e-3, "{searcher:?}: gradient norm {norm} at a converged fit");
            assert_eq!(outcome.grad_norm, Some(norm));
        }
    }
}

#[test]
// Purpose
// -------
// A headed CSV with an `e+theta` column and extra columns loads into the
// same columns the model consumes, and a fit on it runs.
//
// Given
// -----
// - CSV text with columns `country,y,n,e+theta` built from a synthetic
//   sample.
//
// Expect
// ------
// - Loaded columns equal the source to printing precision.
// - A Powell fit on the loaded data succeeds.
fn csv_round_trip_feeds_the_model() {
    // Arrange
    let source = synthetic_sample(30, 3);
    let mut text = String::from("country,y,n,e+theta\n");
    for i in 0..source.len() {
        text.push_str(&format!(
            "c{i},{:.12},{:.12},{:.12}\n",
            source.y[i], source.n[i], source.e_plus_theta[i]
        ));
    }

    // Act
    let loaded = FertilityData::from_reader(text.as_bytes()).expect("valid CSV");
    let mut model = FertilityModel::new(test_options(500));
    let fit = model.fit(Method::Powell, model.options.initial_guess.clone(), &loaded);

    // Assert
    assert_eq!(loaded.len(), source.len());
    for i in 0..source.len() {
        assert!((loaded.y[i] - source.y[i]).abs() < 1e-8);
        assert!((loaded.n[i] - source.n[i]).abs() < 1e-8);
        assert!((loaded.e_plus_theta[i] - source.e_plus_theta[i]).abs() < 1e-8);
    }
    assert!(fit.is_ok(), "{fit:?}");
}
