//! Plain-text report blocks printed by the `fertility-mle` binary.
//!
//! Every function returns a `String` without a trailing newline; numbers are
//! printed with four decimals.
use ndarray::ArrayView1;

use crate::{
    fertility::{
        core::params::{PARAM_NAMES, StructuralParams},
        models::comparison::MethodComparison,
        scoring::FitMetrics,
    },
    optimization::loglik_optimizer::Method,
};

/// Metric labels in report order.
pub const METRIC_LABELS: [&str; 7] =
    ["log_likelihood", "AIC", "BIC", "R2_n", "R2_e+θ", "RMSE_n", "RMSE_e+θ"];

fn metric_values(m: &FitMetrics) -> [f64; 7] {
    [m.log_likelihood, m.aic, m.bic, m.r2_n, m.r2_e_plus_theta, m.rmse_n, m.rmse_e_plus_theta]
}

/// `eta: …, phi: …, theta: …, gamma: …`.
pub fn format_structural(params: &StructuralParams) -> String {
    format!(
        "eta: {:.4}, phi: {:.4}, theta: {:.4}, gamma: {:.4}",
        params.eta, params.phi, params.theta, params.gamma
    )
}

/// R² lines for fertility and education.
pub fn format_r2(r2_n: f64, r2_e: f64) -> String {
    format!("R² for n: {r2_n:.4}\nR² for e: {r2_e:.4}")
}

/// One `name: estimate (se)` line per parameter.
pub fn format_standard_errors(theta_hat: ArrayView1<f64>, se: ArrayView1<f64>) -> String {
    PARAM_NAMES
        .iter()
        .zip(theta_hat.iter().zip(se.iter()))
        .map(|(name, (est, s))| format!("{name}: {est:.4} (se {s:.4})"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Header plus the raw parameter vector of one method.
pub fn format_method_estimate(method: Method, theta_hat: ArrayView1<f64>) -> String {
    let values = theta_hat.iter().map(|v| format!("{v:.4}")).collect::<Vec<_>>().join(", ");
    format!("--- Method: {method} ---\nEstimated parameters: [{values}]")
}

/// Evaluation block for one method.
pub fn format_evaluation(method: Method, metrics: &FitMetrics) -> String {
    let mut lines = vec![format!("--- Evaluation Results for {method} ---")];
    lines.extend(
        METRIC_LABELS
            .iter()
            .zip(metric_values(metrics))
            .map(|(label, value)| format!("{label}: {value:.4}")),
    );
    lines.join("\n")
}

/// Side-by-side table of all methods; failed methods show their error.
pub fn format_comparison_table(comparison: &MethodComparison) -> String {
    let mut header = format!("{:<16}", "metric");
    let mut rows: Vec<String> =
        METRIC_LABELS.iter().map(|label| format!("{label:<16}")).collect();
    let mut failures = Vec::new();

    for (method, fit) in comparison.iter() {
        header.push_str(&format!("{:>16}", method.name()));
        let values = match fit {
            Ok(fit) => match &fit.metrics {
                Ok(metrics) => Some(metric_values(metrics)),
                Err(err) => {
                    failures.push(format!("{method}: {err}"));
                    None
                }
            },
            Err(err) => {
                failures.push(format!("{method}: {err}"));
                None
            }
        };
        for (i, row) in rows.iter_mut().enumerate() {
            match values {
                Some(v) => row.push_str(&format!("{:>16.4}", v[i])),
                None => row.push_str(&format!("{:>16}", "n/a")),
            }
        }
    }

    let mut lines = vec![header];
    lines.extend(rows);
    lines.extend(failures);
    lines.join("\n")
}
