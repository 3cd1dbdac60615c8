//! `fertility-mle`: estimate the fertility model on `dataset.csv`.
//!
//! Reads `dataset.csv` from the working directory, fits the model with
//! L-BFGS, prints the estimates, R² and standard errors, then runs the
//! Powell / Nelder–Mead / L-BFGS comparison and prints per-method
//! evaluation blocks plus a comparison table.
use std::error::Error;

use fertility_mle::{
    fertility::{
        core::{data::FertilityData, options::EstimationOptions},
        models::{FertilityModel, compare_methods},
        report::{
            format_comparison_table, format_evaluation, format_method_estimate, format_r2,
            format_standard_errors, format_structural,
        },
    },
    optimization::loglik_optimizer::Method,
};

const DATASET_PATH: &str = "dataset.csv";

fn main() -> Result<(), Box<dyn Error>> {
    let data = FertilityData::from_csv_path(DATASET_PATH)?;
    let options = EstimationOptions::default();

    let mut model = FertilityModel::new(options.clone());
    model.fit(Method::Lbfgs, options.initial_guess.clone(), &data)?;
    let params = *model.fitted()?;
    let metrics = model.evaluate(&data)?;
    println!("Estimated Parameters:");
    println!("{}", format_structural(&params));
    println!("{}", format_r2(metrics.r2_n, metrics.r2_e_plus_theta));
    match model.standard_errors(&data) {
        Ok(se) => {
            println!("\nStandard errors:");
            println!("{}", format_standard_errors(params.to_theta().view(), se.view()));
        }
        Err(err) => println!("\nStandard errors unavailable: {err}"),
    }

    let comparison = compare_methods(&options, &data, &Method::ALL);
    for (method, fit) in comparison.iter() {
        println!();
        match fit {
            Ok(fit) => println!("{}", format_method_estimate(method, fit.outcome.theta_hat.view())),
            Err(err) => println!("--- Method: {method} ---\nFailed: {err}"),
        }
    }

    for (method, fit) in comparison.iter() {
        if let Ok(fit) = fit {
            if let Ok(metrics) = &fit.metrics {
                println!("\n{}", format_evaluation(method, metrics));
            }
        }
    }

    println!("\n{}", format_comparison_table(&comparison));
    Ok(())
}
