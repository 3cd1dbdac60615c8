//! Core building blocks of the fertility model: observations, structural
//! parameters, the closed-form evaluator and estimation options.

pub mod data;
pub mod evaluator;
pub mod options;
pub mod params;
