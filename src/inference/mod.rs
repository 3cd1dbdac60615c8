//! inference: post-estimation uncertainty for fitted models.
//!
//! Purpose
//! -------
//! Provide classical standard errors of an estimate `θ̂` from the observed
//! information, expressed in the raw optimizer parameter space.
//!
//! Key behaviors
//! -------------
//! - [`calc_standard_errors`] differentiates a gradient map at `θ̂`, then
//!   takes the diagonal of the eigen-truncated pseudoinverse.
//!
//! Invariants & assumptions
//! ------------------------
//! - The gradient map is that of the negative log-likelihood summed over
//!   observations, evaluated in the same parameter order as `θ̂`.
//! - All routines return [`OptResult`](crate::optimization::errors::OptResult)
//!   on failure rather than panicking.
//!
//! Downstream usage
//! ----------------
//! - Model layers call [`calc_standard_errors`] after fitting; see
//!   `FertilityModel::standard_errors`.

pub mod hessian;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::hessian::{EIGEN_EPS, calc_standard_errors, calc_standard_errors_from_cost};
