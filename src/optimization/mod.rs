//! optimization: MLE stack and unified error surface.
//!
//! Purpose
//! -------
//! Provide the optimization layer used to fit the fertility model: an
//! argmin-backed log-likelihood optimizer with three interchangeable
//! algorithms, plus a single error/result surface.
//!
//! Key behaviors
//! -------------
//! - `loglik_optimizer`: maximize `ℓ(θ)` with L-BFGS, Powell or
//!   Nelder–Mead, configured by `MLEOptions`.
//! - `errors`: normalize configuration mistakes, numerical failures,
//!   backend solver errors and model errors into `OptError` /
//!   `OptResult<T>`.
//!
//! Conventions
//! -----------
//! - Every solver maximizes `ℓ(θ)` by minimizing `c(θ) = -ℓ(θ)`; outcomes
//!   are reported in terms of `ℓ`.
//! - No I/O happens here except the optional stderr progress lines enabled
//!   by the `obs_slog` feature together with `MLEOptions::verbose`.

pub mod errors;
pub mod loglik_optimizer;

// ---- Optional convenience prelude for downstream crates -------------------
//
//     use fertility_mle::optimization::prelude::*;

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
}
