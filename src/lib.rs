//! fertility_mle: maximum-likelihood estimation of a structural fertility,
//! education and productivity model.
//!
//! Purpose
//! -------
//! Serve as the crate root for the estimation library used by the
//! `fertility-mle` binary. The crate fits a six-parameter model with three
//! optimizers (Powell, Nelder–Mead, L-BFGS) and compares the fits.
//!
//! Key behaviors
//! -------------
//! - [`fertility`]: data loading, the model evaluator, the penalized
//!   likelihood, fitting, scoring and report formatting.
//! - [`optimization`]: a generic `LogLikelihood` maximizer over `argmin`
//!   plus the unified [`OptError`](optimization::errors::OptError) surface.
//! - [`inference`]: observed-information standard errors.
//!
//! Invariants & assumptions
//! ------------------------
//! - The library performs no I/O other than reading a CSV when asked; all
//!   printing happens in the binary.
//! - Everything runs on the calling thread.
//!
//! Conventions
//! -----------
//! - Fallible operations return `OptResult<T>` or `ModelResult<T>`; panics
//!   indicate programming errors, not bad data or bad parameters.

pub mod fertility;
pub mod inference;
pub mod optimization;
