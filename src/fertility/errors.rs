//! Errors for the fertility model (data loading, parameter vectors, model
//! evaluation and fitted-state access).
//!
//! ## Conventions
//! - **Indices are 0-based.**
//! - Inside the objective, evaluation failures never escape as errors: the
//!   likelihood maps them onto the infeasibility penalty. These variants
//!   surface only through the fallible APIs (`try_compute_model_values`,
//!   scoring, data loading, fitted-state accessors).
//! - Optimizer failures are reported as
//!   [`OptError`](crate::optimization::errors::OptError); a `ModelError` can
//!   travel inside `OptError::Model`.

/// Result alias for fertility-model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Unified error type for the fertility model layer.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    // ---- Input/data validation ----
    /// No observations were supplied.
    EmptyData,

    /// Observation columns have different lengths.
    LengthMismatch { y: usize, n: usize, e_plus_theta: usize },

    /// CSV input could not be parsed (missing column, bad cell, ...).
    Csv { reason: String },

    /// Input file could not be opened or read.
    Io { reason: String },

    // ---- Parameters ----
    /// Parameter vector does not have the expected number of entries.
    ParamLengthMismatch { expected: usize, actual: usize },

    // ---- Model evaluation ----
    /// A model-implied quantity is NaN or infinite.
    NonFinitePrediction { index: usize, quantity: &'static str, value: f64 },

    // ---- Estimation ----
    /// Model hasn't been fitted yet.
    ModelNotFitted,
}

impl std::error::Error for ModelError {}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input/data validation ----
            ModelError::EmptyData => {
                write!(f, "Input data is empty.")
            }
            ModelError::LengthMismatch { y, n, e_plus_theta } => {
                write!(
                    f,
                    "Observation columns must have equal length; got y: {y}, n: {n}, e+theta: {e_plus_theta}"
                )
            }
            ModelError::Csv { reason } => {
                write!(f, "Could not parse CSV input: {reason}")
            }
            ModelError::Io { reason } => {
                write!(f, "Could not read input: {reason}")
            }
            // ---- Parameters ----
            ModelError::ParamLengthMismatch { expected, actual } => {
                write!(f, "Parameter vector must have length {expected}; got {actual}")
            }
            // ---- Model evaluation ----
            ModelError::NonFinitePrediction { index, quantity, value } => {
                write!(f, "Model produced non-finite {quantity} at index {index}: {value}")
            }
            // ---- Estimation ----
            ModelError::ModelNotFitted => {
                write!(f, "Model hasn't been fitted yet.")
            }
        }
    }
}

impl From<csv::Error> for ModelError {
    fn from(err: csv::Error) -> ModelError {
        if err.is_io_error() {
            return ModelError::Io { reason: err.to_string() };
        }
        ModelError::Csv { reason: err.to_string() }
    }
}

impl From<std::io::Error> for ModelError {
    fn from(err: std::io::Error) -> ModelError {
        ModelError::Io { reason: err.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Display messages name the offending quantity and position.
    //
    // Given
    // -----
    // - A `NonFinitePrediction` for `n_hat` at index 4.
    // - A `LengthMismatch` with three different column lengths.
    //
    // Expect
    // ------
    // - Messages containing the quantity, the index and the lengths.
    fn display_reports_context() {
        let pred = ModelError::NonFinitePrediction { index: 4, quantity: "n_hat", value: f64::NAN };
        let len = ModelError::LengthMismatch { y: 3, n: 2, e_plus_theta: 3 };

        assert_eq!(pred.to_string(), "Model produced non-finite n_hat at index 4: NaN");
        assert!(len.to_string().contains("y: 3, n: 2, e+theta: 3"));
    }

    #[test]
    // Purpose
    // -------
    // I/O failures are kept apart from parse failures.
    //
    // Given
    // -----
    // - A `std::io::Error` of kind `NotFound`.
    //
    // Expect
    // ------
    // - `ModelError::Io`.
    fn io_error_maps_to_io_variant() {
        let err: ModelError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, ModelError::Io { .. }));
    }
}
