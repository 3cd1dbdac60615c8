//! Observation containers for the fertility model.
//!
//! Purpose
//! -------
//! Hold the observed macro series `(y, n, e+θ)` column-wise and load them
//! from a headed CSV table.
//!
//! Key behaviors
//! -------------
//! - [`FertilityData::new`] checks structure only: non-empty, equal-length
//!   columns. Values themselves are taken as given; NaN or negative entries
//!   simply flow into the objective, which maps any resulting numerical
//!   failure onto the infeasibility penalty.
//! - [`FertilityData::from_reader`] / [`FertilityData::from_csv_path`]
//!   deserialize rows through `csv` + `serde`. The education column is
//!   headed `e+theta`; extra columns are ignored.
//!
//! Invariants & assumptions
//! ------------------------
//! - `y.len() == n.len() == e_plus_theta.len() > 0`.
//! - Immutable after construction; every estimation run reads the same
//!   arrays.
use std::{fs::File, io::Read, path::Path};

use ndarray::Array1;
use serde::Deserialize;

use crate::fertility::errors::{ModelError, ModelResult};

/// Column-wise observations `(y, n, e+θ)`.
///
/// Fields
/// ------
/// - `y`: observed income per unit.
/// - `n`: observed fertility.
/// - `e_plus_theta`: observed education spending plus its fixed cost θ.
#[derive(Debug, Clone, PartialEq)]
pub struct FertilityData {
    pub y: Array1<f64>,
    pub n: Array1<f64>,
    pub e_plus_theta: Array1<f64>,
}

/// One CSV row; only the three model columns are read.
#[derive(Debug, Deserialize)]
struct ObservationRow {
    y: f64,
    n: f64,
    #[serde(rename = "e+theta")]
    e_plus_theta: f64,
}

impl FertilityData {
    /// Construct from three columns of equal, nonzero length.
    ///
    /// # Errors
    /// - [`ModelError::EmptyData`] if the columns are empty.
    /// - [`ModelError::LengthMismatch`] if the lengths differ.
    ///
    /// # Examples
    /// ```rust
    /// # use ndarray::array;
    /// # use fertility_mle::fertility::core::data::FertilityData;
    /// let data = FertilityData::new(array![10_000.0], array![2.1], array![75.0]).unwrap();
    /// assert_eq!(data.len(), 1);
    /// ```
    pub fn new(y: Array1<f64>, n: Array1<f64>, e_plus_theta: Array1<f64>) -> ModelResult<Self> {
        if y.len() != n.len() || y.len() != e_plus_theta.len() {
            return Err(ModelError::LengthMismatch {
                y: y.len(),
                n: n.len(),
                e_plus_theta: e_plus_theta.len(),
            });
        }
        if y.is_empty() {
            return Err(ModelError::EmptyData);
        }
        Ok(FertilityData { y, n, e_plus_theta })
    }

    /// Read a headed CSV table with columns `y`, `n` and `e+theta`.
    ///
    /// # Errors
    /// - [`ModelError::Csv`] for a missing column or an unparsable cell.
    /// - [`ModelError::Io`] if reading from `reader` fails.
    /// - [`ModelError::EmptyData`] if the table has a header but no rows.
    pub fn from_reader<R: Read>(reader: R) -> ModelResult<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut y = Vec::new();
        let mut n = Vec::new();
        let mut e_plus_theta = Vec::new();
        for row in csv_reader.deserialize::<ObservationRow>() {
            let row = row?;
            y.push(row.y);
            n.push(row.n);
            e_plus_theta.push(row.e_plus_theta);
        }
        FertilityData::new(Array1::from(y), Array1::from(n), Array1::from(e_plus_theta))
    }

    /// Open `path` and read it with [`FertilityData::from_reader`].
    ///
    /// # Errors
    /// - [`ModelError::Io`] if the file cannot be opened.
    /// - Anything [`FertilityData::from_reader`] returns.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> ModelResult<Self> {
        let file = File::open(path)?;
        FertilityData::from_reader(file)
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.y.len()
    }

    /// Always `false` for a constructed value; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }
}
