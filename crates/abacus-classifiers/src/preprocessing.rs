//! Preprocessing shared by the experiment runner.
//!
//! Provides a standard scaler (per-column mean and sample standard
//! deviation) and the binary label encoding of the target column.
//!
//! The scaler is fitted on every row it is given. The runner fits it on the
//! full cleaned dataset before partitioning, so test rows contribute to the
//! statistics applied to the training rows. This leaks test-set information
//! into training and is kept deliberately so results stay comparable with
//! earlier runs of the upload endpoint.

use ndarray::{Array2, Axis};
use rayon::prelude::*;
use serde::ser::{Serialize, SerializeMap, Serializer};
use statrs::statistics::Statistics;

use crate::error::{Result, RunnerError};

/// Standard scaler (per-column mean / sample std).
#[derive(Clone, Debug, PartialEq)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

impl Scaler {
    /// Columns whose standard deviation is zero or undefined. Transforming
    /// them yields NaN or infinite values.
    pub fn degenerate_columns(&self) -> Vec<usize> {
        self.std
            .iter()
            .enumerate()
            .filter(|(_, s)| !(s.is_finite() && **s != 0.0))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Fit a `Scaler` from a matrix where rows are samples and columns are
/// features. Uses Bessel's correction (ddof = 1); a single row gives an
/// undefined (NaN) deviation.
pub fn fit_scaler(x: &Array2<f64>) -> Scaler {
    let (mean, std): (Vec<f64>, Vec<f64>) = (0..x.ncols())
        .into_par_iter()
        .map(|c| {
            let column = x.column(c);
            (column.iter().mean(), column.iter().std_dev())
        })
        .unzip();

    Scaler { mean, std }
}

/// Transform all rows using the provided `Scaler`.
///
/// There is no guard against a zero deviation: such columns become NaN
/// (0 / 0) or infinite.
pub fn transform_all(x: &Array2<f64>, sc: &Scaler) -> Array2<f64> {
    let mut out = x.clone();
    for (c, mut column) in out.axis_iter_mut(Axis(1)).enumerate() {
        let (mean, std) = (sc.mean[c], sc.std[c]);
        column.mapv_inplace(|v| (v - mean) / std);
    }
    out
}

/// Fit a scaler and return it with the transformed matrix.
pub fn fit_transform(x: &Array2<f64>) -> (Scaler, Array2<f64>) {
    let sc = fit_scaler(x);
    let transformed = transform_all(x, &sc);
    (sc, transformed)
}

/// Binary encoding of the target column.
///
/// The first distinct value seen in a single linear scan maps to 0 and the
/// second to 1. Serializes as a JSON object in that order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelMap {
    labels: [String; 2],
}

impl LabelMap {
    /// Scan `values` once, recording distinct values in order of first
    /// appearance. Fails unless exactly two distinct values are present.
    pub fn fit<I, S>(column: &str, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut distinct: Vec<String> = Vec::new();
        for value in values {
            let value = value.as_ref();
            if !distinct.iter().any(|d| d == value) {
                distinct.push(value.to_string());
            }
        }

        if distinct.len() != 2 {
            return Err(RunnerError::Schema {
                column: column.to_string(),
                count: distinct.len(),
            });
        }

        let mut labels = distinct.into_iter();
        match (labels.next(), labels.next()) {
            (Some(negative), Some(positive)) => Ok(LabelMap {
                labels: [negative, positive],
            }),
            _ => unreachable!("exactly two labels checked above"),
        }
    }

    pub fn encode(&self, value: &str) -> Option<u8> {
        self.labels.iter().position(|l| l == value).map(|i| i as u8)
    }

    pub fn decode(&self, code: u8) -> Option<&str> {
        self.labels.get(code as usize).map(String::as_str)
    }

    /// `(raw value, code)` pairs in code order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, u8)> {
        self.labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.as_str(), i as u8))
    }
}

impl Serialize for LabelMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.labels.len()))?;
        for (label, code) in self.entries() {
            map.serialize_entry(label, &code)?;
        }
        map.end()
    }
}
