//! Named model inputs.
//!
//! Models take one column of values per feature name rather than a
//! pre-assembled matrix; each model decides how to concatenate the slots it
//! declared.
use ndarray::Array2;

use crate::error::{Result, RunnerError};

/// Ordered mapping of feature name to its column of values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureInputs {
    columns: Vec<(String, Vec<f64>)>,
}

impl FeatureInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build inputs from selected rows of a feature matrix whose columns
    /// follow `names`.
    pub fn from_matrix_rows(names: &[String], x: &Array2<f64>, rows: &[usize]) -> Self {
        let columns = names
            .iter()
            .enumerate()
            .map(|(c, name)| (name.clone(), rows.iter().map(|&r| x[(r, c)]).collect()))
            .collect();
        FeatureInputs { columns }
    }

    /// Insert or replace the column for `name`.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        let name = name.into();
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = values,
            None => self.columns.push((name, values)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn num_inputs(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows, or an error when columns disagree.
    pub fn nrows(&self) -> Result<usize> {
        let Some((_, first)) = self.columns.first() else {
            return Ok(0);
        };
        if let Some((name, bad)) = self.columns.iter().find(|(_, v)| v.len() != first.len()) {
            return Err(RunnerError::Training(format!(
                "input '{}' has {} rows, expected {}",
                name,
                bad.len(),
                first.len()
            )));
        }
        Ok(first.len())
    }
}

/// Feature inputs paired with 0/1 labels.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledInputs {
    pub features: FeatureInputs,
    pub labels: Vec<f64>,
}

impl LabeledInputs {
    pub fn new(features: FeatureInputs, labels: Vec<f64>) -> Result<Self> {
        let nrows = features.nrows()?;
        if nrows != labels.len() {
            return Err(RunnerError::Training(format!(
                "{} label values for {} input rows",
                labels.len(),
                nrows
            )));
        }
        Ok(LabeledInputs { features, labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_matrix_rows_selects_by_index() {
        let x = Array2::from_shape_vec((3, 2), vec![1.0, 10.0, 2.0, 20.0, 3.0, 30.0]).unwrap();
        let names = vec!["a".to_string(), "b".to_string()];
        let inputs = FeatureInputs::from_matrix_rows(&names, &x, &[2, 0]);
        assert_eq!(inputs.get("a"), Some(&[3.0, 1.0][..]));
        assert_eq!(inputs.get("b"), Some(&[30.0, 10.0][..]));
        assert_eq!(inputs.nrows().unwrap(), 2);
    }

    #[test]
    fn insert_replaces_existing_column() {
        let mut inputs = FeatureInputs::new();
        inputs.insert("a", vec![1.0]);
        inputs.insert("a", vec![2.0]);
        assert_eq!(inputs.num_inputs(), 1);
        assert_eq!(inputs.get("a"), Some(&[2.0][..]));
    }

    #[test]
    fn mismatched_labels_are_rejected() {
        let mut inputs = FeatureInputs::new();
        inputs.insert("a", vec![1.0, 2.0]);
        assert!(LabeledInputs::new(inputs.clone(), vec![0.0]).is_err());
        assert!(LabeledInputs::new(inputs, vec![0.0, 1.0]).is_ok());
    }
}
