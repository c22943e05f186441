//! The experiment runner: one uploaded table in, one trained-and-evaluated
//! logistic model summary out.
//!
//! A run walks the same fixed sequence every time:
//!
//! 1. infer the schema (last column is the target, numeric columns before
//!    it are features, anything else is dropped),
//! 2. reject tables with missing cells in the retained columns,
//! 3. standardize every feature over the whole cleaned table,
//! 4. encode the target by order of first appearance,
//! 5. shuffle-split rows into a training pool and a test partition,
//! 6. build a model with one input per feature,
//! 7. fit it, letting the fitting procedure hold out its own validation
//!    tail,
//! 8. evaluate on the test partition,
//! 9. assemble an `ExperimentResult`.
//!
//! Any failure aborts the run; no partial result is produced.
use ndarray::Array2;
use serde::Serialize;

use crate::config::ModelConfig;
use crate::data_handling::{train_test_split, Dataset};
use crate::error::{Result, RunnerError};
use crate::models::factory::build_model;
use crate::models::{FeatureInputs, LabeledInputs, TrainingOptions};
use crate::preprocessing::{fit_transform, LabelMap, Scaler};
use crate::stats::History;

/// Column roles inferred from a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Numeric non-target columns, in table order.
    pub feature_columns: Vec<String>,
    pub target_column: String,
    /// Non-numeric candidate columns that were left out.
    pub dropped_columns: Vec<String>,
}

/// Split the columns of `dataset` into features and target.
///
/// Fails with `RunnerError::DegenerateFeature` when the table has no
/// candidate feature columns or none of them is numeric.
pub fn infer_schema(dataset: &Dataset) -> Result<Schema> {
    if dataset.ncols() < 2 {
        return Err(RunnerError::DegenerateFeature(format!(
            "expected feature columns followed by a target column, found {} column(s)",
            dataset.ncols()
        )));
    }

    let (target, candidates) = match dataset.columns().split_last() {
        Some(split) => split,
        None => return Err(RunnerError::DegenerateFeature("no columns".to_string())),
    };

    let (numeric, other): (Vec<_>, Vec<_>) = candidates.iter().partition(|c| c.is_numeric());
    let feature_columns: Vec<String> = numeric.into_iter().map(|c| c.name.clone()).collect();
    let dropped_columns: Vec<String> = other.into_iter().map(|c| c.name.clone()).collect();

    if feature_columns.is_empty() {
        return Err(RunnerError::DegenerateFeature(
            "no feature columns".to_string(),
        ));
    }

    Ok(Schema {
        feature_columns,
        target_column: target.name.clone(),
        dropped_columns,
    })
}

/// A dataset after cleaning, normalization and label encoding, before any
/// partitioning.
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub schema: Schema,
    pub scaler: Scaler,
    /// Standardized features, rows x `schema.feature_columns`.
    pub features: Array2<f64>,
    /// Encoded target, 0.0 or 1.0 per row.
    pub labels: Vec<f64>,
    pub target_map: LabelMap,
}

/// Outcome of a successful run.
///
/// Serializes to `{test_accuracy, training_history, target_map,
/// feature_columns, test_loss}`. Non-finite floats become JSON `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentResult {
    pub test_accuracy: f64,
    pub training_history: History,
    pub target_map: LabelMap,
    pub feature_columns: Vec<String>,
    pub test_loss: f64,
}

/// Runs experiments with a fixed configuration. Holds no per-run state, so
/// one runner can serve concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct ExperimentRunner {
    config: ModelConfig,
}

impl ExperimentRunner {
    pub fn new(config: ModelConfig) -> Self {
        ExperimentRunner { config }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Schema inference, cleaning, normalization and label encoding.
    ///
    /// The scaler is fitted on every cleaned row, test rows included.
    pub fn prepare(&self, dataset: &Dataset) -> Result<PreparedData> {
        let schema = infer_schema(dataset)?;
        if !schema.dropped_columns.is_empty() {
            log::info!(
                "Dropping non-numeric columns: {}",
                schema.dropped_columns.join(", ")
            );
        }
        log::info!(
            "Target column '{}', {} feature column(s): {}",
            schema.target_column,
            schema.feature_columns.len(),
            schema.feature_columns.join(", ")
        );

        let mut retained = schema.feature_columns.clone();
        retained.push(schema.target_column.clone());
        let cleaned = dataset.select_columns(&retained)?;

        let missing = cleaned.missing_count();
        if missing > 0 {
            log::warn!("Found {} missing value(s) in retained columns", missing);
            return Err(RunnerError::DataQuality { missing });
        }

        let raw = cleaned.feature_matrix(&schema.feature_columns)?;
        let (scaler, features) = fit_transform(&raw);
        for c in scaler.degenerate_columns() {
            log::warn!(
                "Feature '{}' has zero or undefined standard deviation (std = {}); its normalized values are not finite",
                schema.feature_columns[c],
                scaler.std[c]
            );
        }

        let target = cleaned.last_column();
        let keys = (0..cleaned.nrows())
            .map(|row| target.label_key(row))
            .collect::<Option<Vec<String>>>()
            .ok_or(RunnerError::DataQuality {
                missing: target.missing_count(),
            })?;
        let target_map = LabelMap::fit(&schema.target_column, &keys)?;
        log::debug!(
            "Target map: {}",
            target_map
                .entries()
                .map(|(label, code)| format!("{} -> {}", label, code))
                .collect::<Vec<_>>()
                .join(", ")
        );

        let labels = keys
            .iter()
            .map(|key| {
                target_map.encode(key).map(f64::from).ok_or_else(|| {
                    RunnerError::Training(format!("unencodable target value '{}'", key))
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        Ok(PreparedData {
            schema,
            scaler,
            features,
            labels,
            target_map,
        })
    }

    /// Run the full experiment on `dataset`.
    pub fn run(&self, dataset: &Dataset) -> Result<ExperimentResult> {
        self.config.validate()?;
        dataset.log_summary();

        let prepared = self.prepare(dataset)?;
        let feature_columns = &prepared.schema.feature_columns;

        let partition = train_test_split(
            prepared.labels.len(),
            self.config.test_size,
            self.config.random_state,
        )?;
        log::info!(
            "Split {} rows into {} training and {} test rows (seed {})",
            prepared.labels.len(),
            partition.train.len(),
            partition.test.len(),
            self.config.random_state
        );

        let select = |rows: &[usize]| -> Result<LabeledInputs> {
            let features = FeatureInputs::from_matrix_rows(feature_columns, &prepared.features, rows);
            LabeledInputs::new(features, rows.iter().map(|&r| prepared.labels[r]).collect())
        };
        let train = select(&partition.train)?;
        let test = select(&partition.test)?;

        let mut model = build_model(feature_columns, &self.config)?;
        log::debug!(
            "Built {} with {} trainable parameters",
            model.name(),
            model.parameter_count()
        );

        let training_history = model.fit(&train, &TrainingOptions::from(&self.config))?;
        if let (Some(loss), Some(val_loss)) = (
            training_history.last("loss"),
            training_history.last("val_loss"),
        ) {
            log::info!(
                "Finished {} epochs: loss={:.4} val_loss={:.4}",
                training_history.epochs(),
                loss,
                val_loss
            );
        }

        let evaluation = model.evaluate(&test)?;
        log::info!(
            "Test accuracy: {:.4}, test loss: {:.4}",
            evaluation.accuracy,
            evaluation.loss
        );

        Ok(ExperimentResult {
            test_accuracy: evaluation.accuracy,
            training_history,
            target_map: prepared.target_map,
            feature_columns: prepared.schema.feature_columns,
            test_loss: evaluation.loss,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_handling::{Cell, Column};

    fn numbers(name: &str, values: &[f64]) -> Column {
        Column::from_cells(name, values.iter().map(|&v| Cell::Number(v)).collect())
    }

    fn texts(name: &str, values: &[&str]) -> Column {
        Column::from_cells(
            name,
            values.iter().map(|v| Cell::Text(v.to_string())).collect(),
        )
    }

    #[test]
    fn runner_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ExperimentRunner>();
    }

    #[test]
    fn schema_keeps_numeric_columns_in_order() {
        let ds = Dataset::new(vec![
            numbers("b", &[1.0, 2.0]),
            texts("name", &["x", "y"]),
            numbers("a", &[3.5, 4.0]),
            texts("label", &["p", "q"]),
        ])
        .unwrap();
        let schema = infer_schema(&ds).unwrap();
        assert_eq!(schema.feature_columns, vec!["b", "a"]);
        assert_eq!(schema.dropped_columns, vec!["name"]);
        assert_eq!(schema.target_column, "label");
    }

    #[test]
    fn numeric_target_is_not_a_feature() {
        let ds = Dataset::new(vec![numbers("x", &[1.0, 2.0]), numbers("y", &[0.0, 1.0])]).unwrap();
        let schema = infer_schema(&ds).unwrap();
        assert_eq!(schema.feature_columns, vec!["x"]);
        assert_eq!(schema.target_column, "y");
    }

    #[test]
    fn no_numeric_candidates_is_degenerate() {
        let ds = Dataset::new(vec![texts("name", &["x", "y"]), texts("label", &["p", "q"])]).unwrap();
        assert_eq!(infer_schema(&ds).unwrap_err().kind(), "degenerate_feature");

        let ds = Dataset::new(vec![texts("label", &["p", "q"])]).unwrap();
        assert_eq!(infer_schema(&ds).unwrap_err().kind(), "degenerate_feature");
    }

    #[test]
    fn missing_target_cell_is_a_data_quality_error() {
        let ds = Dataset::new(vec![
            numbers("x", &[1.0, 2.0, 3.0]),
            Column::from_cells(
                "label",
                vec![
                    Cell::Text("a".to_string()),
                    Cell::Missing,
                    Cell::Text("b".to_string()),
                ],
            ),
        ])
        .unwrap();
        let err = ExperimentRunner::default().prepare(&ds).unwrap_err();
        assert!(matches!(err, RunnerError::DataQuality { missing: 1 }));
    }
}
