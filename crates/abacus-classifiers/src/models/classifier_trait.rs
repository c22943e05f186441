use crate::config::ModelConfig;
use crate::error::Result;
use crate::models::inputs::{FeatureInputs, LabeledInputs};
use crate::stats::{Evaluation, History};

/// Settings for one call to `ClassifierModel::fit`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingOptions {
    pub epochs: usize,
    pub batch_size: usize,
    /// Fraction of the rows passed to `fit` held out (from the tail) for
    /// per-epoch validation.
    pub validation_split: f64,
}

impl From<&ModelConfig> for TrainingOptions {
    fn from(config: &ModelConfig) -> Self {
        TrainingOptions {
            epochs: config.epochs,
            batch_size: config.batch_size,
            validation_split: config.validation_split,
        }
    }
}

/// Contract shared by classifiers the experiment runner can drive.
///
/// Labels use the 0/1 encoding produced by `LabelMap`.
pub trait ClassifierModel: Send {
    /// Fit in place and return per-epoch `loss`, `accuracy`, `val_loss` and
    /// `val_accuracy`.
    fn fit(&mut self, data: &LabeledInputs, options: &TrainingOptions) -> Result<History>;

    /// Positive-class probability for every row.
    fn predict_proba(&self, inputs: &FeatureInputs) -> Result<Vec<f64>>;

    fn evaluate(&self, data: &LabeledInputs) -> Result<Evaluation> {
        let probs = self.predict_proba(&data.features)?;
        Ok(Evaluation::compute(&probs, &data.labels))
    }

    /// Number of trainable scalars.
    fn parameter_count(&self) -> usize;

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}
