//! Single-layer logistic classifier built from named scalar inputs.
//!
//! The model declares one input slot per feature name, concatenates the
//! slots into a vector in declaration order and feeds a single dense unit
//! with a sigmoid activation. Its shape is therefore fixed by the feature
//! list handed to `build`, with `n_features + 1` trainable scalars.
use ndarray::{s, Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::config::{ModelConfig, OptimizerType};
use crate::data_handling::validation_split;
use crate::error::{Result, RunnerError};
use crate::models::classifier_trait::{ClassifierModel, TrainingOptions};
use crate::models::inputs::{FeatureInputs, LabeledInputs};
use crate::models::optimizer::RmsProp;
use crate::stats::{Evaluation, History};

pub struct LogisticModel {
    inputs: Vec<String>,
    kernel: Array1<f64>,
    bias: f64,
    optimizer: RmsProp,
    rng: StdRng,
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl LogisticModel {
    /// Build an untrained model with one input per name in `feature_names`.
    ///
    /// The kernel is Glorot-uniform initialised from `config.random_state`;
    /// the same generator later drives per-epoch shuffling, so a given seed
    /// reproduces a run exactly.
    pub fn build(feature_names: &[String], config: &ModelConfig) -> Result<Self> {
        if feature_names.is_empty() {
            return Err(RunnerError::DegenerateFeature(
                "no feature columns".to_string(),
            ));
        }
        for (i, name) in feature_names.iter().enumerate() {
            if feature_names[..i].contains(name) {
                return Err(RunnerError::Training(format!(
                    "duplicate model input '{}'",
                    name
                )));
            }
        }

        let n = feature_names.len();
        let mut rng = StdRng::seed_from_u64(config.random_state);
        let limit = (6.0 / (n as f64 + 1.0)).sqrt();
        let kernel: Array1<f64> = (0..n).map(|_| rng.gen_range(-limit..limit)).collect();

        let optimizer = match config.optimizer {
            OptimizerType::RmsProp { rho, epsilon } => {
                RmsProp::new(config.learning_rate, rho, epsilon, n)
            }
        };

        Ok(LogisticModel {
            inputs: feature_names.to_vec(),
            kernel,
            bias: 0.0,
            optimizer,
            rng,
        })
    }

    pub fn input_names(&self) -> &[String] {
        &self.inputs
    }

    pub fn kernel(&self) -> &Array1<f64> {
        &self.kernel
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Gather the declared input slots into a rows x inputs matrix.
    fn concatenate(&self, inputs: &FeatureInputs) -> Result<Array2<f64>> {
        let nrows = inputs.nrows()?;

        if let Some(extra) = inputs.names().find(|n| !self.inputs.iter().any(|i| i == n)) {
            return Err(RunnerError::Training(format!(
                "unexpected model input '{}'",
                extra
            )));
        }

        let columns = self
            .inputs
            .iter()
            .map(|name| {
                inputs.get(name).ok_or_else(|| {
                    RunnerError::Training(format!("missing model input '{}'", name))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Array2::from_shape_fn((nrows, columns.len()), |(r, c)| {
            columns[c][r]
        }))
    }

    fn forward(&self, x: &Array2<f64>) -> Array1<f64> {
        (x.dot(&self.kernel) + self.bias).mapv(sigmoid)
    }
}

impl ClassifierModel for LogisticModel {
    fn fit(&mut self, data: &LabeledInputs, options: &TrainingOptions) -> Result<History> {
        if options.epochs == 0 || options.batch_size == 0 {
            return Err(RunnerError::Training(
                "epochs and batch_size must be at least 1".to_string(),
            ));
        }

        let x = self.concatenate(&data.features)?;
        if x.nrows() != data.labels.len() {
            return Err(RunnerError::Training(format!(
                "{} label values for {} input rows",
                data.labels.len(),
                x.nrows()
            )));
        }
        let y = Array1::from(data.labels.clone());

        let (fit_rows, val_rows) = validation_split(x.nrows(), options.validation_split)?;
        let x_fit = x.slice(s![fit_rows.clone(), ..]).to_owned();
        let y_fit = y.slice(s![fit_rows]).to_owned();
        let x_val = x.slice(s![val_rows.clone(), ..]).to_owned();
        let y_val = y.slice(s![val_rows]).to_vec();

        log::debug!(
            "Fitting {} inputs on {} rows, validating on {} rows, {} epochs",
            self.inputs.len(),
            x_fit.nrows(),
            x_val.nrows(),
            options.epochs
        );

        let n_fit = x_fit.nrows() as f64;
        let mut order: Vec<usize> = (0..x_fit.nrows()).collect();
        let mut history = History::new();

        for epoch in 0..options.epochs {
            order.shuffle(&mut self.rng);

            let mut loss_sum = 0.0;
            let mut accuracy_sum = 0.0;
            for batch in order.chunks(options.batch_size) {
                let xb = x_fit.select(Axis(0), batch);
                let yb = y_fit.select(Axis(0), batch);
                let m = batch.len() as f64;

                let probs = self.forward(&xb);
                let batch_eval = Evaluation::compute(&probs.to_vec(), &yb.to_vec());
                loss_sum += batch_eval.loss * m;
                accuracy_sum += batch_eval.accuracy * m;

                let err = &probs - &yb;
                let kernel_grad = xb.t().dot(&err) / m;
                let bias_grad = err.sum() / m;
                self.optimizer
                    .step(&mut self.kernel, &mut self.bias, &kernel_grad, bias_grad);
            }

            let train = Evaluation {
                loss: loss_sum / n_fit,
                accuracy: accuracy_sum / n_fit,
            };
            let validation = Evaluation::compute(&self.forward(&x_val).to_vec(), &y_val);
            log::trace!(
                "Epoch {}/{}: loss={:.4} accuracy={:.4} val_loss={:.4} val_accuracy={:.4}",
                epoch + 1,
                options.epochs,
                train.loss,
                train.accuracy,
                validation.loss,
                validation.accuracy
            );
            history.record_epoch(train, validation);
        }

        Ok(history)
    }

    fn predict_proba(&self, inputs: &FeatureInputs) -> Result<Vec<f64>> {
        let x = self.concatenate(inputs)?;
        Ok(self.forward(&x).to_vec())
    }

    fn parameter_count(&self) -> usize {
        self.kernel.len() + 1
    }

    fn name(&self) -> &str {
        "logistic_regression"
    }
}
