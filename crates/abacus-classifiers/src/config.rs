use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Result, RunnerError};

/// Central configuration for an experiment run.
///
/// Defaults reproduce the fixed settings of the upload endpoint: RMSProp at
/// 0.001, 60 epochs, batches of 100, a 20% test split and 20% of the
/// training partition held out for validation, seeded with 100.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    pub learning_rate: f64,
    pub epochs: usize,
    pub batch_size: usize,
    /// Fraction of the training partition the fitting procedure holds out.
    pub validation_split: f64,
    /// Fraction of all rows reserved for the final evaluation.
    pub test_size: f64,
    pub random_state: u64,
    pub optimizer: OptimizerType,
}

/// Supported optimizers and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum OptimizerType {
    #[serde(rename = "rmsprop")]
    RmsProp { rho: f64, epsilon: f64 },
}

impl Default for OptimizerType {
    fn default() -> Self {
        OptimizerType::RmsProp {
            rho: 0.9,
            epsilon: 1e-7,
        }
    }
}

impl FromStr for OptimizerType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rmsprop" | "rms_prop" => Ok(OptimizerType::default()),
            _ => Err(format!("Unknown optimizer: {}", s)),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.001,
            epochs: 60,
            batch_size: 100,
            validation_split: 0.2,
            test_size: 0.2,
            random_state: 100,
            optimizer: OptimizerType::default(),
        }
    }
}

impl ModelConfig {
    pub fn with_seed(mut self, random_state: u64) -> Self {
        self.random_state = random_state;
        self
    }

    /// Reject settings the training loop cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(RunnerError::Training("epochs must be at least 1".to_string()));
        }
        if self.batch_size == 0 {
            return Err(RunnerError::Training(
                "batch_size must be at least 1".to_string(),
            ));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(RunnerError::Training(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        for (name, value) in [
            ("validation_split", self.validation_split),
            ("test_size", self.test_size),
        ] {
            if !(value > 0.0 && value < 1.0) {
                return Err(RunnerError::Training(format!(
                    "{} must lie strictly between 0 and 1, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}
