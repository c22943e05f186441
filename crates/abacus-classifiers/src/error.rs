use thiserror::Error;

/// Errors raised while running a logistic-regression experiment.
///
/// Every variant renders as a single human readable message; callers are
/// expected to surface that message as-is.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The target column does not hold exactly two distinct values.
    #[error("The target column '{column}' must have exactly two unique classes for logistic regression, but it has {count}.")]
    Schema { column: String, count: usize },

    /// At least one retained cell is missing.
    #[error("Dataset contains missing values. Please clean the data before uploading.")]
    DataQuality { missing: usize },

    /// No usable numeric feature column remained.
    #[error("Degenerate feature set: {0}")]
    DegenerateFeature(String),

    /// Model construction, fitting or evaluation failed.
    #[error("Training failed: {0}")]
    Training(String),

    /// The upload could not be read as a rectangular table.
    #[error("Failed to parse dataset: {0}")]
    Parse(String),
}

impl RunnerError {
    /// Stable taxonomy name, used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            RunnerError::Schema { .. } => "schema",
            RunnerError::DataQuality { .. } => "data_quality",
            RunnerError::DegenerateFeature(_) => "degenerate_feature",
            RunnerError::Training(_) => "training",
            RunnerError::Parse(_) => "parse",
        }
    }
}

impl From<csv::Error> for RunnerError {
    fn from(err: csv::Error) -> Self {
        RunnerError::Parse(err.to_string())
    }
}

impl From<std::io::Error> for RunnerError {
    fn from(err: std::io::Error) -> Self {
        RunnerError::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RunnerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_cites_count() {
        let err = RunnerError::Schema {
            column: "label".to_string(),
            count: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("'label'"));
        assert!(msg.ends_with("but it has 3."));
        assert_eq!(err.kind(), "schema");
    }

    #[test]
    fn data_quality_message_is_stable() {
        let err = RunnerError::DataQuality { missing: 4 };
        assert_eq!(
            err.to_string(),
            "Dataset contains missing values. Please clean the data before uploading."
        );
    }
}
