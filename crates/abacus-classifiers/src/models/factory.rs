use crate::config::{ModelConfig, OptimizerType};
use crate::error::Result;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::logistic::LogisticModel;

/// Build a boxed classifier shaped to `feature_names` from a `ModelConfig`.
///
/// Currently every optimizer drives the same single-unit logistic model.
pub fn build_model(
    feature_names: &[String],
    params: &ModelConfig,
) -> Result<Box<dyn ClassifierModel>> {
    match params.optimizer {
        OptimizerType::RmsProp { .. } => {
            Ok(Box::new(LogisticModel::build(feature_names, params)?))
        }
    }
}
