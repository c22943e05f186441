pub mod classifier_trait;
pub mod factory;
pub mod inputs;
pub mod logistic;
pub mod optimizer;

pub use classifier_trait::{ClassifierModel, TrainingOptions};
pub use inputs::{FeatureInputs, LabeledInputs};
pub use logistic::LogisticModel;
