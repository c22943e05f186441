//! abacus-classifiers: binary logistic-regression experiments over uploaded
//! tabular data.
//!
//! The crate reads a CSV table, infers which columns are numeric features and
//! which is the target, standardizes and encodes them, fits a single-unit
//! logistic model with RMSProp and reports test metrics alongside the
//! per-epoch training history. `runner::ExperimentRunner` ties the pieces
//! together; the other modules are usable on their own.
pub mod config;
pub mod data_handling;
pub mod error;
pub mod io;
pub mod models;
pub mod preprocessing;
pub mod report;
pub mod runner;
pub mod stats;

pub use error::{Result, RunnerError};
pub use runner::{ExperimentResult, ExperimentRunner};
