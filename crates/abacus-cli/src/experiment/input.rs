use std::fs;
use std::path::Path;

use abacus_classifiers::config::ModelConfig;
use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::{Deserialize, Serialize};

use crate::util::validate_table_file;

/// Settings for one `abacus run` invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub data: String,
    /// Result JSON destination; stdout when unset.
    pub output_file: Option<String>,
    pub report_file: Option<String>,
    pub model: ModelConfig,
}

/// Load a run configuration from a JSON file.
pub fn load_run_config<P: AsRef<Path>>(path: P) -> Result<RunConfig> {
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
    let config: RunConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
    Ok(config)
}

impl RunConfig {
    /// Merge the optional config file with command line overrides and
    /// validate the result.
    pub fn from_arguments<P: AsRef<Path>>(config_path: Option<P>, matches: &ArgMatches) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => load_run_config(path)?,
            None => RunConfig::default(),
        };

        // Apply CLI overrides
        if let Some(data) = matches.get_one::<String>("data") {
            config.data = data.clone();
        }
        validate_table_file(&config.data)?;

        if let Some(output_file) = matches.get_one::<String>("output_file") {
            config.output_file = Some(output_file.clone());
        }

        if let Some(report_file) = matches.get_one::<String>("report_file") {
            config.report_file = Some(report_file.clone());
        }

        if let Some(seed) = matches.get_one::<u64>("seed") {
            config.model.random_state = *seed;
        }

        if let Some(epochs) = matches.get_one::<usize>("epochs") {
            config.model.epochs = *epochs;
        }

        config.model.validate()?;
        Ok(config)
    }
}
