use std::fs::File;
use std::io::BufReader;

use abacus_classifiers::io::read_delimited_table;
use abacus_classifiers::report::build_html_report;
use abacus_classifiers::{ExperimentResult, ExperimentRunner};
use anyhow::{Context, Result};

use crate::experiment::input::RunConfig;
use crate::util::{validate_table_file, write_output_file};

pub fn run_experiment(config: &RunConfig) -> Result<ExperimentResult> {
    let format = validate_table_file(&config.data)?;
    log::info!("Loading {:?} dataset: {}", format, config.data);
    let file = File::open(&config.data)
        .with_context(|| format!("Failed to open dataset: {}", config.data))?;
    let dataset = read_delimited_table(BufReader::new(file), format.delimiter())?;

    let runner = ExperimentRunner::new(config.model.clone());
    let result = runner.run(&dataset)?;
    Ok(result)
}

/// Write the result JSON to `config.output_file`, or stdout when unset.
pub fn write_result(result: &ExperimentResult, config: &RunConfig) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(result)?;
    match &config.output_file {
        Some(path) => {
            write_output_file(path, &bytes)?;
            log::info!("Result saved to: {}", path);
        }
        None => println!("{}", String::from_utf8_lossy(&bytes)),
    }
    Ok(())
}

pub fn write_report(result: &ExperimentResult, config: &RunConfig) -> Result<()> {
    let Some(path) = &config.report_file else {
        return Ok(());
    };
    build_html_report(result, &config.model)
        .save_to_file(path)
        .with_context(|| format!("Failed to write report: {}", path))?;
    log::info!("Report saved to: {}", path);
    Ok(())
}
