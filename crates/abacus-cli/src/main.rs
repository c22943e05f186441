use anyhow::Result;
use clap::ArgMatches;
use log::LevelFilter;
use std::path::PathBuf;

use abacus_cli::cli::build_cli;
use abacus_cli::experiment::input::RunConfig;
use abacus_cli::experiment::run::{run_experiment, write_report, write_result};
use abacus_cli::server::{self, ServerConfig};

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("ABACUS_LOG", "error,abacus=info"))
        .init();

    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("run", sub_m)) => handle_run(sub_m),
        Some(("serve", sub_m)) => handle_serve(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn handle_run(matches: &ArgMatches) -> Result<()> {
    let config_path: Option<&PathBuf> = matches.get_one("config");
    match config_path {
        Some(path) => log::info!("[Abacus::Run] Using config: {:?}", path),
        None => log::info!("[Abacus::Run] No config provided; using defaults."),
    }

    let config = RunConfig::from_arguments(config_path, matches)?;
    if config_path.is_none() {
        let default_json = serde_json::to_string_pretty(&config.model).unwrap_or_default();
        eprintln!("[Abacus::Run] Default model config:\n{}", default_json);
    }

    let result = match run_experiment(&config) {
        Ok(result) => result,
        Err(e) => {
            log::error!("Experiment failed: {:#}", e);
            std::process::exit(1)
        }
    };

    write_result(&result, &config)?;
    write_report(&result, &config)?;
    log::info!(
        "[Abacus::Run] Test accuracy {:.4} over {} feature(s)",
        result.test_accuracy,
        result.feature_columns.len()
    );
    Ok(())
}

fn handle_serve(matches: &ArgMatches) -> Result<()> {
    let config_path: Option<&PathBuf> = matches.get_one("config");
    let config = ServerConfig::from_arguments(config_path, matches)?;
    log::info!(
        "[Abacus::Serve] Starting server on {}:{}",
        config.host,
        config.port
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(server::serve(config))
}
