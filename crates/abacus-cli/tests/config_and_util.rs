use std::io::Write;

use abacus_cli::cli::build_cli;
use abacus_cli::experiment::input::RunConfig;
use abacus_cli::server::ServerConfig;
use abacus_cli::util::{validate_table_file, write_output_file, TableFormat};

fn csv_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "x,label\n1,a\n2,b").unwrap();
    file
}

#[test]
fn validate_accepts_existing_csv_and_tsv() {
    let file = csv_file();
    let format = validate_table_file(file.path().to_str().unwrap()).unwrap();
    assert_eq!(format, TableFormat::Csv);
    assert_eq!(format.delimiter(), b',');

    let tsv = tempfile::Builder::new().suffix(".TSV").tempfile().unwrap();
    let format = validate_table_file(tsv.path().to_str().unwrap()).unwrap();
    assert_eq!(format, TableFormat::Tsv);
    assert_eq!(format.delimiter(), b'\t');
}

#[test]
fn validate_rejects_wrong_extension_and_missing_file() {
    let txt = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    let err = validate_table_file(txt.path().to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains(".tsv or .csv"));

    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.csv");
    let err = validate_table_file(missing.to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}

#[test]
fn write_output_creates_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.json");
    write_output_file(path.to_str().unwrap(), b"{}").unwrap();
    assert_eq!(std::fs::read_to_string(path).unwrap(), "{}");
}

#[test]
fn write_output_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("runs").join("2024").join("result.json");
    write_output_file(path.to_str().unwrap(), b"{\"test_accuracy\":1.0}").unwrap();
    assert_eq!(
        std::fs::read_to_string(path).unwrap(),
        "{\"test_accuracy\":1.0}"
    );
}

#[test]
fn run_config_applies_cli_overrides() {
    let data = csv_file();
    let data_path = data.path().to_str().unwrap().to_string();

    let mut config_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        config_file,
        r#"{{"output_file": "from_config.json", "model": {{"epochs": 5, "random_state": 7}}}}"#
    )
    .unwrap();

    let matches = build_cli()
        .try_get_matches_from([
            "abacus",
            "run",
            data_path.as_str(),
            config_file.path().to_str().unwrap(),
            "--seed",
            "42",
            "--report",
            "report.html",
        ])
        .unwrap();
    let (_, run_m) = matches.subcommand().unwrap();

    let config = RunConfig::from_arguments(Some(config_file.path()), run_m).unwrap();
    assert_eq!(config.data, data_path);
    assert_eq!(config.output_file.as_deref(), Some("from_config.json"));
    assert_eq!(config.report_file.as_deref(), Some("report.html"));
    assert_eq!(config.model.epochs, 5);
    assert_eq!(config.model.random_state, 42);
    assert_eq!(config.model.batch_size, 100);
}

#[test]
fn run_config_rejects_zero_epochs() {
    let data = csv_file();
    let matches = build_cli()
        .try_get_matches_from([
            "abacus",
            "run",
            data.path().to_str().unwrap(),
            "--epochs",
            "0",
        ])
        .unwrap();
    let (_, run_m) = matches.subcommand().unwrap();
    assert!(RunConfig::from_arguments(None::<&std::path::Path>, run_m).is_err());
}

#[test]
fn server_config_defaults_and_overrides() {
    let defaults = ServerConfig::default();
    assert_eq!(defaults.host, "0.0.0.0");
    assert_eq!(defaults.port, 5000);

    let matches = build_cli()
        .try_get_matches_from(["abacus", "serve", "--port", "8080"])
        .unwrap();
    let (_, serve_m) = matches.subcommand().unwrap();
    let config = ServerConfig::from_arguments(None::<&std::path::Path>, serve_m).unwrap();
    assert_eq!(config.port, 8080);
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.model.epochs, 60);
}
