use std::path::PathBuf;

use clap::{Arg, Command, ValueHint};

/// Argument definitions for the `abacus` binary.
pub fn build_cli() -> Command {
    Command::new("abacus")
        .version(clap::crate_version!())
        .about("\u{1F9EE} Abacus - logistic-regression experiments on tabular data")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("run")
                .about("Train and evaluate a logistic model on a CSV dataset")
                .arg(
                    Arg::new("data")
                        .help("Path to the dataset (*.csv or *.tsv). The last column is the target.")
                        .required(true)
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("config")
                        .help("Path to experiment JSON configuration file")
                        .required(false)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .help("Path to write the result JSON. Defaults to stdout.")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .value_parser(clap::value_parser!(u64))
                        .help("Random seed for the split, initialization and shuffling. Overrides the configuration file."),
                )
                .arg(
                    Arg::new("epochs")
                        .long("epochs")
                        .value_parser(clap::value_parser!(usize))
                        .help("Number of training epochs. Overrides the configuration file."),
                )
                .arg(
                    Arg::new("report_file")
                        .long("report")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .help("Write an HTML report with training curves to this path.")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("serve")
                .about("Serve the dataset upload endpoint over HTTP")
                .arg(
                    Arg::new("config")
                        .help("Path to server JSON configuration file")
                        .required(false)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("host")
                        .long("host")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .help("Address to bind. Overrides the configuration file.")
                        .value_hint(ValueHint::Hostname),
                )
                .arg(
                    Arg::new("port")
                        .short('p')
                        .long("port")
                        .value_parser(clap::value_parser!(u16))
                        .help("Port to listen on. Overrides the configuration file."),
                ),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Version {version}\n\n\
             {all-args}{after-help}",
        )
}
