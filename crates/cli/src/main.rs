mod cli;
mod extract;
mod fetch;
mod status;
mod validate;

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use aml_core::config::load_dotenv;
use aml_core::ScreeningConfig;

use crate::cli::{CliArgs, Command};
use crate::status::{render, ErrorLine};

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries the status lines.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    load_dotenv();
    let args = CliArgs::parse();
    let config = ScreeningConfig::from_env();
    config.log_summary();

    match args.command {
        Command::Extract(extract_args) => match extract::extract(&extract_args, &config) {
            Ok(line) => {
                println!("{}", render(&line));
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(error = %e, "extraction failed");
                println!("{}", render(&ErrorLine::new(e)));
                ExitCode::FAILURE
            }
        },
        Command::Validate(validate_args) => match validate::validate(&validate_args, &config) {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::FAILURE,
            Err(e) => {
                println!("FAIL: {e}");
                ExitCode::FAILURE
            }
        },
        Command::Fetch(fetch_args) => report_outcome(fetch::fetch(&fetch_args, &config).await),
        Command::Run(run_args) => report_outcome(fetch::run(&run_args, &config).await),
    }
}

fn report_outcome<T>(outcome: anyhow::Result<T>) -> ExitCode {
    match outcome {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            println!("FAILED: {e:#}");
            ExitCode::FAILURE
        }
    }
}
