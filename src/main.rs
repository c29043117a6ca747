//! Entry point for the `lockranger` CLI. It sets up logging, parses
//! arguments, runs one lock session on the data file, and maps errors to
//! exit codes.

use lockranger::cli::Cli;
use lockranger::{exit_codes, startup};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::parse_args();

    match startup::run(cli) {
        Ok(end) => {
            log::info!("session finished: {:?}", end);
            ExitCode::from(exit_codes::SUCCESS as u8)
        }
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            ExitCode::from(err.exit_code() as u8)
        }
    }
}
