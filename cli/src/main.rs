//! Datacats CLI - self-contained open-data portal projects

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use datacats_cli::cli::Cli;
use datacats_cli::domain::{ConfigError, RuntimeError, ValidationError};
use datacats_cli::output::json;

/// Environment variable holding a tracing filter, e.g. `datacats_cli=debug`.
const LOG_ENV: &str = "DATACATS_LOG";

/// Logs go to stderr so stdout stays clean for results and `--json`.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "datacats_cli=debug,info",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Exit code and machine-readable code for a failed command.
fn classify(err: &anyhow::Error) -> (u8, &'static str) {
    if err.downcast_ref::<ValidationError>().is_some() {
        (2, "validation_error")
    } else if err.downcast_ref::<ConfigError>().is_some() {
        (2, "config_error")
    } else if err.downcast_ref::<RuntimeError>().is_some() {
        (1, "runtime_error")
    } else {
        (1, "error")
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let as_json = cli.json;

    match cli.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let (code, kind) = classify(&err);
            let message = format!("{err:#}");
            match json::format_error(&message, kind) {
                Ok(doc) if as_json => println!("{doc}"),
                _ => eprintln!("Error: {message}"),
            }
            ExitCode::from(code)
        }
    }
}
