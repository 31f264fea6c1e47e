mod application;
mod domain;
mod infrastructure;
mod presentation;

use crate::domain::errors::CallError;
use crate::presentation::cli::Cli;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

/// restcall: one REST call per invocation
///
/// Merges saved profile defaults, command-line flags and JSON payload
/// fragments into a single request, sends it with bounded retries on
/// network failures and 5xx responses, and prints the response.
#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = cli.run().await {
        eprintln!("{} {:#}", "Error:".red(), err);
        let configuration = err
            .downcast_ref::<CallError>()
            .is_some_and(CallError::is_configuration);
        std::process::exit(if configuration { 2 } else { 1 });
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "restcall=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
