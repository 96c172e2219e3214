//! ShareVault admin CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.execute().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

/// RUST_LOG wins when set; `--verbose` otherwise opens up our own
/// crates to debug level while keeping dependencies quiet.
fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        "warn,sharevault_core=debug,sharevault_database=debug,sharevault_auth=debug,\
         sharevault_service=debug,sharevault_cli=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_target(verbose)
        .init();
}
