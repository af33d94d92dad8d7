mod cli;
mod commands;
mod error;
mod logging;
mod preflight;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::Result;
use clap::Parser;
use mutascan::engine::config::ScanMode;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run_app().await {
        eprintln!("\nFATAL ERROR: {}", e);
        std::process::exit(1);
    }
}

async fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    info!("mutascan v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let command_result = match cli.command {
        Commands::Full(args) => {
            info!("Dispatching full saturation scan.");
            commands::scan::run(args.scan, ScanMode::Full).await
        }
        Commands::Manual(args) => {
            info!("Dispatching manual scan.");
            commands::scan::run(args.scan, ScanMode::Manual(args.mutate)).await
        }
    };

    match &command_result {
        Ok(_) => info!("Command completed successfully."),
        // Per-variant failures never reach here; this is the fatal
        // precondition path only.
        Err(e) => error!("Command failed: {}", e),
    }

    command_result
}
