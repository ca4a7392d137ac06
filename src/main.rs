// file: src/main.rs
// version: 1.0.0
// guid: b58e12c9-4f7a-4d03-8e61-a92c3d5f70b8

//! ds-client - Main entry point

use clap::Parser;
use ds_client::{
    cli::{args::Cli, commands::run_command},
    logging::logger,
    Result,
};
use tokio::signal;
use tracing::warn;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    logger::init_logger(cli.verbose, cli.quiet)?;

    // Set up signal handling for graceful shutdown
    let shutdown_signal = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        warn!("Received Ctrl+C, aborting session...");
    };

    // Run the scheduling session with signal handling
    tokio::select! {
        result = run_command(cli) => result,
        _ = shutdown_signal => {
            warn!("Session interrupted by user");
            std::process::exit(130); // Standard exit code for Ctrl+C
        }
    }
}
