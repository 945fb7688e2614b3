mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use chargefit::core::models::element::PeriodicTable;
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    info!(
        "🚀 ChargeFit CLI v{} starting up.",
        env!("CARGO_PKG_VERSION")
    );
    debug!("Full CLI arguments parsed: {:?}", &cli);

    // Atoms borrow their elements from the global table, so it must be set before any input is read.
    if let Some(path) = &cli.elements {
        info!("Installing element table from {:?}", path);
        let table = PeriodicTable::load_csv(path).map_err(|e| CliError::parsing(path, e))?;
        PeriodicTable::install(table).map_err(|e| CliError::Other(e.into()))?;
    }

    let progress = if cli.quiet {
        CliProgressHandler::hidden()
    } else {
        CliProgressHandler::new()
    };

    let command_result = match cli.command {
        Commands::Info(args) => {
            info!("Dispatching to 'info' command.");
            commands::info::run(args)
        }
        Commands::Charges(args) => {
            info!("Dispatching to 'charges' command.");
            commands::charges::run(args, &progress)
        }
        Commands::Fit(args) => {
            info!("Dispatching to 'fit' command.");
            commands::fit::run(args, &progress)
        }
    };

    match &command_result {
        Ok(_) => info!("✅ Command completed successfully."),
        Err(e) => error!("❌ Command failed: {}", e),
    }

    command_result
}
