mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::Result;
use clap::Parser;
use tracing::{debug, info};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.clone())?;

    info!("varmod v{} starting up", env!("CARGO_PKG_VERSION"));
    debug!("parsed CLI arguments: {:?}", &cli);

    match cli.command {
        Commands::Build(args) => {
            info!("dispatching to 'build' command");
            commands::build::run(args)
        }
        Commands::Patch(args) => {
            info!("dispatching to 'patch' command");
            commands::patch::run(args)
        }
    }
}
