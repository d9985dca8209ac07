//! Command-line entry point for cityvers.

mod cli;
mod commands;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("cityvers=warn".parse().unwrap()),
        )
        .init();

    let cli = cli::Cli::parse();
    if let Err(e) = commands::run(cli.command) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
