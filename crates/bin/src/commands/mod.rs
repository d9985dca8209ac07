//! Command implementations for the cityvers binary.

mod branch;
mod checkout;
mod commit;
mod diff;
mod log;
mod merge;
mod rehash;

use crate::cli::Commands;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Dispatch one parsed command.
pub fn run(command: Commands) -> CommandResult {
    match command {
        Commands::Log(args) => log::run(&args),
        Commands::Checkout(args) => checkout::run(&args),
        Commands::Diff(args) => diff::run(&args),
        Commands::Commit(args) => commit::run(&args),
        Commands::Branch(args) => branch::run(&args),
        Commands::Merge(args) => merge::run(&args),
        Commands::Rehash(args) => rehash::run(&args),
    }
}
