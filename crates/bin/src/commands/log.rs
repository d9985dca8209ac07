//! The `log` command.

use cityvers::{history, storage};

use crate::cli::LogArgs;
use crate::commands::CommandResult;
use crate::output::print_log_entry;

/// Run the `log` command
pub fn run(args: &LogArgs) -> CommandResult {
    let model = storage::load_versioned(&args.file)?;
    let entries = history::log_entries(&model, &args.refs)?;

    for entry in &entries {
        print_log_entry(entry);
    }
    Ok(())
}
