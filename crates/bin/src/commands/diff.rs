//! The `diff` command.

use cityvers::{Diff, storage};

use crate::cli::DiffArgs;
use crate::commands::CommandResult;
use crate::output::print_diff;

/// Run the `diff` command
pub fn run(args: &DiffArgs) -> CommandResult {
    let model = storage::load_versioned(&args.file)?;
    let diff = Diff::between(&model, &args.source, &args.dest)?;
    print_diff(&diff);
    Ok(())
}
