//! The `rehash` command.

use cityvers::{rehash, storage};

use crate::cli::RehashArgs;
use crate::commands::CommandResult;

/// Run the `rehash` command
pub fn run(args: &RehashArgs) -> CommandResult {
    let mut model = storage::load_versioned(&args.file)?;
    let report = rehash(&mut model)?;

    let output = args.output.as_deref().unwrap_or(&args.file);
    storage::save(&model, output)?;

    if report.is_clean() {
        println!("All ids already canonical");
    } else {
        println!(
            "Rewrote {} object id(s) and {} version id(s)",
            report.objects_changed, report.versions_changed
        );
    }
    Ok(())
}
