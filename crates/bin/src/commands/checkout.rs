//! The `checkout` command.

use cityvers::storage;

use crate::cli::CheckoutArgs;
use crate::commands::CommandResult;

/// Run the `checkout` command
pub fn run(args: &CheckoutArgs) -> CommandResult {
    let model = storage::load_versioned(&args.file)?;
    let extracted = cityvers::checkout(&model, &args.reference)?;
    storage::save(&extracted, &args.output)?;

    println!(
        "Checked out '{}' ({} objects) to {}",
        args.reference,
        extracted.city_objects.len(),
        args.output.display()
    );
    Ok(())
}
