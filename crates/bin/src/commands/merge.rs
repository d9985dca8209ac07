//! The `merge` command.

use cityvers::{MergeOutcome, merge, storage};

use crate::cli::MergeArgs;
use crate::commands::CommandResult;
use crate::output::short_id;

/// Run the `merge` command
pub fn run(args: &MergeArgs) -> CommandResult {
    let mut model = storage::load_versioned(&args.file)?;

    match merge(&mut model, &args.source, &args.dest, &args.author)? {
        MergeOutcome::NoOp => {
            println!("'{}' and '{}' are the same version", args.source, args.dest);
        }
        MergeOutcome::Conflicts(conflicts) => {
            eprintln!("Cannot merge '{}' into '{}':", args.source, args.dest);
            for conflict in &conflicts {
                eprintln!("  {conflict}");
            }
            return Err(format!(
                "merge aborted with {} conflicting object(s), nothing written",
                conflicts.len()
            )
            .into());
        }
        MergeOutcome::Merged { version_id } => {
            storage::save(&model, &args.file)?;
            println!(
                "Merged '{}' into '{}' as {}",
                args.source,
                args.dest,
                short_id(version_id.as_str())
            );
        }
    }
    Ok(())
}
