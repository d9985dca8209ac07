//! The `branch` command.

use cityvers::storage;

use crate::cli::BranchArgs;
use crate::commands::CommandResult;
use crate::output::{print_table, short_id};

/// Run the `branch` command
pub fn run(args: &BranchArgs) -> CommandResult {
    let mut model = storage::load_versioned(&args.file)?;

    let Some(name) = &args.name else {
        if args.delete {
            return Err("--delete requires a branch name".into());
        }
        if model.versioning.branches.is_empty() {
            println!("No branches.");
            return Ok(());
        }
        let rows: Vec<Vec<String>> = model
            .versioning
            .branches
            .iter()
            .map(|(name, target)| vec![name.clone(), short_id(target.as_str()).to_string()])
            .collect();
        print_table(&["BRANCH", "VERSION"], &rows);
        return Ok(());
    };

    if args.delete {
        if !model.versioning.delete_branch(name) {
            return Err(format!("There is no branch '{name}'").into());
        }
        storage::save(&model, &args.file)?;
        println!("Deleted branch '{name}'");
        return Ok(());
    }

    let target = model.versioning.resolve_ref(&args.reference)?;
    model.versioning.create_branch(name, target.clone())?;
    storage::save(&model, &args.file)?;
    println!("Branch '{name}' points at {}", short_id(target.as_str()));
    Ok(())
}
