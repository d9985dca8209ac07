//! The `commit` command.

use std::path::PathBuf;

use cityvers::{CityModel, CommitOutcome, commit, storage};

use crate::cli::CommitArgs;
use crate::commands::CommandResult;
use crate::output::short_id;

/// Input sentinel for starting a fresh history instead of a file.
const INIT: &str = "init";

/// Run the `commit` command
pub fn run(args: &CommitArgs) -> CommandResult {
    let output = match (&args.output, args.file.as_str()) {
        (Some(path), _) => path.clone(),
        (None, INIT) => {
            return Err("committing on 'init' requires --output for the new file".into());
        }
        (None, file) => PathBuf::from(file),
    };

    let mut model = if args.file == INIT {
        CityModel::empty()
    } else {
        storage::load(PathBuf::from(&args.file).as_path())?
    };
    let incoming = storage::load(&args.new_document)?;

    match commit(
        &mut model,
        &incoming,
        &args.reference,
        &args.author,
        &args.message,
    )? {
        CommitOutcome::NoOp => {
            println!("Nothing to commit, '{}' already holds this content", args.reference);
        }
        CommitOutcome::Committed { version_id } => {
            storage::save(&model, &output)?;
            println!(
                "Committed {} on '{}' to {}",
                short_id(version_id.as_str()),
                args.reference,
                output.display()
            );
        }
    }
    Ok(())
}
