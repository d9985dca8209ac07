//! CLI argument definitions for the cityvers binary.

use std::path::PathBuf;

use cityvers::constants::DEFAULT_BRANCH;
use clap::{Parser, Subcommand};

/// Version control for 3D city-model documents
#[derive(Parser, Debug)]
#[command(name = "cityvers")]
#[command(about = "Track, diff and merge versions of a CityJSON document")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the version history reachable from one or more refs
    Log(LogArgs),
    /// Extract one version into a standalone document
    Checkout(CheckoutArgs),
    /// Compare two versions
    Diff(DiffArgs),
    /// Record a document as a new version
    Commit(CommitArgs),
    /// List, create or delete branches
    Branch(BranchArgs),
    /// Merge one branch into another
    Merge(MergeArgs),
    /// Recompute every content-addressed id in a document
    Rehash(RehashArgs),
}

/// Arguments for the log command
#[derive(clap::Args, Debug)]
pub struct LogArgs {
    /// The versioned city model file
    pub file: PathBuf,

    /// Refs (version id prefixes, branches or tags) to start from
    #[arg(default_value = DEFAULT_BRANCH)]
    pub refs: Vec<String>,
}

/// Arguments for the checkout command
#[derive(clap::Args, Debug)]
pub struct CheckoutArgs {
    /// The versioned city model file
    pub file: PathBuf,

    /// The version to extract
    pub reference: String,

    /// Where to write the extracted document
    pub output: PathBuf,
}

/// Arguments for the diff command
#[derive(clap::Args, Debug)]
pub struct DiffArgs {
    /// The versioned city model file
    pub file: PathBuf,

    /// The older side of the comparison
    pub source: String,

    /// The newer side of the comparison
    pub dest: String,
}

/// Arguments for the commit command
#[derive(clap::Args, Debug)]
pub struct CommitArgs {
    /// The versioned file to commit into, or "init" to start a new history
    pub file: String,

    /// The document to record as a new version
    pub new_document: PathBuf,

    /// Branch or version to commit on
    #[arg(default_value = DEFAULT_BRANCH)]
    pub reference: String,

    /// Author recorded in the new version
    #[arg(short, long, env = "CITYVERS_AUTHOR")]
    pub author: String,

    /// Commit message
    #[arg(short, long)]
    pub message: String,

    /// Where to write the result (defaults to FILE; required with "init")
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the branch command
#[derive(clap::Args, Debug)]
pub struct BranchArgs {
    /// The versioned city model file
    pub file: PathBuf,

    /// Branch to create or delete; lists all branches when omitted
    pub name: Option<String>,

    /// Version the new branch points at
    #[arg(default_value = DEFAULT_BRANCH)]
    pub reference: String,

    /// Delete the branch instead of creating it
    #[arg(short = 'd', long)]
    pub delete: bool,
}

/// Arguments for the merge command
#[derive(clap::Args, Debug)]
pub struct MergeArgs {
    /// The versioned city model file
    pub file: PathBuf,

    /// The ref to merge from
    pub source: String,

    /// The ref to merge into
    pub dest: String,

    /// Author recorded in the merge version
    #[arg(short, long, env = "CITYVERS_AUTHOR")]
    pub author: String,
}

/// Arguments for the rehash command
#[derive(clap::Args, Debug)]
pub struct RehashArgs {
    /// The versioned city model file
    pub file: PathBuf,

    /// Where to write the result (defaults to rewriting FILE in place)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
