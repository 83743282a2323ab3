//! Records command
//!
//! Usage: stackdiff records list [--db <PATH>] [--stack-a <A> --stack-b <B>] [--file <F>]
//!        stackdiff records show <ID> [--db <PATH>]

use clap::{Args, Subcommand};
use stackdiff_store::{DiffFilter, SqliteDiffStore};
use std::path::{Path, PathBuf};

const DEFAULT_DB_PATH: &str = ".stackdiff/store.db";

#[derive(Debug, Args)]
pub struct RecordsArgs {
    #[command(subcommand)]
    pub command: RecordsCommand,
}

#[derive(Debug, Subcommand)]
pub enum RecordsCommand {
    /// List stored records, oldest first
    List(ListArgs),
    /// Print one record
    Show(ShowArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Database path
    #[arg(long, default_value = DEFAULT_DB_PATH)]
    pub db: PathBuf,

    #[arg(long)]
    pub stack_a: Option<String>,

    #[arg(long)]
    pub stack_b: Option<String>,

    #[arg(long)]
    pub file: Option<String>,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Record id
    pub id: String,

    /// Database path
    #[arg(long, default_value = DEFAULT_DB_PATH)]
    pub db: PathBuf,
}

/// Execute records command
pub fn execute(args: RecordsArgs) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        RecordsCommand::List(list_args) => execute_list(list_args),
        RecordsCommand::Show(show_args) => execute_show(show_args),
    }
}

fn open_store(db: &Path) -> Result<SqliteDiffStore, Box<dyn std::error::Error>> {
    if !db.exists() {
        return Err(format!("no diff store at {}", db.display()).into());
    }
    Ok(SqliteDiffStore::open(db)?)
}

fn execute_list(args: ListArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(&args.db)?;
    let filter = DiffFilter {
        stack_a: args.stack_a,
        stack_b: args.stack_b,
        file: args.file,
    };
    let records = store.find_diffs(&filter)?;
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

fn execute_show(args: ShowArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(&args.db)?;
    let record = store
        .get_diff(&args.id)?
        .ok_or_else(|| format!("no diff with id {}", args.id))?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
