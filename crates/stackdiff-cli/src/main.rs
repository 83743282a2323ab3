//! stackdiff CLI
//!
//! Local structural diff of two configuration files, and read access to a
//! diff store.

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "stackdiff")]
#[command(about = "stackdiff - Structural diff of YAML configuration stacks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compare two YAML files
    Diff(commands::diff::DiffArgs),
    /// Stored diff records
    Records(commands::records::RecordsArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Diff(args) => commands::diff::execute(args),
        Commands::Records(args) => commands::records::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
