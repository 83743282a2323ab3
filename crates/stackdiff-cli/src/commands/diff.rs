//! Diff command
//!
//! Usage: stackdiff diff <A> <B> [--json] [--output <FILE>]

use clap::Args;
use stackdiff_core::diff::{compare_yaml_strings, render_human_summary};
use stackdiff_core::errors::ExError;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Reference file (stack A)
    pub left: PathBuf,

    /// Compared file (stack B)
    pub right: PathBuf,

    /// Print the diff as JSON instead of Markdown
    #[arg(long)]
    pub json: bool,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute diff command
pub fn execute(args: DiffArgs) -> Result<(), Box<dyn std::error::Error>> {
    let left = std::fs::read_to_string(&args.left)
        .map_err(|e| format!("cannot read {}: {}", args.left.display(), e))?;
    let right = std::fs::read_to_string(&args.right)
        .map_err(|e| format!("cannot read {}: {}", args.right.display(), e))?;

    let diff = compare_yaml_strings(&left, &right).map_err(ExError::from)?;

    let rendered = if args.json {
        let mut json = serde_json::to_string_pretty(&diff)?;
        json.push('\n');
        json
    } else {
        render_human_summary(&diff)
    };

    if let Some(output_path) = args.output {
        std::fs::write(&output_path, rendered)?;
        println!("✓ Diff written to {}", output_path.display());
    } else {
        print!("{}", rendered);
    }

    Ok(())
}
