//! Shared implementation for the bilan-canonical command.

use anyhow::{Context, Result};
use bilan_importer::canonical;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

/// Convert a ledger export to the canonical CSV form.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The ledger export to read (EBP v19/v21 or canonical form)
    #[arg(long, value_name = "FILE")]
    pub book: PathBuf,

    /// The canonical-form file to write
    #[arg(long, value_name = "FILE")]
    pub out: PathBuf,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

fn run(args: &Args) -> Result<ExitCode> {
    let imported = bilan_importer::read_ledger(&args.book)?;
    for warning in &imported.warnings {
        eprintln!("warning: {warning}");
    }
    canonical::write_file(&imported.records, &args.out)
        .with_context(|| format!("failed to write {}", args.out.display()))?;
    Ok(ExitCode::SUCCESS)
}

/// Main entry point for the canonical command.
pub fn main() -> ExitCode {
    let args = Args::parse();
    if args.verbose {
        crate::cmd::init_tracing();
    }
    crate::cmd::exit_with(run(&args))
}
