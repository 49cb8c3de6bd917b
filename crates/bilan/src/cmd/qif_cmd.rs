//! Shared implementation for the bilan-qif command.

use anyhow::Result;
use bilan_render::qif;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

/// Export a ledger as a QIF bank section.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The ledger export to read (EBP or canonical form)
    #[arg(long, value_name = "FILE")]
    pub book: PathBuf,

    /// Write output here instead of stdout
    #[arg(long, value_name = "FILE")]
    pub outfile: Option<PathBuf>,

    /// Ignore ledger rows dated after this day (inclusive, YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub cutoff: Option<NaiveDate>,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

fn run(args: &Args) -> Result<ExitCode> {
    let imported = bilan_importer::read_ledger(&args.book)?;
    for warning in &imported.warnings {
        eprintln!("warning: {warning}");
    }
    let records: Vec<_> = match args.cutoff {
        Some(limit) => imported
            .records
            .into_iter()
            .filter(|r| r.date <= limit)
            .collect(),
        None => imported.records,
    };
    crate::cmd::emit(&qif::bank(&records), args.outfile.as_deref())?;
    Ok(ExitCode::SUCCESS)
}

/// Main entry point for the QIF command.
pub fn main() -> ExitCode {
    let args = Args::parse();
    if args.verbose {
        crate::cmd::init_tracing();
    }
    crate::cmd::exit_with(run(&args))
}
